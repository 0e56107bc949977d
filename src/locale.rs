/*!
 * Locale identifiers for source and target containers.
 *
 * A `LocaleId` is a normalized `language[-script][-region]` tag. The language
 * subtag is validated against ISO 639-1 (2-letter) and ISO 639-2 (3-letter)
 * codes; comparison is done on the normalized form, so `FR` and `fr` are the
 * same locale while `fr` and `fr-FR` are not.
 */

use isolang::Language;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{ContentError, Result};

/// ISO 639-2/B codes that differ from their ISO 639-2/T form
const PART2B_TO_PART2T: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Normalized locale identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocaleId {
    tag: String,
}

impl LocaleId {
    /// Parse and normalize a locale tag such as `fr`, `fr_ca` or `zh-hant-tw`.
    ///
    /// # Errors
    /// Returns `ContentError::InvalidLocale` when the language subtag is not a
    /// known ISO 639 code or a subtag is malformed.
    pub fn new(tag: &str) -> Result<Self> {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(ContentError::InvalidLocale("empty locale".to_string()));
        }

        let mut subtags = trimmed.split(['-', '_']);
        let language = subtags.next().unwrap_or_default().to_lowercase();
        validate_language(&language)?;

        let mut normalized = language;
        for subtag in subtags {
            if subtag.is_empty() || !subtag.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(ContentError::InvalidLocale(format!(
                    "malformed subtag '{}' in '{}'",
                    subtag, tag
                )));
            }
            normalized.push('-');
            normalized.push_str(&normalize_subtag(subtag));
        }

        Ok(Self { tag: normalized })
    }

    /// The full normalized tag
    pub fn as_str(&self) -> &str {
        &self.tag
    }

    /// The language subtag (always lowercase)
    pub fn language(&self) -> &str {
        self.tag.split('-').next().unwrap_or(&self.tag)
    }

    /// The region subtag, if any (2 letters or 3 digits)
    pub fn region(&self) -> Option<&str> {
        self.tag.split('-').skip(1).find(|s| is_region(s))
    }

    /// Whether both locales are for the same language, whatever the region.
    ///
    /// 2-letter and 3-letter forms of the same language match (`fr` and `fra`).
    pub fn same_language(&self, other: &LocaleId) -> bool {
        match (to_part2t(self.language()), to_part2t(other.language())) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// English name of the language
    pub fn language_name(&self) -> Result<String> {
        to_part2t(self.language())
            .and_then(|code| Language::from_639_3(&code))
            .map(|lang| lang.to_name().to_string())
            .ok_or_else(|| ContentError::InvalidLocale(self.tag.clone()))
    }
}

fn validate_language(code: &str) -> Result<()> {
    if to_part2t(code).is_some() {
        Ok(())
    } else {
        Err(ContentError::InvalidLocale(format!("unknown language code '{}'", code)))
    }
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
fn to_part2t(code: &str) -> Option<String> {
    match code.len() {
        2 => Language::from_639_1(code).map(|lang| lang.to_639_3().to_string()),
        3 => {
            if Language::from_639_3(code).is_some() {
                return Some(code.to_string());
            }
            PART2B_TO_PART2T
                .iter()
                .find(|(b, _)| *b == code)
                .map(|(_, t)| (*t).to_string())
        }
        _ => None,
    }
}

fn is_region(subtag: &str) -> bool {
    (subtag.len() == 2 && subtag.chars().all(|c| c.is_ascii_alphabetic()))
        || (subtag.len() == 3 && subtag.chars().all(|c| c.is_ascii_digit()))
}

fn normalize_subtag(subtag: &str) -> String {
    if is_region(subtag) {
        subtag.to_uppercase()
    } else if subtag.len() == 4 && subtag.chars().all(|c| c.is_ascii_alphabetic()) {
        // Script: title case
        let lower = subtag.to_lowercase();
        let mut chars = lower.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => lower,
        }
    } else {
        subtag.to_lowercase()
    }
}

impl fmt::Display for LocaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)
    }
}

impl FromStr for LocaleId {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for LocaleId {
    type Error = ContentError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<LocaleId> for String {
    fn from(locale: LocaleId) -> Self {
        locale.tag
    }
}
