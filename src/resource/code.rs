/*!
 * Inline codes.
 *
 * A `Code` stands for a piece of non-textual inline markup (a bold start tag,
 * a line break, a variable placeholder...). Codes live in the code list of
 * the fragment that owns them and are referenced from the coded text by index.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::Result;

/// Role of an inline code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagType {
    /// Start of a spanning code, paired with a `Closing` of the same id
    Opening,
    /// End of a spanning code
    Closing,
    /// Self-contained code
    Placeholder,
}

/// An inline code with its identity and opaque payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Code {
    /// Role of the code
    pub tag_type: TagType,

    /// Identifier shared by an Opening and its Closing
    pub id: i32,

    /// Label (type) of the code, e.g. `b` or `br`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Native data of the code, e.g. `<b>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    /// Outer data (used by translation-exchange formats to keep the wrapper)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_data: Option<String>,

    /// The code may be duplicated by a translator
    #[serde(default)]
    pub cloneable: bool,

    /// The code may be removed by a translator
    #[serde(default)]
    pub deleteable: bool,

    /// The data contains a reference to another resource
    #[serde(default)]
    pub has_reference: bool,
}

impl Code {
    /// Create a new code. The id is left at -1 until the code is added to a fragment.
    pub fn new(tag_type: TagType, label: Option<&str>, data: Option<&str>) -> Self {
        Self {
            tag_type,
            id: -1,
            label: label.map(str::to_string),
            data: data.map(str::to_string),
            outer_data: None,
            cloneable: false,
            deleteable: false,
            has_reference: false,
        }
    }

    /// Set the identifier.
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }

    /// Set the outer data.
    pub fn with_outer_data(mut self, outer_data: &str) -> Self {
        self.outer_data = Some(outer_data.to_string());
        self
    }

    /// Whether the code has non-empty native data
    pub fn has_data(&self) -> bool {
        self.data.as_deref().is_some_and(|d| !d.is_empty())
    }

    /// Build the counterpart of an Opening or Closing code: same id, label and flags.
    ///
    /// Placeholders have no counterpart and are returned as a plain clone.
    pub fn counterpart(&self) -> Self {
        let tag_type = match self.tag_type {
            TagType::Opening => TagType::Closing,
            TagType::Closing => TagType::Opening,
            TagType::Placeholder => TagType::Placeholder,
        };
        Self {
            tag_type,
            data: None,
            outer_data: None,
            ..self.clone()
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.data.as_deref().unwrap_or_default())
    }
}

/// Serialize a list of codes to its storage form.
pub fn codes_to_string(codes: &[Code]) -> Result<String> {
    Ok(serde_json::to_string(codes)?)
}

/// Rebuild a list of codes from its storage form. An empty string is an empty list.
pub fn string_to_codes(storage: &str) -> Result<Vec<Code>> {
    if storage.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(storage)?)
}
