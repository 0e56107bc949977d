/*!
 * Helpers working on fragments and text units.
 */

use log::warn;

use crate::errors::Result;
use crate::locale::LocaleId;
use crate::resource::fragment::TextFragment;
use crate::resource::text_unit::TextUnit;

/// Give the codes of a new target the native data of the original source.
///
/// Target codes are matched with unused source codes of the same tag type,
/// in order. Without `always_copy`, nothing is changed unless some target
/// code has no data or some source code holds a reference. An extra target
/// code without data is reported, and so is a source code missing from the
/// target unless it is deleteable. With `add_missing`, missing source codes
/// are appended to the target instead.
pub fn adjust_target_codes(
    original_source: &TextFragment,
    new_target: &mut TextFragment,
    always_copy: bool,
    add_missing: bool,
) {
    let needs_adjustment = new_target.codes().iter().any(|c| !c.has_data())
        || original_source.codes().iter().any(|c| c.has_reference);
    if !always_copy && !needs_adjustment {
        return;
    }
    if !new_target.has_code() && !original_source.has_code() {
        return;
    }

    let originals = original_source.codes();
    let mut used = vec![false; originals.len()];
    for index in 0..new_target.codes().len() {
        let Some(code) = new_target.code_mut(index) else {
            continue;
        };
        code.outer_data = None;
        let matched = originals
            .iter()
            .enumerate()
            .find(|(i, original)| !used[*i] && original.tag_type == code.tag_type);
        match matched {
            Some((i, original)) => {
                used[i] = true;
                code.data = original.data.clone();
                code.outer_data = original.outer_data.clone();
                code.has_reference = original.has_reference;
            }
            None if !code.has_data() => {
                warn!("The extra target code id='{}' does not have corresponding data", code.id);
            }
            None => {}
        }
    }

    for (original, _) in originals.iter().zip(&used).filter(|(_, used)| !**used) {
        if add_missing {
            new_target.push_code(original.clone());
        } else if !original.deleteable {
            warn!(
                "The code id='{}' ({}) is missing in target",
                original.id,
                original.data.as_deref().unwrap_or("")
            );
        }
    }
}

/// Remove the leading whitespace of a fragment and return it
pub fn trim_leading(fragment: &mut TextFragment) -> Result<String> {
    let count = fragment.coded_text().chars().take_while(|c| c.is_whitespace()).count();
    let removed: String = fragment.coded_text().chars().take(count).collect();
    if count > 0 {
        fragment.remove(0, count)?;
    }
    Ok(removed)
}

/// Remove the trailing whitespace of a fragment and return it
pub fn trim_trailing(fragment: &mut TextFragment) -> Result<String> {
    let len = fragment.len();
    let count = fragment.coded_text().chars().rev().take_while(|c| c.is_whitespace()).count();
    let removed: String = fragment.coded_text().chars().skip(len - count).collect();
    if count > 0 {
        fragment.remove(len - count, len)?;
    }
    Ok(removed)
}

/// Whether the coded text ends with `suffix`
pub fn ends_with(fragment: &TextFragment, suffix: &str) -> bool {
    fragment.coded_text().ends_with(suffix)
}

/// Joined source text of a unit, with or without the native data of its codes
pub fn source_text(unit: &TextUnit, remove_codes: bool) -> String {
    let content = unit.source().joined_content();
    if remove_codes { content.plain_text() } else { content.to_string() }
}

/// Joined target text of a unit for a locale, if the target exists
pub fn target_text(unit: &TextUnit, locale: &LocaleId) -> Option<String> {
    unit.target(locale).map(|target| target.joined_content().to_string())
}

/// Whether the source of a unit has no text, whitespace counting as text unless `ignore_whitespace`
pub fn is_empty(unit: &TextUnit, ignore_whitespace: bool) -> bool {
    !unit.source().has_text(!ignore_whitespace)
}
