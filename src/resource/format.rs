/*!
 * Generic display of coded content.
 *
 * Codes are written as short tags built on their id: `<1>` and `</1>` for a
 * pair, `<2/>` for a placeholder, `<b3/>` and `<e3/>` for an opening or a
 * closing code whose counterpart is not in the fragment. The same notation can
 * be parsed back onto a fragment that owns the codes.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{ContentError, Result};
use crate::resource::code::TagType;
use crate::resource::container::TextContainer;
use crate::resource::fragment::{
    Item, MARKER_CLOSING, MARKER_ISOLATED, MARKER_OPENING, TextFragment, index_to_char,
};
use crate::resource::part::TextPart;

static GENERIC_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(/?)([be]?)(\d+)(/?)>").expect("Invalid generic tag regex")
});

/// Writer and reader of the generic notation
pub struct GenericContent;

impl GenericContent {
    /// Render a fragment, codes as generic tags or, with `with_data`, as their native data
    pub fn to_string(fragment: &TextFragment, with_data: bool) -> String {
        let codes = fragment.codes();
        let mut out = String::new();
        for (_, item) in fragment.items() {
            match item {
                Item::Char(c) => out.push(c),
                Item::Marker { kind, index } => {
                    let Some(code) = codes.get(index) else {
                        continue;
                    };
                    if with_data {
                        out.push_str(code.data.as_deref().unwrap_or(""));
                        continue;
                    }
                    let tag = match (kind, code.tag_type) {
                        (MARKER_OPENING, _) => format!("<{}>", code.id),
                        (MARKER_CLOSING, _) => format!("</{}>", code.id),
                        (MARKER_ISOLATED, TagType::Opening) => format!("<b{}/>", code.id),
                        (MARKER_ISOLATED, TagType::Closing) => format!("<e{}/>", code.id),
                        _ => format!("<{}/>", code.id),
                    };
                    out.push_str(&tag);
                }
            }
        }
        out
    }

    /// Render a container with each segment between brackets
    pub fn segmented(container: &TextContainer, with_data: bool) -> String {
        container
            .parts()
            .iter()
            .map(|part| match part {
                TextPart::Segment(segment) => format!("[{}]", Self::to_string(&segment.text, with_data)),
                TextPart::Text(text) => Self::to_string(text, with_data),
            })
            .collect()
    }

    /// Replace the text of `fragment` with generic text referring to its codes.
    ///
    /// Every tag must name a code of the fragment with a compatible role and
    /// every code must be used exactly once.
    ///
    /// # Errors
    /// `ContentError::CodeMismatch` for an unknown, reused or missing code.
    pub fn update_fragment(generic: &str, fragment: &mut TextFragment) -> Result<()> {
        let codes = fragment.codes().to_vec();
        let mut used = vec![false; codes.len()];
        let mut coded = String::with_capacity(generic.len());
        let mut last = 0;

        for caps in GENERIC_TAG.captures_iter(generic) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            coded.push_str(&generic[last..whole.start()]);
            last = whole.end();

            let closing = !caps[1].is_empty();
            let prefix = &caps[2];
            let empty = !caps[4].is_empty();
            let id: i32 = caps[3]
                .parse()
                .map_err(|_| ContentError::CodeMismatch(format!("invalid code id in '{}'", whole.as_str())))?;
            let (kind, tag_type) = match (closing, prefix, empty) {
                (false, "", false) => (MARKER_OPENING, Some(TagType::Opening)),
                (true, "", false) => (MARKER_CLOSING, Some(TagType::Closing)),
                (false, "b", true) => (MARKER_ISOLATED, Some(TagType::Opening)),
                (false, "e", true) => (MARKER_ISOLATED, Some(TagType::Closing)),
                (false, "", true) => (MARKER_ISOLATED, None),
                _ => {
                    return Err(ContentError::CodeMismatch(format!(
                        "malformed generic tag '{}'",
                        whole.as_str()
                    )));
                }
            };
            let index = codes
                .iter()
                .enumerate()
                .position(|(i, code)| {
                    !used[i] && code.id == id && tag_type.is_none_or(|t| t == code.tag_type)
                })
                .ok_or_else(|| ContentError::CodeMismatch(format!("no code for tag '{}'", whole.as_str())))?;
            used[index] = true;
            coded.push(kind);
            coded.push(index_to_char(index));
        }
        coded.push_str(&generic[last..]);

        fragment.set_coded_text(&coded)
    }
}
