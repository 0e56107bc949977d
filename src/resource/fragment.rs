/*!
 * Coded fragments: text with inline codes.
 *
 * The text of a fragment is its "coded text": ordinary characters mixed with
 * two-character marker sequences. The first character of a marker gives the
 * role of the code (opening, closing, isolated, segment), the second encodes
 * the zero-based index of the code in the fragment's code list. All positions
 * used by this module are counted in characters of the coded text, so a
 * marker always occupies two positions.
 */

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::errors::{ContentError, Result};
use crate::resource::code::{Code, TagType, codes_to_string, string_to_codes};

/// Marker for the start of a spanning code
pub const MARKER_OPENING: char = '\u{E101}';
/// Marker for the end of a spanning code
pub const MARKER_CLOSING: char = '\u{E102}';
/// Marker for a placeholder or an unpaired opening/closing code
pub const MARKER_ISOLATED: char = '\u{E103}';
/// Marker for a segment boundary
pub const MARKER_SEGMENT: char = '\u{E104}';

/// First code point used to encode code indices
const CHAR_BASE: u32 = 0xE110;

/// Whether a character starts a marker sequence
pub fn is_marker(c: char) -> bool {
    matches!(c, MARKER_OPENING | MARKER_CLOSING | MARKER_ISOLATED | MARKER_SEGMENT)
}

/// Encode a code index as a character
pub fn index_to_char(index: usize) -> char {
    u32::try_from(index)
        .ok()
        .and_then(|i| CHAR_BASE.checked_add(i))
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Decode a code index from its character
pub fn char_to_index(c: char) -> Option<usize> {
    (c as u32).checked_sub(CHAR_BASE).map(|i| i as usize)
}

/// One element of the coded text, with its character position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Item {
    Char(char),
    Marker { kind: char, index: usize },
}

/// Accumulates text and codes, numbering markers in text order
#[derive(Default)]
struct FragmentBuilder {
    text: String,
    codes: Vec<Code>,
}

impl FragmentBuilder {
    fn push_char(&mut self, c: char) {
        self.text.push(c);
    }

    fn push_marker(&mut self, kind: char, code: Code) {
        self.text.push(kind);
        self.text.push(index_to_char(self.codes.len()));
        self.codes.push(code);
    }

    fn push_items(&mut self, source: &TextFragment, items: &[(usize, Item)]) {
        for (_, item) in items {
            match *item {
                Item::Char(c) => self.push_char(c),
                Item::Marker { kind, index } => {
                    if let Some(code) = source.codes.get(index) {
                        self.push_marker(kind, code.clone());
                    }
                }
            }
        }
    }

    fn finish(self) -> TextFragment {
        let last_code_id = self.codes.iter().map(|c| c.id).max().unwrap_or(0).max(0);
        TextFragment {
            text: self.text,
            codes: self.codes,
            last_code_id,
        }
    }
}

/// Serialized form: the `(coded_text, codes)` pair
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawFragment {
    #[serde(rename = "codedText")]
    coded_text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    codes: Vec<Code>,
}

/// A run of text with inline codes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "RawFragment", into = "RawFragment")]
pub struct TextFragment {
    text: String,
    codes: Vec<Code>,
    last_code_id: i32,
}

impl TextFragment {
    /// Create an empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fragment from a coded text and its codes.
    ///
    /// # Errors
    /// `ContentError::CodeMismatch` if the text and the codes do not agree.
    pub fn from_coded_text(coded_text: &str, codes: Vec<Code>) -> Result<Self> {
        let mut fragment = Self::new();
        fragment.set_coded_text_with_codes(coded_text, codes)?;
        Ok(fragment)
    }

    /// The coded text
    pub fn coded_text(&self) -> &str {
        &self.text
    }

    /// The list of codes, in index order
    pub fn codes(&self) -> &[Code] {
        &self.codes
    }

    /// Code at a given index
    pub fn code(&self, index: usize) -> Option<&Code> {
        self.codes.get(index)
    }

    /// Mutable code at a given index (to decorate data or flags)
    pub fn code_mut(&mut self, index: usize) -> Option<&mut Code> {
        self.codes.get_mut(index)
    }

    /// Highest code id used so far
    pub fn last_code_id(&self) -> i32 {
        self.last_code_id
    }

    /// Length of the coded text, in characters (markers count as two)
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the coded text is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether the fragment has at least one code
    pub fn has_code(&self) -> bool {
        !self.codes.is_empty()
    }

    /// Whether the fragment has text outside of its codes.
    ///
    /// Whitespace counts as text only if `whitespace_is_text` is set.
    pub fn has_text(&self, whitespace_is_text: bool) -> bool {
        self.items().iter().any(|(_, item)| match item {
            Item::Char(c) => whitespace_is_text || !c.is_whitespace(),
            Item::Marker { .. } => false,
        })
    }

    /// Remove all text and codes.
    pub fn clear(&mut self) {
        self.text.clear();
        self.codes.clear();
        self.last_code_id = 0;
    }

    /// Append plain text.
    pub fn append_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Append a single character.
    pub fn append_char(&mut self, c: char) {
        self.text.push(c);
    }

    /// Append a new code and return it for further decoration.
    ///
    /// Opening and placeholder codes get a new id. A closing code takes the id
    /// of the last still-open opening code with the same label, or a new id if
    /// there is none: pairing completeness is not verified here.
    pub fn append_code(
        &mut self,
        tag_type: TagType,
        label: Option<&str>,
        data: Option<&str>,
    ) -> &mut Code {
        let mut code = Code::new(tag_type, label, data);
        code.id = match tag_type {
            TagType::Closing => self.open_code_id(label).unwrap_or_else(|| self.next_code_id()),
            _ => self.next_code_id(),
        };
        self.push_code(code)
    }

    /// Append a fully built code. A negative id is replaced by a new one.
    pub fn push_code(&mut self, mut code: Code) -> &mut Code {
        if code.id < 0 {
            code.id = self.next_code_id();
        } else {
            self.last_code_id = self.last_code_id.max(code.id);
        }
        let kind = match code.tag_type {
            TagType::Opening => MARKER_OPENING,
            TagType::Closing => MARKER_CLOSING,
            TagType::Placeholder => MARKER_ISOLATED,
        };
        let index = self.codes.len();
        self.text.push(kind);
        self.text.push(index_to_char(index));
        self.codes.push(code);
        &mut self.codes[index]
    }

    /// Append another fragment, re-indexing its markers after the existing codes.
    pub fn append_fragment(&mut self, other: &TextFragment) {
        let offset = self.codes.len();
        let mut chars = other.text.chars();
        while let Some(c) = chars.next() {
            self.text.push(c);
            if is_marker(c) {
                if let Some(index) = chars.next().and_then(char_to_index) {
                    self.text.push(index_to_char(index + offset));
                }
            }
        }
        self.codes.extend(other.codes.iter().cloned());
        self.last_code_id = self.last_code_id.max(other.last_code_id);
    }

    /// Replace the code list (first step of a two-step reconstruction).
    ///
    /// The coded text is not checked: call `set_coded_text` next.
    pub fn set_codes(&mut self, codes: Vec<Code>) {
        self.last_code_id = codes.iter().map(|c| c.id).max().unwrap_or(0).max(0);
        self.codes = codes;
    }

    /// Replace the code list from its storage form.
    pub fn set_codes_from_storage(&mut self, storage: &str) -> Result<()> {
        self.set_codes(string_to_codes(storage)?);
        Ok(())
    }

    /// Storage form of the code list
    pub fn codes_storage(&self) -> Result<String> {
        codes_to_string(&self.codes)
    }

    /// Replace the coded text, keeping the current codes.
    ///
    /// # Errors
    /// `ContentError::CodeMismatch` if the text references a code index that
    /// does not exist, or leaves a code unreferenced.
    pub fn set_coded_text(&mut self, coded_text: &str) -> Result<()> {
        validate_coded_text(coded_text, &self.codes)?;
        self.text = coded_text.to_string();
        Ok(())
    }

    /// Replace both the coded text and the codes, atomically.
    pub fn set_coded_text_with_codes(&mut self, coded_text: &str, codes: Vec<Code>) -> Result<()> {
        validate_coded_text(coded_text, &codes)?;
        self.text = coded_text.to_string();
        self.set_codes(codes);
        Ok(())
    }

    /// Extract `length` characters of coded text starting at `start`.
    ///
    /// A code pair cut by the slice boundaries is either completed with a
    /// synthesized counterpart (`add_missing_codes`) or its marker in the
    /// slice is turned into an isolated marker referencing the same code.
    /// Without `add_missing_codes`, a marker that had no partner to begin
    /// with keeps its kind.
    ///
    /// # Errors
    /// `ContentError::InvalidPosition` if the range is out of bounds or a
    /// boundary falls inside a marker.
    pub fn sub_sequence(&self, start: usize, length: usize, add_missing_codes: bool) -> Result<TextFragment> {
        let items = self.items();
        let len = self.len();
        let end = start
            .checked_add(length)
            .filter(|end| *end <= len && start <= len)
            .ok_or_else(|| {
                ContentError::position(format!(
                    "range start={}, length={} outside of fragment of length {}",
                    start, length, len
                ))
            })?;
        check_boundary(&items, start)?;
        check_boundary(&items, end)?;

        let partners = marker_partners(&items, &self.codes);
        let mut prefix: Vec<Code> = Vec::new();
        let mut suffix: Vec<Code> = Vec::new();
        let mut body: Vec<(char, Option<Code>)> = Vec::new();

        for (i, (pos, item)) in items.iter().enumerate() {
            if *pos < start || *pos >= end {
                continue;
            }
            match *item {
                Item::Char(c) => body.push((c, None)),
                Item::Marker { kind, index } => {
                    let Some(code) = self.codes.get(index) else {
                        continue;
                    };
                    let partner = partners[i];
                    let partner_code = partner.and_then(|p| match items[p].1 {
                        Item::Marker { index, .. } => self.codes.get(index).cloned(),
                        Item::Char(_) => None,
                    });
                    let kind = match kind {
                        MARKER_OPENING if partner.is_none_or(|p| items[p].0 >= end) => {
                            if add_missing_codes {
                                suffix.push(partner_code.unwrap_or_else(|| code.counterpart()));
                                MARKER_OPENING
                            } else if partner.is_some() {
                                MARKER_ISOLATED
                            } else {
                                MARKER_OPENING
                            }
                        }
                        MARKER_CLOSING if partner.is_none_or(|p| items[p].0 < start) => {
                            if add_missing_codes {
                                prefix.push(partner_code.unwrap_or_else(|| code.counterpart()));
                                MARKER_CLOSING
                            } else if partner.is_some() {
                                MARKER_ISOLATED
                            } else {
                                MARKER_CLOSING
                            }
                        }
                        other => other,
                    };
                    body.push((kind, Some(code.clone())));
                }
            }
        }

        let mut builder = FragmentBuilder::default();
        for code in prefix.into_iter().rev() {
            builder.push_marker(MARKER_OPENING, code);
        }
        for (c, code) in body {
            match code {
                Some(code) => builder.push_marker(c, code),
                None => builder.push_char(c),
            }
        }
        for code in suffix.into_iter().rev() {
            builder.push_marker(MARKER_CLOSING, code);
        }
        Ok(builder.finish())
    }

    /// Insert a fragment at a coded-text position.
    pub fn insert(&mut self, position: usize, fragment: &TextFragment) -> Result<()> {
        let items = self.items();
        if position > self.len() {
            return Err(ContentError::position(format!(
                "insertion point {} beyond length {}",
                position,
                self.len()
            )));
        }
        check_boundary(&items, position)?;
        let split = items.partition_point(|(pos, _)| *pos < position);
        let mut builder = FragmentBuilder::default();
        builder.push_items(self, &items[..split]);
        builder.push_items(fragment, &fragment.items());
        builder.push_items(self, &items[split..]);
        let last_code_id = self.last_code_id.max(fragment.last_code_id);
        *self = builder.finish();
        self.last_code_id = self.last_code_id.max(last_code_id);
        Ok(())
    }

    /// Remove the coded text between `start` (inclusive) and `end` (exclusive).
    ///
    /// Codes whose markers are removed are dropped; a remaining half of a
    /// pair becomes isolated.
    pub fn remove(&mut self, start: usize, end: usize) -> Result<()> {
        let items = self.items();
        if start > end || end > self.len() {
            return Err(ContentError::position(format!(
                "cannot remove range {}..{} of fragment of length {}",
                start,
                end,
                self.len()
            )));
        }
        check_boundary(&items, start)?;
        check_boundary(&items, end)?;
        let partners = marker_partners(&items, &self.codes);
        let removed = |pos: usize| pos >= start && pos < end;
        let kept: Vec<(usize, Item)> = items
            .iter()
            .enumerate()
            .filter(|(_, (pos, _))| !removed(*pos))
            .map(|(i, &(pos, item))| match (item, partners[i]) {
                (Item::Marker { index, .. }, Some(p)) if removed(items[p].0) => {
                    (pos, Item::Marker { kind: MARKER_ISOLATED, index })
                }
                _ => (pos, item),
            })
            .collect();
        let last_code_id = self.last_code_id;
        let mut builder = FragmentBuilder::default();
        builder.push_items(self, &kept);
        *self = builder.finish();
        self.last_code_id = self.last_code_id.max(last_code_id);
        self.balance_markers();
        Ok(())
    }

    /// Re-pair markers: an opening code followed by its closing code gets
    /// opening/closing markers and placeholders get isolated markers.
    ///
    /// A lone opening or closing marker keeps its kind, so a code that was
    /// unpaired before a split is still unpaired after the join.
    pub fn balance_markers(&mut self) {
        let items = self.items();
        let partners = balance_partners(&items, &self.codes);
        let mut chars: Vec<char> = self.text.chars().collect();
        for (i, (pos, item)) in items.iter().enumerate() {
            let Item::Marker { kind, index } = *item else {
                continue;
            };
            if kind == MARKER_SEGMENT {
                continue;
            }
            let Some(code) = self.codes.get(index) else {
                continue;
            };
            chars[*pos] = match (code.tag_type, partners[i]) {
                (TagType::Opening, Some(_)) => MARKER_OPENING,
                (TagType::Closing, Some(_)) => MARKER_CLOSING,
                (TagType::Placeholder, _) => MARKER_ISOLATED,
                _ => kind,
            };
        }
        self.text = chars.into_iter().collect();
    }

    /// Opening or closing codes that have no counterpart in this fragment
    pub fn unbalanced_codes(&self) -> Vec<&Code> {
        let items = self.items();
        let partners = balance_partners(&items, &self.codes);
        items
            .iter()
            .enumerate()
            .filter_map(|(i, (_, item))| match *item {
                Item::Marker { index, .. } => self.codes.get(index).filter(|code| {
                    code.tag_type != TagType::Placeholder && partners[i].is_none()
                }),
                Item::Char(_) => None,
            })
            .collect()
    }

    /// Check that every opening code has its closing code and vice versa.
    pub fn check_balance(&self) -> Result<()> {
        let unbalanced = self.unbalanced_codes();
        if unbalanced.is_empty() {
            return Ok(());
        }
        let ids: Vec<String> = unbalanced.iter().map(|c| c.id.to_string()).collect();
        Err(ContentError::CodeMismatch(format!(
            "unpaired code id(s): {}",
            ids.join(", ")
        )))
    }

    /// The text without any code
    pub fn plain_text(&self) -> String {
        self.items()
            .iter()
            .filter_map(|(_, item)| match item {
                Item::Char(c) => Some(*c),
                Item::Marker { .. } => None,
            })
            .collect()
    }

    /// Number of characters of the text without codes
    pub fn visible_len(&self) -> usize {
        self.plain_text().chars().count()
    }

    /// Elements of the coded text with their positions
    pub(crate) fn items(&self) -> Vec<(usize, Item)> {
        let mut items = Vec::new();
        let mut chars = self.text.chars().enumerate();
        while let Some((pos, c)) = chars.next() {
            if is_marker(c) {
                match chars.next().and_then(|(_, ic)| char_to_index(ic)) {
                    Some(index) => items.push((pos, Item::Marker { kind: c, index })),
                    None => warn!("Truncated inline code marker at position {}", pos),
                }
            } else {
                items.push((pos, Item::Char(c)));
            }
        }
        items
    }

    fn next_code_id(&mut self) -> i32 {
        self.last_code_id += 1;
        self.last_code_id
    }

    /// Id of the last opening code with this label that is not closed yet
    fn open_code_id(&self, label: Option<&str>) -> Option<i32> {
        let mut open: Vec<&Code> = Vec::new();
        for code in &self.codes {
            match code.tag_type {
                TagType::Opening => open.push(code),
                TagType::Closing => {
                    if let Some(i) = open.iter().rposition(|c| c.id == code.id) {
                        open.remove(i);
                    }
                }
                TagType::Placeholder => {}
            }
        }
        open.iter()
            .rev()
            .find(|c| c.label.as_deref() == label)
            .map(|c| c.id)
    }
}

/// Fails if `position` falls between a marker and its index character
fn check_boundary(items: &[(usize, Item)], position: usize) -> Result<()> {
    let inside = items
        .iter()
        .any(|(pos, item)| matches!(item, Item::Marker { .. }) && pos + 1 == position);
    if inside {
        return Err(ContentError::position(format!(
            "position {} is inside an inline code marker",
            position
        )));
    }
    Ok(())
}

/// For each item, the item index of the marker it is paired with by marker kind
fn marker_partners(items: &[(usize, Item)], codes: &[Code]) -> Vec<Option<usize>> {
    pair_items(items, codes, |kind, code| {
        (kind == MARKER_OPENING, kind == MARKER_CLOSING && code.tag_type == TagType::Closing)
    })
}

/// For each item, the item index of the marker it is paired with by code tag type
fn balance_partners(items: &[(usize, Item)], codes: &[Code]) -> Vec<Option<usize>> {
    pair_items(items, codes, |kind, code| {
        let eligible = kind != MARKER_SEGMENT;
        (
            eligible && code.tag_type == TagType::Opening,
            eligible && code.tag_type == TagType::Closing,
        )
    })
}

fn pair_items(
    items: &[(usize, Item)],
    codes: &[Code],
    classify: impl Fn(char, &Code) -> (bool, bool),
) -> Vec<Option<usize>> {
    let mut partners = vec![None; items.len()];
    let mut used: HashSet<usize> = HashSet::new();
    for i in 0..items.len() {
        let Item::Marker { kind, index } = items[i].1 else {
            continue;
        };
        let Some(code) = codes.get(index) else {
            continue;
        };
        if !classify(kind, code).0 {
            continue;
        }
        let found = (i + 1..items.len()).find(|&j| {
            if used.contains(&j) {
                return false;
            }
            match items[j].1 {
                Item::Marker { kind, index } => codes
                    .get(index)
                    .is_some_and(|other| classify(kind, other).1 && other.id == code.id),
                Item::Char(_) => false,
            }
        });
        if let Some(j) = found {
            used.insert(j);
            partners[i] = Some(j);
            partners[j] = Some(i);
        }
    }
    partners
}

fn validate_coded_text(coded_text: &str, codes: &[Code]) -> Result<()> {
    let mut references = vec![0usize; codes.len()];
    let mut chars = coded_text.chars().enumerate();
    while let Some((pos, c)) = chars.next() {
        if !is_marker(c) {
            continue;
        }
        let index = chars
            .next()
            .and_then(|(_, ic)| char_to_index(ic))
            .ok_or_else(|| ContentError::CodeMismatch(format!("truncated marker at position {}", pos)))?;
        match references.get_mut(index) {
            Some(count) => *count += 1,
            None => {
                return Err(ContentError::CodeMismatch(format!(
                    "marker at position {} references code index {} but only {} code(s) exist",
                    pos,
                    index,
                    codes.len()
                )));
            }
        }
    }
    if let Some(index) = references.iter().position(|count| *count != 1) {
        return Err(ContentError::CodeMismatch(format!(
            "code index {} is referenced {} time(s) in the coded text",
            index, references[index]
        )));
    }
    Ok(())
}

impl PartialEq for TextFragment {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.codes == other.codes
    }
}

impl Eq for TextFragment {}

impl fmt::Display for TextFragment {
    /// Text with each code replaced by its native data
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (_, item) in self.items() {
            match item {
                Item::Char(c) => write!(f, "{}", c)?,
                Item::Marker { index, .. } => {
                    if let Some(code) = self.codes.get(index) {
                        write!(f, "{}", code)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl From<&str> for TextFragment {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_string(),
            codes: Vec::new(),
            last_code_id: 0,
        }
    }
}

impl From<String> for TextFragment {
    fn from(text: String) -> Self {
        Self {
            text,
            codes: Vec::new(),
            last_code_id: 0,
        }
    }
}

impl TryFrom<RawFragment> for TextFragment {
    type Error = ContentError;

    fn try_from(raw: RawFragment) -> Result<Self> {
        Self::from_coded_text(&raw.coded_text, raw.codes)
    }
}

impl From<TextFragment> for RawFragment {
    fn from(fragment: TextFragment) -> Self {
        Self {
            coded_text: fragment.text,
            codes: fragment.codes,
        }
    }
}
