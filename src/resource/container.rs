/*!
 * Text containers: one locale's view of a text unit's content.
 *
 * A container holds an ordered list of parts, some of them segments. When the
 * container has never been segmented it holds exactly one part. The list is
 * never empty: removing the last part leaves a single empty segment.
 */

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{ContentError, Result};
use crate::resource::annotation::Annotations;
use crate::resource::fragment::TextFragment;
use crate::resource::part::{Range, Segment, TextPart};
use crate::resource::property::{Properties, Property};

/// Whether a container's segmentation is known to match its counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentStatus {
    #[default]
    NotAligned,
    Aligned,
    AlignedManually,
}

impl AlignmentStatus {
    pub fn is_aligned(self) -> bool {
        matches!(self, Self::Aligned | Self::AlignedManually)
    }
}

impl fmt::Display for AlignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotAligned => "not aligned",
            Self::Aligned => "aligned",
            Self::AlignedManually => "aligned manually",
        };
        write!(f, "{}", name)
    }
}

/// Ordered parts of content with their segmentation state
#[derive(Debug, Clone)]
pub struct TextContainer {
    pub(crate) parts: Vec<TextPart>,
    pub(crate) segmented: bool,
    alignment_status: AlignmentStatus,
    properties: Properties,
    annotations: Annotations,
}

impl TextContainer {
    /// Create a container with a single empty segment
    pub fn new() -> Self {
        Self::from_fragment(TextFragment::new())
    }

    /// Create a container with a single segment holding plain text
    pub fn from_text(text: &str) -> Self {
        Self::from_fragment(TextFragment::from(text))
    }

    /// Create a container with a single segment holding a fragment
    pub fn from_fragment(fragment: TextFragment) -> Self {
        Self {
            parts: vec![TextPart::Segment(Segment::new("0", fragment))],
            segmented: false,
            alignment_status: AlignmentStatus::NotAligned,
            properties: Properties::new(),
            annotations: Annotations::new(),
        }
    }

    /// Create a container from an existing part list.
    ///
    /// Segment ids are validated in order. An empty list gives an empty container.
    pub fn from_parts(parts: Vec<TextPart>, segmented: bool) -> Self {
        let mut container = Self::new();
        if parts.is_empty() {
            return container;
        }
        container.segmented = segmented || parts.len() > 1;
        container.parts = parts;
        for index in 0..container.parts.len() {
            fix_segment_id(&mut container.parts[..=index], index);
        }
        container
    }

    pub fn parts(&self) -> &[TextPart] {
        &self.parts
    }

    pub fn part(&self, index: usize) -> Option<&TextPart> {
        self.parts.get(index)
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Whether the content has been segmented (more than one part, or segmentation applied)
    pub fn is_segmented(&self) -> bool {
        self.segmented
    }

    pub fn alignment_status(&self) -> AlignmentStatus {
        self.alignment_status
    }

    pub fn set_alignment_status(&mut self, status: AlignmentStatus) {
        self.alignment_status = status;
    }

    /// Whether all parts are empty
    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(|p| p.content().is_empty())
    }

    /// Whether any part has text outside of its codes
    pub fn has_text(&self, whitespace_is_text: bool) -> bool {
        self.parts.iter().any(|p| p.content().has_text(whitespace_is_text))
    }

    /// Content of all parts in a single fragment, markers re-paired across part boundaries
    pub fn joined_content(&self) -> TextFragment {
        self.create_joined_content(None)
    }

    /// Replace all parts with a single, unsegmented segment
    pub fn set_content(&mut self, fragment: TextFragment) {
        let id = self
            .parts
            .iter()
            .find_map(TextPart::id)
            .unwrap_or("0")
            .to_string();
        self.parts = vec![TextPart::Segment(Segment::new(id, fragment))];
        self.segmented = false;
    }

    /// Append plain text to the last part
    pub fn append_str(&mut self, text: &str) {
        if let Some(last) = self.parts.last_mut() {
            last.content_mut().append_str(text);
        }
    }

    /// Append a fragment to the last part
    pub fn append_fragment(&mut self, fragment: &TextFragment) {
        if let Some(last) = self.parts.last_mut() {
            last.content_mut().append_fragment(fragment);
        }
    }

    /// Append a part. A segment gets its id validated.
    pub fn append_part(&mut self, part: TextPart) {
        self.parts.push(part);
        let index = self.parts.len() - 1;
        fix_segment_id(&mut self.parts, index);
        self.segmented = true;
    }

    /// Insert a part before `index` (or at the end if `index` equals the part count)
    pub fn insert_part(&mut self, index: usize, part: TextPart) -> Result<()> {
        if index > self.parts.len() {
            return Err(ContentError::InvalidIndex {
                index,
                count: self.parts.len(),
            });
        }
        self.parts.insert(index, part);
        fix_segment_id(&mut self.parts, index);
        self.segmented = true;
        Ok(())
    }

    /// Remove the part at `index` and return it
    pub fn remove_part(&mut self, index: usize) -> Result<TextPart> {
        if index >= self.parts.len() {
            return Err(ContentError::InvalidIndex {
                index,
                count: self.parts.len(),
            });
        }
        let removed = self.parts.remove(index);
        if self.parts.is_empty() {
            self.parts.push(TextPart::Segment(Segment::empty("0")));
            self.segmented = false;
        }
        Ok(removed)
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub fn set_property(&mut self, property: Property) -> &mut Property {
        self.properties.set(property)
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn annotations_mut(&mut self) -> &mut Annotations {
        &mut self.annotations
    }

    /// Deep copy, with or without the properties
    pub fn clone_with(&self, copy_properties: bool) -> Self {
        let mut copy = self.clone();
        if !copy_properties {
            copy.properties.clear();
        }
        copy
    }

    /// Join all parts, recording segment boundaries in `ranges` if given
    pub(crate) fn create_joined_content(&self, mut ranges: Option<&mut Vec<Range>>) -> TextFragment {
        if let Some(ranges) = ranges.as_deref_mut() {
            ranges.clear();
        }
        let mut joined = TextFragment::new();
        for part in &self.parts {
            let start = joined.len();
            joined.append_fragment(part.content());
            if let (Some(ranges), TextPart::Segment(segment)) = (ranges.as_deref_mut(), part) {
                ranges.push(Range::with_id(start, joined.len(), segment.id.clone()));
            }
        }
        joined.balance_markers();
        joined
    }
}

/// Give the segment at `index` a new id if its id is empty or used by
/// another segment of `parts`: one more than the highest numeric id.
pub(crate) fn fix_segment_id(parts: &mut [TextPart], index: usize) {
    let Some(id) = parts.get(index).and_then(TextPart::id) else {
        return;
    };
    let duplicate = id.is_empty()
        || parts
            .iter()
            .enumerate()
            .any(|(i, p)| i != index && p.id() == Some(id));
    if !duplicate {
        return;
    }
    let next = parts
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .filter_map(|(_, p)| p.id())
        .filter_map(|id| id.parse::<u64>().ok())
        .map(|n| n + 1)
        .max()
        .unwrap_or(0);
    debug!("Segment id '{}' is empty or already used, assigning '{}'", id, next);
    if let Some(segment) = parts[index].as_segment_mut() {
        segment.id = next.to_string();
    }
}

impl Default for TextContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for TextContainer {
    fn eq(&self, other: &Self) -> bool {
        self.parts == other.parts
            && self.segmented == other.segmented
            && self.alignment_status == other.alignment_status
            && self.properties == other.properties
    }
}

impl fmt::Display for TextContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

impl From<&str> for TextContainer {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}
