/*!
 * Parts of a container: plain text parts and identified segments.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::resource::fragment::TextFragment;

/// An identified, independently addressable unit of content
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Segment {
    /// Identifier, unique within the owning container
    pub id: String,

    /// Content of the segment
    pub text: TextFragment,
}

impl Segment {
    /// Create a segment. An empty id is replaced when the segment is added to a container.
    pub fn new(id: impl Into<String>, text: TextFragment) -> Self {
        Self {
            id: id.into(),
            text,
        }
    }

    /// Create an empty segment with a given id
    pub fn empty(id: impl Into<String>) -> Self {
        Self::new(id, TextFragment::new())
    }

    /// Create a segment without id, to be assigned by the container
    pub fn unnamed(text: TextFragment) -> Self {
        Self::new(String::new(), text)
    }
}

/// One element of a container's part list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPart {
    /// Inter-segment material without identity
    Text(TextFragment),
    /// Identified segment
    Segment(Segment),
}

impl TextPart {
    pub fn content(&self) -> &TextFragment {
        match self {
            Self::Text(fragment) => fragment,
            Self::Segment(segment) => &segment.text,
        }
    }

    pub fn content_mut(&mut self) -> &mut TextFragment {
        match self {
            Self::Text(fragment) => fragment,
            Self::Segment(segment) => &mut segment.text,
        }
    }

    pub fn into_content(self) -> TextFragment {
        match self {
            Self::Text(fragment) => fragment,
            Self::Segment(segment) => segment.text,
        }
    }

    pub fn is_segment(&self) -> bool {
        matches!(self, Self::Segment(_))
    }

    pub fn as_segment(&self) -> Option<&Segment> {
        match self {
            Self::Segment(segment) => Some(segment),
            Self::Text(_) => None,
        }
    }

    pub fn as_segment_mut(&mut self) -> Option<&mut Segment> {
        match self {
            Self::Segment(segment) => Some(segment),
            Self::Text(_) => None,
        }
    }

    /// Id of the part if it is a segment
    pub fn id(&self) -> Option<&str> {
        self.as_segment().map(|s| s.id.as_str())
    }
}

impl From<Segment> for TextPart {
    fn from(segment: Segment) -> Self {
        Self::Segment(segment)
    }
}

impl From<TextFragment> for TextPart {
    fn from(fragment: TextFragment) -> Self {
        Self::Text(fragment)
    }
}

impl fmt::Display for TextPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.content())
    }
}

/// A span of coded text, optionally carrying a segment id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    /// Start position (inclusive), in coded-text characters
    pub start: usize,
    /// End position (exclusive)
    pub end: usize,
    /// Id to give the segment created from this range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end, id: None }
    }

    pub fn with_id(start: usize, end: usize, id: impl Into<String>) -> Self {
        Self {
            start,
            end,
            id: Some(id.into()),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}
