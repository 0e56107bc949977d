/*!
 * Resource events exchanged between format readers, processing steps and writers.
 *
 * A reader produces a flat stream of events. Start and end events must nest
 * properly, and text units and document parts may only appear inside a
 * document. `EventSequenceValidator` checks a stream as it goes by.
 */

use log::trace;
use std::fmt;

use crate::errors::{ContentError, Result};
use crate::resource::TextUnit;

/// One event of a resource stream
#[derive(Debug, Clone)]
pub enum Event {
    StartDocument { id: String, name: Option<String> },
    EndDocument,
    StartSubDocument { id: String },
    EndSubDocument,
    StartGroup { id: String },
    EndGroup,
    TextUnit(Box<TextUnit>),
    /// Non-translatable material between text units
    DocumentPart { id: String, data: String },
}

impl Event {
    pub fn text_unit(unit: TextUnit) -> Self {
        Self::TextUnit(Box::new(unit))
    }

    pub fn as_text_unit(&self) -> Option<&TextUnit> {
        match self {
            Self::TextUnit(unit) => Some(&**unit),
            _ => None,
        }
    }

    pub fn as_text_unit_mut(&mut self) -> Option<&mut TextUnit> {
        match self {
            Self::TextUnit(unit) => Some(&mut **unit),
            _ => None,
        }
    }

    fn kind(&self) -> EventKind {
        match self {
            Self::StartDocument { .. } | Self::EndDocument => EventKind::Document,
            Self::StartSubDocument { .. } | Self::EndSubDocument => EventKind::SubDocument,
            Self::StartGroup { .. } | Self::EndGroup => EventKind::Group,
            Self::TextUnit(_) | Self::DocumentPart { .. } => EventKind::Content,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartDocument { id, .. } => write!(f, "START_DOCUMENT({})", id),
            Self::EndDocument => write!(f, "END_DOCUMENT"),
            Self::StartSubDocument { id } => write!(f, "START_SUBDOCUMENT({})", id),
            Self::EndSubDocument => write!(f, "END_SUBDOCUMENT"),
            Self::StartGroup { id } => write!(f, "START_GROUP({})", id),
            Self::EndGroup => write!(f, "END_GROUP"),
            Self::TextUnit(unit) => write!(f, "TEXT_UNIT({})", unit.id()),
            Self::DocumentPart { id, .. } => write!(f, "DOCUMENT_PART({})", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    Document,
    SubDocument,
    Group,
    Content,
}

/// Checks that a stream of events nests properly
#[derive(Debug, Default)]
pub struct EventSequenceValidator {
    open: Vec<EventKind>,
    documents: usize,
}

impl EventSequenceValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the next event of the stream
    ///
    /// # Errors
    /// `ContentError::EventSequence` if the event cannot come at this point.
    pub fn check(&mut self, event: &Event) -> Result<()> {
        trace!("Checking event {}", event);
        let kind = event.kind();
        match event {
            Event::StartDocument { .. } => {
                if !self.open.is_empty() {
                    return Err(ContentError::EventSequence(format!("{} inside another document", event)));
                }
                self.open.push(kind);
                self.documents += 1;
            }
            Event::StartSubDocument { .. } | Event::StartGroup { .. } => {
                self.require_document(event)?;
                if kind == EventKind::SubDocument && self.open.contains(&EventKind::SubDocument) {
                    return Err(ContentError::EventSequence(format!("{} inside another sub-document", event)));
                }
                self.open.push(kind);
            }
            Event::EndDocument | Event::EndSubDocument | Event::EndGroup => match self.open.pop() {
                Some(open) if open == kind => {}
                Some(open) => {
                    return Err(ContentError::EventSequence(format!(
                        "{} while a {:?} is still open",
                        event, open
                    )));
                }
                None => return Err(ContentError::EventSequence(format!("{} without start", event))),
            },
            Event::TextUnit(_) | Event::DocumentPart { .. } => self.require_document(event)?,
        }
        Ok(())
    }

    /// Check that the stream ended with everything closed
    pub fn finish(&self) -> Result<()> {
        match self.open.last() {
            Some(open) => Err(ContentError::EventSequence(format!("{:?} not closed at end of stream", open))),
            None => Ok(()),
        }
    }

    /// Number of documents started so far
    pub fn document_count(&self) -> usize {
        self.documents
    }

    fn require_document(&self, event: &Event) -> Result<()> {
        if self.open.is_empty() {
            return Err(ContentError::EventSequence(format!("{} outside of a document", event)));
        }
        Ok(())
    }
}

/// Check a whole event stream
pub fn validate_events<'a>(events: impl IntoIterator<Item = &'a Event>) -> Result<()> {
    let mut validator = EventSequenceValidator::new();
    for event in events {
        validator.check(event)?;
    }
    validator.finish()
}
