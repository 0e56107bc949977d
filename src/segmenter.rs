/*!
 * Sentence segmentation of container content.
 *
 * A segmenter only computes segment boundaries; applying them is left to
 * `TextContainer::create` or to the alignment engine.
 */

use log::trace;
use regex::Regex;

use crate::app_config::SegmentationConfig;
use crate::errors::{ContentError, Result};
use crate::resource::fragment::is_marker;
use crate::resource::{Range, TextContainer};

/// Computes segment boundaries in the joined content of a container
pub trait Segmenter: Send + Sync {
    /// Ranges in coded-text positions, ordered and not overlapping
    fn compute_ranges(&self, container: &TextContainer) -> Vec<Range>;
}

/// Breaks after each match of a break pattern unless an exception pattern
/// matches the text before the break
#[derive(Debug, Clone)]
pub struct RegexSegmenter {
    break_rule: Regex,
    exception_rule: Option<Regex>,
    include_trailing_whitespace: bool,
}

impl RegexSegmenter {
    pub fn new(break_pattern: &str, exception_pattern: Option<&str>, include_trailing_whitespace: bool) -> Result<Self> {
        let break_rule = compile(break_pattern)?;
        let exception_rule = exception_pattern.map(compile).transpose()?;
        Ok(Self {
            break_rule,
            exception_rule,
            include_trailing_whitespace,
        })
    }

    pub fn from_config(config: &SegmentationConfig) -> Result<Self> {
        Self::new(
            &config.break_pattern,
            config.exception_pattern.as_deref(),
            config.include_trailing_whitespace,
        )
    }

    /// Ranges for a coded text
    pub fn ranges_for(&self, coded: &str) -> Vec<Range> {
        let mut ranges = Vec::new();
        let mut start_byte = 0;

        for found in self.break_rule.find_iter(coded) {
            let end_byte = found.end();
            if end_byte <= start_byte {
                continue;
            }
            if coded[..end_byte].chars().next_back().is_some_and(is_marker) {
                continue;
            }
            if let Some(exception) = &self.exception_rule {
                if exception.is_match(&coded[..end_byte]) {
                    trace!("Break at byte {} cancelled by exception rule", end_byte);
                    continue;
                }
            }
            let segment_end = if self.include_trailing_whitespace {
                end_byte
            } else {
                start_byte + coded[start_byte..end_byte].trim_end().len()
            };
            if segment_end > start_byte {
                ranges.push(Range::new(char_pos(coded, start_byte), char_pos(coded, segment_end)));
            }
            start_byte = end_byte;
        }

        let rest = &coded[start_byte..];
        let end_byte = if self.include_trailing_whitespace {
            coded.len()
        } else {
            start_byte + rest.trim_end().len()
        };
        if end_byte > start_byte {
            ranges.push(Range::new(char_pos(coded, start_byte), char_pos(coded, end_byte)));
        }
        ranges
    }
}

impl Segmenter for RegexSegmenter {
    fn compute_ranges(&self, container: &TextContainer) -> Vec<Range> {
        let content = container.joined_content();
        self.ranges_for(content.coded_text())
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| ContentError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

fn char_pos(text: &str, byte: usize) -> usize {
    text[..byte].chars().count()
}
