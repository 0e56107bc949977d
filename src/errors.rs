/*!
 * Error types for the segalign library and application.
 *
 * The content model reports failures through `ContentError`, one variant per
 * distinguishable failure kind, using the thiserror crate for ergonomic error
 * definitions. The application layer adds file and configuration context
 * with anyhow.
 */

use thiserror::Error;

/// Result alias used by all content model operations
pub type Result<T> = std::result::Result<T, ContentError>;

/// Errors that can occur when manipulating fragments, containers and text units
#[derive(Error, Debug)]
pub enum ContentError {
    /// A segment or part index outside the current range
    #[error("Invalid index: {index} (count is {count})")]
    InvalidIndex {
        /// The index that was requested
        index: usize,
        /// Number of addressable items at the time of the call
        count: usize,
    },

    /// A character position or range that cannot be used
    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    /// Source and target segment counts differ for a positional alignment
    #[error("Misalignment for '{locale}': {source_count} source segment(s) vs {target_count} target segment(s)")]
    MisAlignment {
        /// Target locale being aligned
        locale: String,
        /// Number of source segments
        source_count: usize,
        /// Number of target segments
        target_count: usize,
    },

    /// Coded text and code list do not agree
    #[error("Inline code mismatch: {0}")]
    CodeMismatch(String),

    /// No segment with the given identifier
    #[error("Segment not found: '{0}'")]
    SegmentNotFound(String),

    /// No target container for the given locale
    #[error("No target content for '{0}'")]
    TargetNotFound(String),

    /// Neither a source nor a target segment was supplied
    #[error("At least one of the source or target segments must be provided")]
    MissingSegments,

    /// The variant options asked to cancel rather than touch a shared source
    #[error("Operation cancelled: the source of '{0}' is shared by other targets")]
    OperationCancelled(String),

    /// Events out of order in a resource stream
    #[error("Invalid event sequence: {0}")]
    EventSequence(String),

    /// Invalid locale identifier
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    /// A segmentation rule that is not a valid regular expression
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Serialization of codes or records failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ContentError {
    /// Shorthand for an `InvalidPosition` error with a formatted message
    pub(crate) fn position(message: impl Into<String>) -> Self {
        Self::InvalidPosition(message.into())
    }
}
