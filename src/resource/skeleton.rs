/*!
 * Skeletons: format data kept around a text unit's content.
 *
 * A skeleton belongs to the format reader that created it. The content model
 * stores it and hands it back without looking inside.
 */

use std::any::Any;
use std::fmt;

/// Opaque per-unit data owned by a format collaborator
pub trait Skeleton: fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

/// One element of a generic skeleton
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkeletonPart {
    /// Literal native data written as-is
    Text(String),
    /// Where the content of the unit goes
    Content,
}

/// Ordered literal data and content placeholders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericSkeleton {
    parts: Vec<SkeletonPart>,
}

impl GenericSkeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add literal data, merged with the previous literal if any
    pub fn add(&mut self, data: &str) {
        if let Some(SkeletonPart::Text(last)) = self.parts.last_mut() {
            last.push_str(data);
        } else {
            self.parts.push(SkeletonPart::Text(data.to_string()));
        }
    }

    pub fn add_content_placeholder(&mut self) {
        self.parts.push(SkeletonPart::Content);
    }

    pub fn parts(&self) -> &[SkeletonPart] {
        &self.parts
    }

    /// Write the skeleton with each placeholder replaced by `content`
    pub fn render(&self, content: &str) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                SkeletonPart::Text(text) => text.as_str(),
                SkeletonPart::Content => content,
            })
            .collect()
    }
}

impl Skeleton for GenericSkeleton {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for GenericSkeleton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render("[$$self$]"))
    }
}
