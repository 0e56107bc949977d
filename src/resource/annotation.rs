/*!
 * Typed side data attached to resources.
 *
 * Annotations are looked up by their concrete type, so a resource holds at
 * most one annotation of each type.
 */

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

use crate::locale::LocaleId;
use crate::resource::fragment::TextFragment;

/// Side data that can be attached to a text unit or container
pub trait Annotation: fmt::Debug + Send + Sync + 'static {
    /// Boxed copy, used when the owning resource is cloned
    fn clone_box(&self) -> Box<dyn Annotation>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T> Annotation for T
where
    T: fmt::Debug + Clone + Send + Sync + 'static,
{
    fn clone_box(&self) -> Box<dyn Annotation> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Set of annotations, at most one per concrete type
#[derive(Debug, Default)]
pub struct Annotations {
    items: Vec<Box<dyn Annotation>>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Annotation of type `A`, if present
    pub fn get<A: Annotation>(&self) -> Option<&A> {
        self.items.iter().find_map(|a| (**a).as_any().downcast_ref::<A>())
    }

    pub fn get_mut<A: Annotation>(&mut self) -> Option<&mut A> {
        self.items
            .iter_mut()
            .find_map(|a| (**a).as_any_mut().downcast_mut::<A>())
    }

    /// Add an annotation, replacing any existing one of the same type
    pub fn set<A: Annotation>(&mut self, annotation: A) {
        self.items.retain(|a| !(**a).as_any().is::<A>());
        self.items.push(Box::new(annotation));
    }

    pub fn remove<A: Annotation>(&mut self) -> bool {
        let before = self.items.len();
        self.items.retain(|a| !(**a).as_any().is::<A>());
        before != self.items.len()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Clone for Annotations {
    fn clone(&self) -> Self {
        Self {
            items: self.items.iter().map(|a| (**a).clone_box()).collect(),
        }
    }
}

/// Origin of an alternate translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AltOrigin {
    /// Came with the input document
    Document,
    /// Produced by a translation memory lookup
    Memory,
    /// Produced by machine translation
    Machine,
}

/// One alternate translation for a segment or container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AltTranslation {
    pub source_locale: LocaleId,
    pub target_locale: LocaleId,
    pub source: TextFragment,
    pub target: TextFragment,
    pub origin: AltOrigin,
    /// Match score, 0 to 100
    pub score: u8,
}

/// Alternate translations, kept sorted by decreasing score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AltTranslationsAnnotation {
    entries: Vec<AltTranslation>,
}

impl AltTranslationsAnnotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, alt: AltTranslation) {
        let score = alt.score.min(100);
        let position = self.entries.partition_point(|e| e.score >= score);
        self.entries.insert(position, AltTranslation { score, ..alt });
    }

    /// Entry with the highest score
    pub fn best(&self) -> Option<&AltTranslation> {
        self.entries.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AltTranslation> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
