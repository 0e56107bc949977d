/*!
 * Variant sources: per-target-locale forks of the default source.
 */

use indexmap::IndexMap;

use crate::locale::LocaleId;
use crate::resource::container::TextContainer;
use crate::resource::options::CreateOptions;
use crate::resource::text_unit::derive_container;

/// Source containers used instead of the default source for some target locales
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantSources {
    sources: IndexMap<LocaleId, TextContainer>,
}

impl VariantSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, locale: &LocaleId) -> Option<&TextContainer> {
        self.sources.get(locale)
    }

    pub fn get_mut(&mut self, locale: &LocaleId) -> Option<&mut TextContainer> {
        self.sources.get_mut(locale)
    }

    pub fn has_variant(&self, locale: &LocaleId) -> bool {
        self.sources.contains_key(locale)
    }

    pub fn locales(&self) -> impl Iterator<Item = &LocaleId> {
        self.sources.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LocaleId, &TextContainer)> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Set the variant source for a locale, returning the one it replaces
    pub fn set(&mut self, locale: LocaleId, source: TextContainer) -> Option<TextContainer> {
        self.sources.insert(locale, source)
    }

    pub fn remove(&mut self, locale: &LocaleId) -> Option<TextContainer> {
        self.sources.shift_remove(locale)
    }

    /// Create a variant source for a locale from the default source.
    ///
    /// An existing variant is returned unchanged unless `overwrite` is set.
    pub fn create(
        &mut self,
        locale: &LocaleId,
        default_source: &TextContainer,
        overwrite: bool,
        options: CreateOptions,
    ) -> &mut TextContainer {
        if overwrite {
            self.sources
                .insert(locale.clone(), derive_container(default_source, options));
        }
        self.sources
            .entry(locale.clone())
            .or_insert_with(|| derive_container(default_source, options))
    }
}
