/*!
 * Text units: one translatable unit with its source and per-locale targets.
 *
 * The source container exists from construction on. Target containers are
 * created on request from a copy of the source (or of the variant source for
 * that locale), inheriting content, properties and segmentation according to
 * `CreateOptions`.
 */

use indexmap::IndexMap;
use log::debug;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

use crate::locale::LocaleId;
use crate::resource::annotation::Annotations;
use crate::resource::container::{AlignmentStatus, TextContainer};
use crate::resource::fragment::TextFragment;
use crate::resource::options::CreateOptions;
use crate::resource::part::{Segment, TextPart};
use crate::resource::property::{Properties, Property};
use crate::resource::skeleton::Skeleton;
use crate::resource::variant::VariantSources;

/// A text unit shared between threads: one writer or many readers at a time
pub type SharedTextUnit = Arc<RwLock<TextUnit>>;

/// A translatable unit of content
#[derive(Debug, Clone)]
pub struct TextUnit {
    id: String,
    name: Option<String>,
    unit_type: Option<String>,
    mime_type: Option<String>,
    translatable: bool,
    preserve_whitespaces: bool,
    reference_count: u32,
    skeleton: Option<Arc<dyn Skeleton>>,
    properties: Properties,
    annotations: Annotations,
    pub(crate) source: TextContainer,
    pub(crate) targets: IndexMap<LocaleId, TextContainer>,
    pub(crate) variant_sources: VariantSources,
}

impl TextUnit {
    /// Create a unit with an empty source
    pub fn new(id: &str) -> Self {
        Self::with_text(id, "")
    }

    /// Create a unit whose source is a single segment of plain text
    pub fn with_text(id: &str, text: &str) -> Self {
        Self::with_source(id, TextContainer::from_text(text))
    }

    pub fn with_source(id: &str, source: TextContainer) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            unit_type: None,
            mime_type: None,
            translatable: true,
            preserve_whitespaces: false,
            reference_count: 0,
            skeleton: None,
            properties: Properties::new(),
            annotations: Annotations::new(),
            source,
            targets: IndexMap::new(),
            variant_sources: VariantSources::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    pub fn unit_type(&self) -> Option<&str> {
        self.unit_type.as_deref()
    }

    pub fn set_unit_type(&mut self, unit_type: Option<&str>) {
        self.unit_type = unit_type.map(str::to_string);
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn set_mime_type(&mut self, mime_type: Option<&str>) {
        self.mime_type = mime_type.map(str::to_string);
    }

    pub fn is_translatable(&self) -> bool {
        self.translatable
    }

    pub fn set_translatable(&mut self, translatable: bool) {
        self.translatable = translatable;
    }

    pub fn preserve_whitespaces(&self) -> bool {
        self.preserve_whitespaces
    }

    pub fn set_preserve_whitespaces(&mut self, preserve: bool) {
        self.preserve_whitespaces = preserve;
    }

    pub fn reference_count(&self) -> u32 {
        self.reference_count
    }

    pub fn set_reference_count(&mut self, count: u32) {
        self.reference_count = count;
    }

    /// Whether the unit is referenced from elsewhere and must not be deleted on its own
    pub fn is_referent(&self) -> bool {
        self.reference_count > 0
    }

    pub fn skeleton(&self) -> Option<&Arc<dyn Skeleton>> {
        self.skeleton.as_ref()
    }

    pub fn set_skeleton(&mut self, skeleton: Option<Arc<dyn Skeleton>>) {
        self.skeleton = skeleton;
    }

    /// Unit-level properties
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

    pub fn source_property(&self, name: &str) -> Option<&Property> {
        self.source.property(name)
    }

    pub fn set_source_property(&mut self, property: Property) -> &mut Property {
        self.source.set_property(property)
    }

    /// Property of the target for `locale`, without creating anything
    pub fn target_property(&self, locale: &LocaleId, name: &str) -> Option<&Property> {
        self.targets.get(locale)?.property(name)
    }

    /// Set a property on the target for `locale`.
    ///
    /// If there is no target for that locale yet, one is created first from
    /// the source with `CreateOptions::COPY_SEGMENTS` (segments, no content,
    /// no properties). This is the only accessor that creates a target as a
    /// side effect.
    pub fn set_target_property(&mut self, locale: &LocaleId, property: Property) -> &mut Property {
        self.create_target(locale, false, CreateOptions::COPY_SEGMENTS)
            .set_property(property)
    }

    /// Get or create a target property.
    ///
    /// A missing target is created empty: `options` only decide whether a
    /// new property takes the value of the source property of the same name
    /// (`COPY_PROPERTIES`) or starts empty.
    pub fn create_target_property(
        &mut self,
        locale: &LocaleId,
        name: &str,
        overwrite: bool,
        options: CreateOptions,
    ) -> &mut Property {
        let inherited = self
            .source_for(locale)
            .property(name)
            .filter(|_| options.contains(CreateOptions::COPY_PROPERTIES))
            .cloned();
        let make = move || inherited.unwrap_or_else(|| Property::new(name, ""));
        let properties = self.create_target(locale, false, CreateOptions::CREATE_EMPTY).properties_mut();
        if overwrite {
            properties.set(make())
        } else {
            properties.get_or_insert_with(name, make)
        }
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn annotations_mut(&mut self) -> &mut Annotations {
        &mut self.annotations
    }

    /// The default source
    pub fn source(&self) -> &TextContainer {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut TextContainer {
        &mut self.source
    }

    /// Replace the default source and return the previous one
    pub fn set_source(&mut self, source: TextContainer) -> TextContainer {
        std::mem::replace(&mut self.source, source)
    }

    /// Replace the source content with a single segment
    pub fn set_source_content(&mut self, fragment: TextFragment) -> &mut TextFragment {
        self.source.set_content(fragment);
        self.source.parts[0].content_mut()
    }

    /// Source used for a target locale: its variant if one exists, else the default source
    pub fn source_for(&self, locale: &LocaleId) -> &TextContainer {
        self.variant_sources.get(locale).unwrap_or(&self.source)
    }

    pub fn source_for_mut(&mut self, locale: &LocaleId) -> &mut TextContainer {
        match self.variant_sources.get_mut(locale) {
            Some(variant) => variant,
            None => &mut self.source,
        }
    }

    pub fn variant_sources(&self) -> &VariantSources {
        &self.variant_sources
    }

    pub fn variant_sources_mut(&mut self) -> &mut VariantSources {
        &mut self.variant_sources
    }

    pub fn has_variant_sources(&self) -> bool {
        !self.variant_sources.is_empty()
    }

    /// Create a variant source for `locale` from the default source
    pub fn create_source(&mut self, locale: &LocaleId, overwrite: bool, options: CreateOptions) -> &mut TextContainer {
        self.variant_sources.create(locale, &self.source, overwrite, options)
    }

    pub fn remove_source(&mut self, locale: &LocaleId) -> Option<TextContainer> {
        self.variant_sources.remove(locale)
    }

    pub fn target(&self, locale: &LocaleId) -> Option<&TextContainer> {
        self.targets.get(locale)
    }

    pub fn target_mut(&mut self, locale: &LocaleId) -> Option<&mut TextContainer> {
        self.targets.get_mut(locale)
    }

    pub fn has_target(&self, locale: &LocaleId) -> bool {
        self.targets.contains_key(locale)
    }

    /// Locales with a target, in creation order
    pub fn target_locales(&self) -> Vec<LocaleId> {
        self.targets.keys().cloned().collect()
    }

    pub fn targets(&self) -> impl Iterator<Item = (&LocaleId, &TextContainer)> {
        self.targets.iter()
    }

    /// Set the target for a locale and return the one it replaces
    pub fn set_target(&mut self, locale: LocaleId, container: TextContainer) -> Option<TextContainer> {
        self.targets.insert(locale, container)
    }

    pub fn remove_target(&mut self, locale: &LocaleId) -> Option<TextContainer> {
        self.targets.shift_remove(locale)
    }

    /// Get or create the target for a locale.
    ///
    /// An existing target is returned unchanged, whatever the options, unless
    /// `overwrite` is set. A new target is built from the source for that
    /// locale: see `CreateOptions` for what it inherits.
    pub fn create_target(&mut self, locale: &LocaleId, overwrite: bool, options: CreateOptions) -> &mut TextContainer {
        if overwrite || !self.targets.contains_key(locale) {
            debug!("Creating target '{}' for unit '{}' ({:?})", locale, self.id, options);
            let container = derive_container(self.source_for(locale), options);
            self.targets.insert(locale.clone(), container);
        }
        self.targets.entry(locale.clone()).or_default()
    }

    /// Replace the content of the target for `locale` with a single segment,
    /// creating the target if needed
    pub fn set_target_content(&mut self, locale: &LocaleId, fragment: TextFragment) -> &mut TextFragment {
        let target = self.create_target(locale, false, CreateOptions::CREATE_EMPTY);
        target.set_content(fragment);
        target.parts[0].content_mut()
    }

    /// Source segment with the given id.
    ///
    /// If it does not exist and `create` is set, an empty segment with that id
    /// is appended and returned. Without `create`, nothing is modified.
    pub fn get_source_segment(&mut self, id: &str, create: bool) -> Option<&mut Segment> {
        get_or_append(&mut self.source, id, create)
    }

    /// Target segment with the given id, for a locale.
    ///
    /// With `create`, the target is created if needed (segments copied from
    /// the source) and a missing segment is appended empty.
    pub fn get_target_segment(&mut self, locale: &LocaleId, id: &str, create: bool) -> Option<&mut Segment> {
        if !create {
            return self.targets.get_mut(locale)?.get_mut(id);
        }
        let target = self.create_target(locale, false, CreateOptions::COPY_SEGMENTS);
        get_or_append(target, id, true)
    }

    /// Wrap the unit for access from several threads
    pub fn into_shared(self) -> SharedTextUnit {
        Arc::new(RwLock::new(self))
    }
}

fn get_or_append<'a>(container: &'a mut TextContainer, id: &str, create: bool) -> Option<&'a mut Segment> {
    if create && container.get(id).is_none() {
        container.append_segment(Segment::empty(id), false);
    }
    container.get_mut(id)
}

/// Build a container from a source, inheriting what `options` asks for.
///
/// The copy starts not aligned.
pub(crate) fn derive_container(source: &TextContainer, options: CreateOptions) -> TextContainer {
    let mut container = source.clone_with(options.contains(CreateOptions::COPY_PROPERTIES));
    if !options.contains(CreateOptions::COPY_SEGMENTS) {
        container.join_all(None);
    }
    if !options.contains(CreateOptions::COPY_CONTENT) {
        for part in container.parts.iter_mut() {
            if let TextPart::Segment(segment) = part {
                segment.text.clear();
            }
        }
    }
    container.set_alignment_status(AlignmentStatus::NotAligned);
    container
}

impl fmt::Display for TextUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}
