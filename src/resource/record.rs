/*!
 * Persistence records for text units.
 *
 * A container is stored as its joined coded text and code list, plus the
 * boundaries and ids of its segments. Loading a record rebuilds the same
 * segmentation, properties and alignment status.
 */

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::locale::LocaleId;
use crate::resource::code::Code;
use crate::resource::container::{AlignmentStatus, TextContainer};
use crate::resource::fragment::TextFragment;
use crate::resource::part::Range;
use crate::resource::property::Properties;
use crate::resource::text_unit::TextUnit;

/// Stored form of a container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerRecord {
    // @field: Joined coded text of all parts
    pub coded_text: String,

    // @field: Codes referenced by the coded text
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub codes: Vec<Code>,

    // @field: Segment boundaries and ids in the coded text
    pub segments: Vec<Range>,

    #[serde(default)]
    pub segmented: bool,

    #[serde(default)]
    pub alignment_status: AlignmentStatus,

    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
}

impl ContainerRecord {
    pub fn from_container(container: &TextContainer) -> Self {
        let mut segments = Vec::new();
        let joined = container.create_joined_content(Some(&mut segments));
        Self {
            coded_text: joined.coded_text().to_string(),
            codes: joined.codes().to_vec(),
            segments,
            segmented: container.is_segmented(),
            alignment_status: container.alignment_status(),
            properties: container.properties().clone(),
        }
    }

    /// Rebuild the container
    ///
    /// # Errors
    /// `ContentError::CodeMismatch` if the coded text and the codes disagree,
    /// `ContentError::InvalidPosition` if a segment range does not fit.
    pub fn to_container(&self) -> Result<TextContainer> {
        let content = TextFragment::from_coded_text(&self.coded_text, self.codes.clone())?;
        let mut container = TextContainer::from_fragment(content);
        container.create(&self.segments)?;
        container.segmented = self.segmented;
        container.set_alignment_status(self.alignment_status);
        *container.properties_mut() = self.properties.clone();
        Ok(container)
    }
}

/// Stored form of a text unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextUnitRecord {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    #[serde(default = "default_translatable")]
    pub translatable: bool,

    #[serde(default)]
    pub preserve_whitespaces: bool,

    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,

    pub source: ContainerRecord,

    // @field: Targets by locale, in creation order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub targets: IndexMap<LocaleId, ContainerRecord>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub variant_sources: IndexMap<LocaleId, ContainerRecord>,
}

fn default_translatable() -> bool {
    true
}

impl TextUnit {
    /// Stored form of this unit. Skeleton and annotations are not part of it.
    pub fn to_record(&self) -> TextUnitRecord {
        TextUnitRecord {
            id: self.id().to_string(),
            name: self.name().map(str::to_string),
            unit_type: self.unit_type().map(str::to_string),
            mime_type: self.mime_type().map(str::to_string),
            translatable: self.is_translatable(),
            preserve_whitespaces: self.preserve_whitespaces(),
            properties: self.properties().clone(),
            source: ContainerRecord::from_container(&self.source),
            targets: self
                .targets
                .iter()
                .map(|(locale, target)| (locale.clone(), ContainerRecord::from_container(target)))
                .collect(),
            variant_sources: self
                .variant_sources
                .iter()
                .map(|(locale, source)| (locale.clone(), ContainerRecord::from_container(source)))
                .collect(),
        }
    }

    /// Rebuild a unit from its stored form
    pub fn from_record(record: &TextUnitRecord) -> Result<Self> {
        let mut unit = TextUnit::with_source(&record.id, record.source.to_container()?);
        unit.set_name(record.name.as_deref());
        unit.set_unit_type(record.unit_type.as_deref());
        unit.set_mime_type(record.mime_type.as_deref());
        unit.set_translatable(record.translatable);
        unit.set_preserve_whitespaces(record.preserve_whitespaces);
        *unit.properties_mut() = record.properties.clone();
        for (locale, target) in &record.targets {
            unit.set_target(locale.clone(), target.to_container()?);
        }
        for (locale, source) in &record.variant_sources {
            unit.variant_sources_mut().set(locale.clone(), source.to_container()?);
        }
        Ok(unit)
    }
}
