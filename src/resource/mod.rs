/*!
 * Content model for localizable text.
 *
 * This module holds the resource types exchanged between format readers,
 * writers and processing steps:
 *
 * - `code` and `fragment`: inline codes and coded text
 * - `part`, `container` and `segments`: parts, segments and their container
 * - `text_unit` and `variant`: units with source, variant sources and targets
 * - `aligned`: segment editing that keeps sources and targets in step
 * - `options`: flag sets selecting what an edit touches or copies
 * - `property`, `annotation` and `skeleton`: side data carried by units
 * - `format`, `util` and `record`: display, helpers and persistence
 */

// Re-export main types for easier usage
pub use self::aligned::{AlignedPair, AlignedSegments};
pub use self::annotation::{AltOrigin, AltTranslation, AltTranslationsAnnotation, Annotation, Annotations};
pub use self::code::{Code, TagType};
pub use self::container::{AlignmentStatus, TextContainer};
pub use self::format::GenericContent;
pub use self::fragment::TextFragment;
pub use self::options::{CopyOptions, CreateOptions, VariantOptions};
pub use self::part::{Range, Segment, TextPart};
pub use self::property::{Properties, Property};
pub use self::record::{ContainerRecord, TextUnitRecord};
pub use self::skeleton::{GenericSkeleton, Skeleton};
pub use self::text_unit::{SharedTextUnit, TextUnit};
pub use self::variant::VariantSources;

// Submodules
pub mod aligned;
pub mod annotation;
pub mod code;
pub mod container;
pub mod format;
pub mod fragment;
pub mod options;
pub mod part;
pub mod property;
pub mod record;
mod segments;
pub mod skeleton;
pub mod text_unit;
pub mod util;
pub mod variant;
