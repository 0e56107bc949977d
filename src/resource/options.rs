/*!
 * Flag sets selecting which containers an edit touches, where content is
 * copied, and what a newly created container inherits.
 */

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Containers that participate in a structural edit, besides the one edited
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct VariantOptions: u32 {
        /// Fork the source into a variant for the target locale when it is
        /// shared by other targets
        const CREATE_VARIANT_IF_MULTIPLE_TARGETS = 1 << 0;
        /// Refuse the edit when the source is shared by other targets
        const CANCEL_IF_MULTIPLE_TARGETS = 1 << 1;
        const MODIFY_SOURCE = 1 << 2;
        const MODIFY_TARGET = 1 << 3;
        /// Other targets whose source is the default source
        const MODIFY_TARGETS_WITH_SAME_SOURCE = 1 << 4;
        const MODIFY_VARIANT_SOURCES = 1 << 5;
        const MODIFY_TARGETS_OF_VARIANT_SOURCES = 1 << 6;

        const MODIFY_ONLY_IF_ALONE = Self::CANCEL_IF_MULTIPLE_TARGETS.bits()
            | Self::MODIFY_SOURCE.bits()
            | Self::MODIFY_TARGET.bits();
        const MODIFY_AS_VARIANT = Self::CREATE_VARIANT_IF_MULTIPLE_TARGETS.bits()
            | Self::MODIFY_SOURCE.bits()
            | Self::MODIFY_TARGET.bits();
        const MODIFY_SOURCE_AND_ASSOCIATED_TARGETS = Self::MODIFY_SOURCE.bits()
            | Self::MODIFY_TARGET.bits()
            | Self::MODIFY_TARGETS_WITH_SAME_SOURCE.bits();
        const MODIFY_ALL = Self::MODIFY_SOURCE_AND_ASSOCIATED_TARGETS.bits()
            | Self::MODIFY_VARIANT_SOURCES.bits()
            | Self::MODIFY_TARGETS_OF_VARIANT_SOURCES.bits();
    }
}

impl Default for VariantOptions {
    fn default() -> Self {
        Self::MODIFY_SOURCE_AND_ASSOCIATED_TARGETS
    }
}

bitflags! {
    /// Containers that receive a copy of the content instead of an empty segment
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CopyOptions: u32 {
        const COPY_TO_SOURCE = 1 << 0;
        const COPY_TO_TARGET = 1 << 1;
        const COPY_TO_TARGETS_WITH_SAME_SOURCE = 1 << 2;
        const COPY_TO_VARIANT_SOURCES = 1 << 3;
        const COPY_TO_TARGETS_OF_VARIANT_SOURCES = 1 << 4;

        const COPY_TO_SOURCE_AND_TARGET = Self::COPY_TO_SOURCE.bits() | Self::COPY_TO_TARGET.bits();
        const COPY_TO_ALL = Self::COPY_TO_SOURCE_AND_TARGET.bits()
            | Self::COPY_TO_TARGETS_WITH_SAME_SOURCE.bits()
            | Self::COPY_TO_VARIANT_SOURCES.bits()
            | Self::COPY_TO_TARGETS_OF_VARIANT_SOURCES.bits();
    }
}

impl CopyOptions {
    pub const COPY_TO_NONE: Self = Self::empty();
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self::COPY_TO_NONE
    }
}

bitflags! {
    /// What a container created from the source inherits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CreateOptions: u32 {
        const COPY_CONTENT = 1 << 0;
        const COPY_PROPERTIES = 1 << 1;
        const COPY_SEGMENTS = 1 << 2;

        const COPY_ALL = Self::COPY_CONTENT.bits()
            | Self::COPY_PROPERTIES.bits()
            | Self::COPY_SEGMENTS.bits();
    }
}

impl CreateOptions {
    pub const CREATE_EMPTY: Self = Self::empty();
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self::COPY_SEGMENTS
    }
}
