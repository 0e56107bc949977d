/*!
 * Aligned segment editing across the source and target containers of a text unit.
 *
 * Every structural edit names a target locale. Relative to that locale the
 * containers of the unit fall into five roles:
 *
 * - the source used for the locale (its variant source if any, else the default source),
 * - the target for the locale,
 * - other targets using that same source,
 * - the other sources (variants, and the default source when the locale has a variant),
 * - the targets of those other sources.
 *
 * `VariantOptions` selects the roles that take part in an edit, `CopyOptions`
 * selects the roles whose new segments receive a copy of the content rather
 * than an empty segment. Corresponding segments are found by id, never by
 * position.
 *
 * A locale is aligned when both its source and its target are marked aligned.
 * An edit that reaches only one of the two sides marks that locale not aligned.
 */

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::errors::{ContentError, Result};
use crate::locale::LocaleId;
use crate::resource::container::{AlignmentStatus, TextContainer};
use crate::resource::options::{CopyOptions, CreateOptions, VariantOptions};
use crate::resource::part::Segment;
use crate::resource::text_unit::TextUnit;
use crate::segmenter::Segmenter;

/// Identifies one container of a text unit
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum ContainerKey {
    Source,
    VariantSource(LocaleId),
    Target(LocaleId),
}

/// Role of a container relative to the target locale of an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    Source,
    Target,
    TargetWithSameSource,
    VariantSource,
    TargetOfVariantSource,
}

impl Role {
    fn modify_flag(self) -> VariantOptions {
        match self {
            Self::Source => VariantOptions::MODIFY_SOURCE,
            Self::Target => VariantOptions::MODIFY_TARGET,
            Self::TargetWithSameSource => VariantOptions::MODIFY_TARGETS_WITH_SAME_SOURCE,
            Self::VariantSource => VariantOptions::MODIFY_VARIANT_SOURCES,
            Self::TargetOfVariantSource => VariantOptions::MODIFY_TARGETS_OF_VARIANT_SOURCES,
        }
    }

    fn copy_flag(self) -> CopyOptions {
        match self {
            Self::Source => CopyOptions::COPY_TO_SOURCE,
            Self::Target => CopyOptions::COPY_TO_TARGET,
            Self::TargetWithSameSource => CopyOptions::COPY_TO_TARGETS_WITH_SAME_SOURCE,
            Self::VariantSource => CopyOptions::COPY_TO_VARIANT_SOURCES,
            Self::TargetOfVariantSource => CopyOptions::COPY_TO_TARGETS_OF_VARIANT_SOURCES,
        }
    }

    fn is_target(self) -> bool {
        matches!(
            self,
            Self::Target | Self::TargetWithSameSource | Self::TargetOfVariantSource
        )
    }
}

/// An explicit correspondence between a source segment and a target segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedPair {
    pub source_id: String,
    pub target_id: String,
}

impl AlignedPair {
    pub fn new(source_id: &str, target_id: &str) -> Self {
        Self {
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
        }
    }
}

type Selection = Vec<(ContainerKey, Role)>;

/// Segment-level editing of a text unit that keeps its containers in correspondence
pub struct AlignedSegments<'a> {
    unit: &'a mut TextUnit,
}

impl<'a> AlignedSegments<'a> {
    pub fn new(unit: &'a mut TextUnit) -> Self {
        Self { unit }
    }

    /// Segments of the default source
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.unit.source.segments()
    }

    /// Source segment at `index` in the source used for `locale`
    pub fn source(&self, index: usize, locale: &LocaleId) -> Result<&Segment> {
        self.unit.source_for(locale).segment(index)
    }

    /// Append a source segment and its counterparts.
    ///
    /// The source segment goes first; its validated id is given to every
    /// segment added to the other selected containers. The target for
    /// `locale` receives `target` if given. Any other container receives a
    /// copy of the content (of `source`, else of `target`) when `copy`
    /// selects its role, or an empty segment.
    ///
    /// Returns the id shared by the appended segments.
    ///
    /// # Errors
    /// `ContentError::MissingSegments` if both segments are absent,
    /// `ContentError::OperationCancelled` if the variant options refuse to
    /// touch a shared source.
    pub fn append(
        &mut self,
        source: Option<Segment>,
        target: Option<Segment>,
        locale: &LocaleId,
        variant: VariantOptions,
        copy: CopyOptions,
    ) -> Result<String> {
        let model = source.clone().or_else(|| target.clone()).ok_or(ContentError::MissingSegments)?;
        let selection = self.plan(locale, variant, variant.contains(VariantOptions::MODIFY_SOURCE))?;
        let mut id = model.id.clone();
        let mut touched = Vec::new();

        for (key, role) in ordered(&selection) {
            let segment = self.new_segment(role, &id, &model, source.as_ref(), target.as_ref(), copy);
            let Some(container) = self.container_mut(key) else {
                continue;
            };
            let appended = container.append_segment(segment, false).id.clone();
            if touched.is_empty() {
                id = appended;
            } else if appended != id {
                warn!("Segment id '{}' already used in {:?}, appended as '{}'", id, key, appended);
            }
            touched.push(key.clone());
        }

        self.invalidate(&touched);
        Ok(id)
    }

    /// Insert a source segment and its counterparts before the segment at
    /// `index` of the source used for `locale`.
    ///
    /// In the other containers the new segment goes before the segment that
    /// has the same id as the source anchor, or at the end if there is none.
    pub fn insert(
        &mut self,
        index: usize,
        source: Option<Segment>,
        target: Option<Segment>,
        locale: &LocaleId,
        variant: VariantOptions,
        copy: CopyOptions,
    ) -> Result<String> {
        let model = source.clone().or_else(|| target.clone()).ok_or(ContentError::MissingSegments)?;
        let count = self.unit.source_for(locale).segment_count();
        if index > count {
            return Err(ContentError::InvalidIndex { index, count });
        }
        let selection = self.plan(locale, variant, variant.contains(VariantOptions::MODIFY_SOURCE))?;
        let anchor = self
            .unit
            .source_for(locale)
            .segment(index)
            .ok()
            .map(|s| s.id.clone());

        let mut id = model.id.clone();
        let mut touched = Vec::new();
        for (key, role) in ordered(&selection) {
            let segment = self.new_segment(role, &id, &model, source.as_ref(), target.as_ref(), copy);
            let Some(container) = self.container_mut(key) else {
                continue;
            };
            let position = match role {
                Role::Source => Some(index),
                _ => anchor.as_deref().and_then(|a| container.index_of(a)),
            };
            let inserted = match position {
                Some(position) => container.insert_segment(position, segment)?.id.clone(),
                None => container.append_segment(segment, false).id.clone(),
            };
            if touched.is_empty() {
                id = inserted;
            } else if inserted != id {
                warn!("Segment id '{}' already used in {:?}, inserted as '{}'", id, key, inserted);
            }
            touched.push(key.clone());
        }

        self.invalidate(&touched);
        Ok(id)
    }

    /// Replace the segment at `index` of the source used for `locale`, and
    /// its counterparts in the selected containers.
    ///
    /// Counterparts are found by the id of the segment being replaced. A
    /// selected container without that id is left as is. When the new segment
    /// has a different id, only the containers selected by `id_update` take
    /// it: the others keep the old id.
    pub fn set_segment(
        &mut self,
        index: usize,
        segment: Segment,
        locale: &LocaleId,
        variant: VariantOptions,
        id_update: VariantOptions,
    ) -> Result<()> {
        let old_id = self.unit.source_for(locale).segment(index)?.id.clone();
        let selection = self.plan(locale, variant, variant.contains(VariantOptions::MODIFY_SOURCE))?;
        let new_id = if segment.id.is_empty() { old_id.clone() } else { segment.id.clone() };
        let renamed: Vec<ContainerKey> = if new_id != old_id {
            self.select(locale, id_update).into_iter().map(|(key, _)| key).collect()
        } else {
            Vec::new()
        };

        let mut touched = Vec::new();
        for (key, _) in &selection {
            let Some(container) = self.container_mut(key) else {
                continue;
            };
            let Some(position) = container.index_of(&old_id) else {
                debug!("No segment '{}' in {:?}, not replaced", old_id, key);
                continue;
            };
            let mut replacement = segment.clone();
            replacement.id = if renamed.contains(key) { new_id.clone() } else { old_id.clone() };
            let wanted = replacement.id.clone();
            let assigned = container.set_segment(position, replacement)?.id.clone();
            if assigned != wanted {
                warn!("Segment id '{}' already used in {:?}, replaced as '{}'", wanted, key, assigned);
            }
            touched.push(key.clone());
        }

        let pending: Vec<ContainerKey> = renamed.iter().filter(|k| !touched.contains(k)).cloned().collect();
        for key in &pending {
            let Some(container) = self.container_mut(key) else {
                continue;
            };
            if container.get(&new_id).is_some() {
                warn!("Segment id '{}' already used in {:?}, id not updated", new_id, key);
                continue;
            }
            if let Some(existing) = container.get_mut(&old_id) {
                existing.id = new_id.clone();
                touched.push(key.clone());
            }
        }

        self.invalidate(&touched);
        if new_id != old_id {
            self.invalidate_renamed(&new_id);
        }
        Ok(())
    }

    /// Remove the segment with id `segment_id` from the selected containers.
    ///
    /// Returns whether anything was removed. A cancelled operation removes nothing.
    pub fn remove(&mut self, segment_id: &str, locale: &LocaleId, variant: VariantOptions) -> bool {
        let selection = match self.plan(locale, variant, variant.contains(VariantOptions::MODIFY_SOURCE)) {
            Ok(selection) => selection,
            Err(_) => return false,
        };
        let mut touched = Vec::new();
        for (key, _) in &selection {
            let Some(container) = self.container_mut(key) else {
                continue;
            };
            if let Some(index) = container.index_of(segment_id) {
                if container.remove_segment(index).is_ok() {
                    touched.push(key.clone());
                }
            }
        }
        self.invalidate(&touched);
        !touched.is_empty()
    }

    /// Target segment with the same id as `segment`, created if missing.
    ///
    /// The target for `locale` always takes part, whatever `variant` says;
    /// the other selected targets also get the segment if they lack it.
    /// Sources are never modified.
    pub fn get_corresponding_target(
        &mut self,
        segment: &Segment,
        locale: &LocaleId,
        variant: VariantOptions,
        copy: CopyOptions,
    ) -> Result<&mut Segment> {
        self.unit.create_target(locale, false, CreateOptions::COPY_SEGMENTS);
        let missing = self
            .unit
            .target(locale)
            .is_none_or(|t| t.get(&segment.id).is_none());
        if missing {
            let mut selection = self.select(locale, variant | VariantOptions::MODIFY_TARGET);
            selection.retain(|(_, role)| role.is_target());
            self.fill_missing(&selection, segment, copy);
        }
        self.unit
            .targets
            .get_mut(locale)
            .and_then(|t| t.get_mut(&segment.id))
            .ok_or_else(|| ContentError::SegmentNotFound(segment.id.clone()))
    }

    /// Source segment with the same id as `segment`, created at the end of
    /// the source used for `locale` if missing.
    ///
    /// # Errors
    /// `ContentError::OperationCancelled` if a new segment would have to be
    /// added to a source the variant options refuse to touch.
    pub fn get_corresponding_source(
        &mut self,
        segment: &Segment,
        locale: &LocaleId,
        variant: VariantOptions,
        copy: CopyOptions,
    ) -> Result<&mut Segment> {
        if self.unit.source_for(locale).get(&segment.id).is_none() {
            let selection = self.plan(locale, variant | VariantOptions::MODIFY_SOURCE, true)?;
            self.fill_missing(&selection, segment, copy);
        }
        self.unit
            .source_for_mut(locale)
            .get_mut(&segment.id)
            .ok_or_else(|| ContentError::SegmentNotFound(segment.id.clone()))
    }

    /// Split a source segment at a coded-text position.
    ///
    /// The selected containers get a new segment right after their
    /// counterpart of the split segment (at the end if there is none),
    /// copied or empty according to `copy`. Returns the new source segment,
    /// or `None` if the position splits nothing.
    pub fn split_source(
        &mut self,
        locale: &LocaleId,
        segment_id: &str,
        position: usize,
        variant: VariantOptions,
        copy: CopyOptions,
    ) -> Result<Option<Segment>> {
        let selection = self.plan(locale, variant, true)?;
        let origin = self.source_key(locale);
        self.split(origin, &selection, segment_id, position, copy)
    }

    /// Split a target segment at a coded-text position. See `split_source`.
    pub fn split_target(
        &mut self,
        locale: &LocaleId,
        segment_id: &str,
        position: usize,
        variant: VariantOptions,
        copy: CopyOptions,
    ) -> Result<Option<Segment>> {
        if !self.unit.has_target(locale) {
            return Err(ContentError::TargetNotFound(locale.to_string()));
        }
        let selection = self.plan(locale, variant, variant.contains(VariantOptions::MODIFY_SOURCE))?;
        self.split(ContainerKey::Target(locale.clone()), &selection, segment_id, position, copy)
    }

    /// Join the segment with id `segment_id` to the next one in every selected container
    pub fn join_with_next(&mut self, segment_id: &str, locale: &LocaleId, variant: VariantOptions) -> Result<()> {
        let selection = self.plan(locale, variant, variant.contains(VariantOptions::MODIFY_SOURCE))?;
        let mut touched = Vec::new();
        for (key, _) in &selection {
            let Some(container) = self.container_mut(key) else {
                continue;
            };
            let Some(index) = container.index_of(segment_id) else {
                debug!("No segment '{}' in {:?}, not joined", segment_id, key);
                continue;
            };
            if container.join_with_next(index) > 0 {
                touched.push(key.clone());
            }
        }
        self.invalidate(&touched);
        Ok(())
    }

    /// Join all segments of every selected container
    pub fn join_all(&mut self, locale: &LocaleId, variant: VariantOptions) -> Result<()> {
        let selection = self.plan(locale, variant, variant.contains(VariantOptions::MODIFY_SOURCE))?;
        let mut touched = Vec::new();
        for (key, _) in &selection {
            if let Some(container) = self.container_mut(key) {
                container.join_all(None);
                touched.push(key.clone());
            }
        }
        self.invalidate(&touched);
        Ok(())
    }

    /// Align explicit pairs of source and target segments for `locale`.
    ///
    /// Each paired target segment takes the id of its source segment. A
    /// target segment outside the pairs whose id would clash gets a new id.
    /// Both sides are then marked aligned.
    pub fn align_pairs(&mut self, pairs: &[AlignedPair], locale: &LocaleId) -> Result<()> {
        let source = self.unit.source_for(locale);
        let target = self
            .unit
            .target(locale)
            .ok_or_else(|| ContentError::TargetNotFound(locale.to_string()))?;
        for pair in pairs {
            if source.get(&pair.source_id).is_none() {
                return Err(ContentError::SegmentNotFound(pair.source_id.clone()));
            }
            if target.get(&pair.target_id).is_none() {
                return Err(ContentError::SegmentNotFound(pair.target_id.clone()));
            }
        }

        let mut seen_sources = HashSet::new();
        let mut seen_targets = HashSet::new();
        let mut renames: Vec<(String, String)> = Vec::new();
        for pair in pairs {
            if !seen_sources.insert(pair.source_id.as_str()) || !seen_targets.insert(pair.target_id.as_str()) {
                warn!("Ignoring duplicate alignment pair {} -> {}", pair.source_id, pair.target_id);
                continue;
            }
            renames.push((pair.target_id.clone(), pair.source_id.clone()));
        }

        let Some(target) = self.unit.targets.get_mut(locale) else {
            return Err(ContentError::TargetNotFound(locale.to_string()));
        };
        let final_ids: HashSet<&str> = renames.iter().map(|(_, to)| to.as_str()).collect();
        let mut next = target
            .segments()
            .map(|s| s.id.as_str())
            .chain(final_ids.iter().copied())
            .filter_map(|id| id.parse::<u64>().ok())
            .map(|n| n + 1)
            .max()
            .unwrap_or(0);
        for segment in target.segments_mut() {
            if let Some((_, to)) = renames.iter().find(|(from, _)| *from == segment.id) {
                segment.id = to.clone();
            } else if final_ids.contains(segment.id.as_str()) {
                debug!("Target segment '{}' clashes with an aligned id, renamed '{}'", segment.id, next);
                segment.id = next.to_string();
                next += 1;
            }
        }

        self.mark_aligned(locale);
        Ok(())
    }

    /// Align source and target segments for `locale` one to one by position.
    ///
    /// # Errors
    /// `ContentError::MisAlignment` if the segment counts differ.
    pub fn align(&mut self, locale: &LocaleId) -> Result<()> {
        let source_ids = self.unit.source_for(locale).segment_ids();
        let target = self
            .unit
            .targets
            .get_mut(locale)
            .ok_or_else(|| ContentError::TargetNotFound(locale.to_string()))?;
        let target_count = target.segment_count();
        if source_ids.len() != target_count {
            return Err(ContentError::MisAlignment {
                locale: locale.to_string(),
                source_count: source_ids.len(),
                target_count,
            });
        }
        for (segment, id) in target.segments_mut().zip(source_ids) {
            segment.id = id;
        }
        self.mark_aligned(locale);
        Ok(())
    }

    /// Collapse the selected containers to a single segment each.
    ///
    /// Every locale whose source and target both end up collapsed is marked
    /// aligned, with the target segment taking the source segment's id.
    pub fn align_collapse_all(&mut self, locale: &LocaleId, variant: VariantOptions) -> Result<()> {
        self.join_all(locale, variant)?;
        for other in self.unit.target_locales() {
            let source = self.unit.source_for(&other);
            if source.part_count() != 1 {
                continue;
            }
            let Some(source_id) = source.segments().next().map(|s| s.id.clone()) else {
                continue;
            };
            let Some(target) = self.unit.targets.get_mut(&other) else {
                continue;
            };
            if target.part_count() != 1 {
                continue;
            }
            if let Some(segment) = target.segments_mut().next() {
                segment.id = source_id;
            }
            self.mark_aligned(&other);
        }
        Ok(())
    }

    /// Segment the source used for `locale`. Targets are not modified.
    pub fn segment_source(&mut self, segmenter: &dyn Segmenter, locale: &LocaleId) -> Result<()> {
        let key = self.source_key(locale);
        let container = self.unit.source_for_mut(locale);
        let ranges = segmenter.compute_ranges(container);
        container.create(&ranges)?;
        self.invalidate(&[key]);
        Ok(())
    }

    /// Segment the target for `locale`.
    ///
    /// A missing target is first created with the segments of its source and
    /// no content, so the segmenter leaves that structure in place.
    pub fn segment_target(&mut self, segmenter: &dyn Segmenter, locale: &LocaleId) -> Result<()> {
        if !self.unit.has_target(locale) {
            debug!("Creating target '{}' before segmenting it", locale);
        }
        let container = self.unit.create_target(locale, false, CreateOptions::COPY_SEGMENTS);
        let ranges = segmenter.compute_ranges(container);
        container.create(&ranges)?;
        self.invalidate(&[ContainerKey::Target(locale.clone())]);
        Ok(())
    }

    /// Alignment status of one locale
    pub fn alignment_status_for(&self, locale: &LocaleId) -> AlignmentStatus {
        self.unit.alignment_status_for(locale)
    }

    /// Alignment status of the whole unit
    pub fn alignment_status(&self) -> AlignmentStatus {
        self.unit.alignment_status()
    }

    /// Containers selected by `options` for `locale`, without side effects
    pub(crate) fn select(&self, locale: &LocaleId, options: VariantOptions) -> Selection {
        self.roles(locale)
            .into_iter()
            .filter(|(_, role)| options.contains(role.modify_flag()))
            .collect()
    }

    /// All containers with their role for `locale`. The target is listed even if absent.
    fn roles(&self, locale: &LocaleId) -> Selection {
        let variants = &self.unit.variant_sources;
        let has_variant = variants.has_variant(locale);
        let mut roles = vec![(self.source_key(locale), Role::Source)];
        if has_variant {
            roles.push((ContainerKey::Source, Role::VariantSource));
        }
        for other in variants.locales().filter(|l| *l != locale) {
            roles.push((ContainerKey::VariantSource(other.clone()), Role::VariantSource));
        }
        roles.push((ContainerKey::Target(locale.clone()), Role::Target));
        for other in self.unit.targets.keys().filter(|l| *l != locale) {
            let role = if !has_variant && !variants.has_variant(other) {
                Role::TargetWithSameSource
            } else {
                Role::TargetOfVariantSource
            };
            roles.push((ContainerKey::Target(other.clone()), role));
        }
        roles
    }

    /// Resolve sharing of the source, create the target if it takes part,
    /// and return the selected containers.
    fn plan(&mut self, locale: &LocaleId, options: VariantOptions, touches_source: bool) -> Result<Selection> {
        if touches_source && self.is_source_shared(locale) {
            if options.contains(VariantOptions::CANCEL_IF_MULTIPLE_TARGETS) {
                info!("Source of '{}' is shared with other targets, operation cancelled", locale);
                return Err(ContentError::OperationCancelled(locale.to_string()));
            }
            if options.contains(VariantOptions::CREATE_VARIANT_IF_MULTIPLE_TARGETS) {
                debug!("Creating variant source for '{}'", locale);
                let status = self.unit.source.alignment_status();
                self.unit
                    .create_source(locale, false, CreateOptions::COPY_ALL)
                    .set_alignment_status(status);
            }
        }
        if options.contains(VariantOptions::MODIFY_TARGET) {
            self.unit.create_target(locale, false, CreateOptions::COPY_SEGMENTS);
        }
        Ok(self.select(locale, options))
    }

    /// Whether the default source is used by `locale` and by some other target
    fn is_source_shared(&self, locale: &LocaleId) -> bool {
        let variants = &self.unit.variant_sources;
        !variants.has_variant(locale)
            && self
                .unit
                .targets
                .keys()
                .any(|other| other != locale && !variants.has_variant(other))
    }

    fn source_key(&self, locale: &LocaleId) -> ContainerKey {
        if self.unit.variant_sources.has_variant(locale) {
            ContainerKey::VariantSource(locale.clone())
        } else {
            ContainerKey::Source
        }
    }

    fn container_mut(&mut self, key: &ContainerKey) -> Option<&mut TextContainer> {
        match key {
            ContainerKey::Source => Some(&mut self.unit.source),
            ContainerKey::VariantSource(locale) => self.unit.variant_sources.get_mut(locale),
            ContainerKey::Target(locale) => self.unit.targets.get_mut(locale),
        }
    }

    /// Segment to add to a container of a given role
    fn new_segment(
        &self,
        role: Role,
        id: &str,
        model: &Segment,
        source: Option<&Segment>,
        target: Option<&Segment>,
        copy: CopyOptions,
    ) -> Segment {
        let supplied = match role {
            Role::Source => source,
            Role::Target => target,
            _ => None,
        };
        match supplied {
            Some(segment) => Segment::new(id, segment.text.clone()),
            None => copy_or_empty(model, id, role, copy),
        }
    }

    /// Append `model` (copied or empty) to each selected container that has no segment with its id
    fn fill_missing(&mut self, selection: &Selection, model: &Segment, copy: CopyOptions) {
        let mut touched = Vec::new();
        for (key, role) in ordered(selection) {
            let Some(container) = self.container_mut(key) else {
                continue;
            };
            if container.get(&model.id).is_some() {
                continue;
            }
            container.append_segment(copy_or_empty(model, &model.id, role, copy), false);
            touched.push(key.clone());
        }
        self.invalidate(&touched);
    }

    fn split(
        &mut self,
        origin: ContainerKey,
        selection: &Selection,
        segment_id: &str,
        position: usize,
        copy: CopyOptions,
    ) -> Result<Option<Segment>> {
        let container = self
            .container_mut(&origin)
            .ok_or_else(|| ContentError::SegmentNotFound(segment_id.to_string()))?;
        let index = container
            .index_of(segment_id)
            .ok_or_else(|| ContentError::SegmentNotFound(segment_id.to_string()))?;
        let Some(created) = container.split_segment(index, position)? else {
            return Ok(None);
        };

        let mut touched = vec![origin.clone()];
        for (key, role) in selection.iter().filter(|(key, _)| *key != origin) {
            let Some(container) = self.container_mut(key) else {
                continue;
            };
            let segment = copy_or_empty(&created, &created.id, *role, copy);
            let added = match container.index_of(segment_id) {
                Some(index) => container.insert_segment(index + 1, segment)?.id.clone(),
                None => container.append_segment(segment, false).id.clone(),
            };
            if added != created.id {
                warn!("Segment id '{}' already used in {:?}, added as '{}'", created.id, key, added);
            }
            touched.push(key.clone());
        }
        self.invalidate(&touched);
        Ok(Some(created))
    }

    /// Mark not aligned every locale whose source or target was touched, but not both
    fn invalidate(&mut self, touched: &[ContainerKey]) {
        if touched.is_empty() {
            return;
        }
        for locale in self.unit.target_locales() {
            let source_touched = touched.contains(&self.source_key(&locale));
            let target_key = ContainerKey::Target(locale.clone());
            if source_touched == touched.contains(&target_key) {
                continue;
            }
            if let Some(target) = self.unit.targets.get_mut(&locale) {
                if target.alignment_status() != AlignmentStatus::NotAligned {
                    debug!("Edit on one side only, '{}' is no longer aligned", locale);
                }
                target.set_alignment_status(AlignmentStatus::NotAligned);
            }
        }
    }

    /// Mark not aligned every locale where only one side carries a renamed id
    fn invalidate_renamed(&mut self, new_id: &str) {
        for locale in self.unit.target_locales() {
            let source_has = self.unit.source_for(&locale).get(new_id).is_some();
            let Some(target) = self.unit.targets.get_mut(&locale) else {
                continue;
            };
            if source_has != target.get(new_id).is_some() {
                debug!("Segment id '{}' differs between source and target of '{}'", new_id, locale);
                target.set_alignment_status(AlignmentStatus::NotAligned);
            }
        }
    }

    fn mark_aligned(&mut self, locale: &LocaleId) {
        self.unit
            .source_for_mut(locale)
            .set_alignment_status(AlignmentStatus::Aligned);
        if let Some(target) = self.unit.targets.get_mut(locale) {
            target.set_alignment_status(AlignmentStatus::Aligned);
        }
    }
}

/// Selection with the source role first, so its validated id is the one propagated
fn ordered(selection: &Selection) -> impl Iterator<Item = (&ContainerKey, Role)> {
    let sources = selection.iter().filter(|(_, role)| *role == Role::Source);
    let others = selection.iter().filter(|(_, role)| *role != Role::Source);
    sources.chain(others).map(|(key, role)| (key, *role))
}

fn copy_or_empty(model: &Segment, id: &str, role: Role, copy: CopyOptions) -> Segment {
    if copy.contains(role.copy_flag()) {
        Segment::new(id, model.text.clone())
    } else {
        Segment::empty(id)
    }
}

impl TextUnit {
    /// Segment editing that keeps source and targets in correspondence
    pub fn aligned_segments(&mut self) -> AlignedSegments<'_> {
        AlignedSegments::new(self)
    }

    /// Alignment status of one locale: aligned only when both its source
    /// and its target are. A locale without target is not aligned.
    pub fn alignment_status_for(&self, locale: &LocaleId) -> AlignmentStatus {
        let Some(target) = self.targets.get(locale) else {
            return AlignmentStatus::NotAligned;
        };
        let source = self.source_for(locale).alignment_status();
        match (source.is_aligned(), target.alignment_status()) {
            (true, AlignmentStatus::AlignedManually) => AlignmentStatus::AlignedManually,
            (true, AlignmentStatus::Aligned) => AlignmentStatus::Aligned,
            _ => AlignmentStatus::NotAligned,
        }
    }

    /// Alignment status of the unit: not aligned as soon as one locale is not.
    ///
    /// A unit without any target has nothing out of alignment and reports `Aligned`.
    pub fn alignment_status(&self) -> AlignmentStatus {
        let any_not_aligned = self
            .targets
            .keys()
            .any(|locale| self.alignment_status_for(locale) == AlignmentStatus::NotAligned);
        if any_not_aligned {
            AlignmentStatus::NotAligned
        } else {
            AlignmentStatus::Aligned
        }
    }
}
