/*!
 * Segment-level access to a container.
 *
 * Segments are a sparse subsequence of a container's parts. The methods here
 * address them by segment index (position among segments only) or by id, and
 * translate between segment indices and part indices when they edit the list.
 */

use log::debug;

use crate::errors::{ContentError, Result};
use crate::resource::container::{TextContainer, fix_segment_id};
use crate::resource::fragment::TextFragment;
use crate::resource::part::{Range, Segment, TextPart};

impl TextContainer {
    /// Number of segments
    pub fn segment_count(&self) -> usize {
        self.parts.iter().filter(|p| p.is_segment()).count()
    }

    /// Segments in order
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.parts.iter().filter_map(TextPart::as_segment)
    }

    pub fn segments_mut(&mut self) -> impl Iterator<Item = &mut Segment> {
        self.parts.iter_mut().filter_map(TextPart::as_segment_mut)
    }

    /// Ids of the segments, in order
    pub fn segment_ids(&self) -> Vec<String> {
        self.segments().map(|s| s.id.clone()).collect()
    }

    /// Segment with the given id
    pub fn get(&self, id: &str) -> Option<&Segment> {
        self.segments().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Segment> {
        self.segments_mut().find(|s| s.id == id)
    }

    /// Segment at a segment index
    pub fn segment(&self, index: usize) -> Result<&Segment> {
        let count = self.segment_count();
        self.segments()
            .nth(index)
            .ok_or(ContentError::InvalidIndex { index, count })
    }

    pub fn segment_mut(&mut self, index: usize) -> Result<&mut Segment> {
        let count = self.segment_count();
        self.segments_mut()
            .nth(index)
            .ok_or(ContentError::InvalidIndex { index, count })
    }

    /// Part index of the segment at `segment_index`
    pub fn part_index(&self, segment_index: usize) -> Option<usize> {
        self.parts
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_segment())
            .nth(segment_index)
            .map(|(i, _)| i)
    }

    /// Segment index of the part at `part_index`, if that part is a segment
    pub fn segment_index(&self, part_index: usize) -> Option<usize> {
        if !self.parts.get(part_index)?.is_segment() {
            return None;
        }
        Some(self.parts[..part_index].iter().filter(|p| p.is_segment()).count())
    }

    /// Segment index of the segment with the given id
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.segments().position(|s| s.id == id)
    }

    /// Content of the first segment
    pub fn first_content(&self) -> Option<&TextFragment> {
        self.segments().next().map(|s| &s.text)
    }

    /// Content of the last segment
    pub fn last_content(&self) -> Option<&TextFragment> {
        self.segments().last().map(|s| &s.text)
    }

    pub fn last_segment(&self) -> Option<&Segment> {
        self.segments().last()
    }

    /// Append a segment and return it with its validated id.
    ///
    /// With `collapse_if_previous_empty`, an empty segment at the end of the
    /// container is replaced by the new one instead of being kept before it.
    pub fn append_segment(&mut self, segment: Segment, collapse_if_previous_empty: bool) -> &mut Segment {
        self.append_segment_with_text_before(segment, "", collapse_if_previous_empty)
    }

    /// Append a segment, preceded by a plain text part if `text_before` is not empty
    pub fn append_segment_with_text_before(
        &mut self,
        segment: Segment,
        text_before: &str,
        collapse_if_previous_empty: bool,
    ) -> &mut Segment {
        if !text_before.is_empty() {
            let text = TextPart::Text(TextFragment::from(text_before));
            match self.parts.last_mut() {
                Some(last) if !last.is_segment() && last.content().is_empty() => *last = text,
                _ => self.parts.push(text),
            }
        }

        let collapse = collapse_if_previous_empty
            && self
                .parts
                .last()
                .is_some_and(|last| last.is_segment() && last.content().is_empty());
        if collapse {
            debug!("Collapsing trailing empty segment into appended segment");
            self.parts.pop();
        }
        self.parts.push(TextPart::Segment(segment));
        let index = self.parts.len() - 1;
        fix_segment_id(&mut self.parts, index);
        self.segmented = self.segmented || self.parts.len() > 1;
        self.segment_at_part(index)
    }

    /// Append a fragment as a new segment with a generated id
    pub fn append_content(&mut self, fragment: TextFragment, collapse_if_previous_empty: bool) -> &mut Segment {
        self.append_segment(Segment::unnamed(fragment), collapse_if_previous_empty)
    }

    /// Insert a segment before the segment at `index`, or append it if `index`
    /// equals the segment count. The trailing segment is never collapsed.
    pub fn insert_segment(&mut self, index: usize, segment: Segment) -> Result<&mut Segment> {
        let count = self.segment_count();
        if index == count {
            return Ok(self.append_segment(segment, false));
        }
        let part_index = self
            .part_index(index)
            .ok_or(ContentError::InvalidIndex { index, count })?;
        self.parts.insert(part_index, TextPart::Segment(segment));
        fix_segment_id(&mut self.parts, part_index);
        self.segmented = true;
        Ok(self.segment_at_part(part_index))
    }

    /// Replace the segment at `index`
    pub fn set_segment(&mut self, index: usize, segment: Segment) -> Result<&mut Segment> {
        let count = self.segment_count();
        let part_index = self
            .part_index(index)
            .ok_or(ContentError::InvalidIndex { index, count })?;
        self.parts[part_index] = TextPart::Segment(segment);
        fix_segment_id(&mut self.parts, part_index);
        Ok(self.segment_at_part(part_index))
    }

    /// Remove the segment at `index` and return it.
    ///
    /// A container left with text parts only gets an empty segment where
    /// the removed one was.
    pub fn remove_segment(&mut self, index: usize) -> Result<Segment> {
        let count = self.segment_count();
        let part_index = self
            .part_index(index)
            .ok_or(ContentError::InvalidIndex { index, count })?;
        let removed = self.remove_part(part_index)?;
        if !self.parts.iter().any(TextPart::is_segment) {
            let at = part_index.min(self.parts.len());
            self.parts.insert(at, TextPart::Segment(Segment::empty("0")));
        }
        match removed {
            TextPart::Segment(segment) => Ok(segment),
            TextPart::Text(_) => Err(ContentError::InvalidIndex { index, count }),
        }
    }

    /// Exchange two segments. Parts between them stay in place.
    pub fn swap_segments(&mut self, first: usize, second: usize) -> Result<()> {
        let count = self.segment_count();
        let a = self
            .part_index(first)
            .ok_or(ContentError::InvalidIndex { index: first, count })?;
        let b = self
            .part_index(second)
            .ok_or(ContentError::InvalidIndex { index: second, count })?;
        self.parts.swap(a, b);
        Ok(())
    }

    /// Rebuild the part list from ranges over the joined content.
    ///
    /// Ranges must be ordered and not overlap. An empty range is skipped
    /// unless it carries an id. Text between ranges becomes plain text parts;
    /// text after the last range becomes a trailing text part, or a single
    /// segment if no range consumed anything. Returns the new part count.
    ///
    /// # Errors
    /// `ContentError::InvalidPosition` for a reversed, out-of-order or
    /// out-of-bounds range. The container is unchanged on error.
    pub fn create(&mut self, ranges: &[Range]) -> Result<usize> {
        if ranges.is_empty() {
            return Ok(0);
        }
        let holder = match self.parts.as_slice() {
            [single] => single.content().clone(),
            _ => self.joined_content(),
        };
        let len = holder.len();

        let mut parts: Vec<TextPart> = Vec::new();
        let mut start = 0;
        let mut counter = 0usize;
        for range in ranges {
            if range.end < range.start {
                return Err(ContentError::position(format!(
                    "invalid segment boundaries: start={}, end={}",
                    range.start, range.end
                )));
            }
            if range.start < start {
                return Err(ContentError::position(format!(
                    "invalid range order: range starting at {} overlaps previous range ending at {}",
                    range.start, start
                )));
            }
            if range.end > len {
                return Err(ContentError::position(format!(
                    "range end {} beyond content length {}",
                    range.end, len
                )));
            }
            if range.is_empty() && range.id.is_none() {
                continue;
            }
            if start < range.start {
                parts.push(TextPart::Text(holder.sub_sequence(start, range.start - start, false)?));
            }
            let id = match &range.id {
                Some(id) => id.clone(),
                None => {
                    counter += 1;
                    (counter - 1).to_string()
                }
            };
            let text = holder.sub_sequence(range.start, range.len(), false)?;
            parts.push(TextPart::Segment(Segment::new(id, text)));
            start = range.end;
        }

        if start < len {
            if start == 0 {
                parts.push(TextPart::Segment(Segment::new(counter.to_string(), holder)));
            } else {
                parts.push(TextPart::Text(holder.sub_sequence(start, len - start, false)?));
            }
        }
        if parts.is_empty() {
            parts.push(TextPart::Segment(Segment::empty("0")));
        }
        for index in 0..parts.len() {
            fix_segment_id(&mut parts[..=index], index);
        }

        self.parts = parts;
        self.segmented = true;
        Ok(self.parts.len())
    }

    /// Create a single segment from `start` to `end` of the joined content
    pub fn create_single(&mut self, start: usize, end: usize) -> Result<usize> {
        self.create(&[Range::new(start, end)])
    }

    /// Merge the segment at `segment_index` with everything up to and
    /// including the next segment. Returns the number of parts merged into
    /// it, or 0 if there is no next segment.
    pub fn join_with_next(&mut self, segment_index: usize) -> usize {
        match self.part_index(segment_index) {
            Some(start) => self.join_part_with_next(start),
            None => 0,
        }
    }

    /// Merge the part at `part_index` with the parts that follow it, up to
    /// and including the next segment.
    ///
    /// A text part at `part_index` becomes a segment holding the id of the
    /// segment it absorbed. Returns the number of parts merged, or 0 if no
    /// segment follows.
    pub fn join_part_with_next(&mut self, part_index: usize) -> usize {
        if part_index >= self.parts.len() {
            return 0;
        }
        let start = part_index;
        let Some(end) = (start + 1..self.parts.len()).find(|&i| self.parts[i].is_segment()) else {
            return 0;
        };

        let consumed: Vec<TextPart> = self.parts.drain(start + 1..=end).collect();
        if let TextPart::Text(text) = &self.parts[start] {
            let id = match consumed.last() {
                Some(TextPart::Segment(segment)) => segment.id.clone(),
                _ => String::new(),
            };
            self.parts[start] = TextPart::Segment(Segment::new(id, text.clone()));
        }
        let content = self.parts[start].content_mut();
        for part in &consumed {
            content.append_fragment(part.content());
        }
        content.balance_markers();
        end - start
    }

    /// Collapse the container to a single segment.
    ///
    /// The segment keeps the id of the first segment. If `ranges` is given, it
    /// receives the segment boundaries so that `create` can restore them.
    pub fn join_all(&mut self, ranges: Option<&mut Vec<Range>>) {
        let content = self.create_joined_content(ranges);
        self.set_content(content);
    }

    /// Boundaries of the segments in the joined content
    pub fn ranges(&self) -> Vec<Range> {
        let mut ranges = Vec::new();
        self.create_joined_content(Some(&mut ranges));
        ranges
    }

    /// Split the segment at `index` at a coded-text position of its content.
    ///
    /// The trailing part becomes a new segment inserted right after, with a
    /// generated id; a copy of it is returned. A position at the start or the
    /// end of the segment splits nothing and returns `None`.
    pub fn split_segment(&mut self, index: usize, position: usize) -> Result<Option<Segment>> {
        let count = self.segment_count();
        let part_index = self
            .part_index(index)
            .ok_or(ContentError::InvalidIndex { index, count })?;
        let content = self.parts[part_index].content();
        let len = content.len();
        let left = content.sub_sequence(0, position, false)?;
        if position == 0 || position == len {
            return Ok(None);
        }
        let right = content.sub_sequence(position, len - position, false)?;

        *self.parts[part_index].content_mut() = left;
        self.parts
            .insert(part_index + 1, TextPart::Segment(Segment::unnamed(right)));
        fix_segment_id(&mut self.parts, part_index + 1);
        self.segmented = true;
        Ok(Some(self.segment_at_part(part_index + 1).clone()))
    }

    /// Segment stored at a part index known to hold one
    fn segment_at_part(&mut self, part_index: usize) -> &mut Segment {
        match &mut self.parts[part_index] {
            TextPart::Segment(segment) => segment,
            TextPart::Text(_) => unreachable!("part {} is not a segment", part_index),
        }
    }
}
