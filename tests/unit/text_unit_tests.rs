/*!
 * Tests for text units, their targets and their records
 */

use std::sync::Arc;
use std::thread;

use segalign::resource::{
    AlignmentStatus, CreateOptions, GenericSkeleton, Property, Range, Segment, Skeleton, TextFragment, TextUnit,
    TextUnitRecord,
};

use crate::common::{self, loc};

/// Test that an existing target is returned unchanged unless overwritten
#[test]
fn test_createTarget_existing_shouldIgnoreOptionsUnlessOverwrite() {
    let fr = loc("fr");
    let mut unit = common::segmented_unit("u", &[("One.", "a"), ("Two.", "b")]);

    unit.create_target(&fr, false, CreateOptions::COPY_SEGMENTS);
    unit.get_target_segment(&fr, "a", false).unwrap().text = TextFragment::from("Un.");

    let kept = unit.create_target(&fr, false, CreateOptions::COPY_ALL);
    assert_eq!(kept.get("a").unwrap().text.coded_text(), "Un.");

    let replaced = unit.create_target(&fr, true, CreateOptions::COPY_ALL);
    assert_eq!(replaced.get("a").unwrap().text.coded_text(), "One.");
}

/// Test what a new target inherits for each creation flag
#[test]
fn test_createTarget_withFlags_shouldCopySelectedParts() {
    let mut unit = common::segmented_unit("u", &[("One.", "a"), ("Two.", "b")]);
    unit.set_source_property(Property::new("state", "new"));

    let joined = unit.create_target(&loc("fr"), false, CreateOptions::CREATE_EMPTY);
    assert_eq!(joined.part_count(), 1);
    assert!(joined.is_empty());
    assert!(joined.property("state").is_none());

    let content = unit.create_target(&loc("de"), false, CreateOptions::COPY_CONTENT);
    assert_eq!(content.part_count(), 1);
    assert_eq!(content.to_string(), "One.Two.");

    let all = unit.create_target(&loc("ja"), false, CreateOptions::COPY_ALL);
    assert_eq!(all.segment_ids(), vec!["a", "b"]);
    assert_eq!(all.property("state").unwrap().value, "new");
    assert_eq!(all.alignment_status(), AlignmentStatus::NotAligned);
}

/// Test that a target created from segments keeps the text between them
#[test]
fn test_createTarget_withInterSegmentText_shouldKeepTextParts() {
    let fr = loc("fr");
    let mut unit = TextUnit::with_text("u", "Hello. World.");
    unit.source_mut()
        .create(&[Range::with_id(0, 6, "s1"), Range::with_id(7, 13, "s2")])
        .unwrap();

    let target = unit.create_target(&fr, false, CreateOptions::COPY_SEGMENTS);
    assert_eq!(target.part_count(), 3);
    assert_eq!(target.segment_ids(), vec!["s1", "s2"]);
    assert!(target.segments().all(|s| s.text.is_empty()));

    unit.get_target_segment(&fr, "s1", false).unwrap().text = TextFragment::from("Bonjour.");
    unit.get_target_segment(&fr, "s2", false).unwrap().text = TextFragment::from("Monde.");
    assert_eq!(unit.target(&fr).unwrap().to_string(), "Bonjour. Monde.");

    let restored = TextUnit::from_record(&unit.to_record()).unwrap();
    let target = restored.target(&fr).unwrap();
    assert_eq!(target.part_count(), 3);
    assert_eq!(target.to_string(), "Bonjour. Monde.");
}

/// Test that segment lookups only create when asked
#[test]
fn test_getSegment_withCreateFlag_shouldAppendEmptySegment() {
    let fr = loc("fr");
    let mut unit = common::segmented_unit("u", &[("One.", "a")]);

    assert!(unit.get_source_segment("z", false).is_none());
    assert_eq!(unit.source().segment_count(), 1);
    assert!(unit.get_target_segment(&fr, "z", false).is_none());
    assert!(!unit.has_target(&fr));

    let created = unit.get_source_segment("z", true).unwrap();
    assert!(created.text.is_empty());
    assert_eq!(unit.source().segment_ids(), vec!["a", "z"]);

    unit.get_target_segment(&fr, "y", true).unwrap();
    assert_eq!(unit.target(&fr).unwrap().segment_ids(), vec!["a", "z", "y"]);
}

/// Test that setting a target property creates the target
#[test]
fn test_setTargetProperty_withoutTarget_shouldCreateTarget() {
    let fr = loc("fr");
    let mut unit = common::segmented_unit("u", &[("One.", "a"), ("Two.", "b")]);
    assert!(unit.target_property(&fr, "state").is_none());
    assert!(!unit.has_target(&fr));

    unit.set_target_property(&fr, Property::new("state", "translated"));

    assert_eq!(unit.target_property(&fr, "state").unwrap().value, "translated");
    assert_eq!(unit.target(&fr).unwrap().segment_ids(), vec!["a", "b"]);
    assert!(unit.target(&fr).unwrap().is_empty());
}

/// Test that a created target property can inherit the source value
#[test]
fn test_createTargetProperty_withCopyProperties_shouldInheritSourceValue() {
    let fr = loc("fr");
    let mut unit = TextUnit::with_text("u", "Text");
    unit.set_source_property(Property::new("maxwidth", "40"));

    let property = unit.create_target_property(&fr, "maxwidth", false, CreateOptions::COPY_ALL);
    assert_eq!(property.value, "40");
    property.value = "50".to_string();
    assert!(unit.target(&fr).unwrap().is_empty());
    assert_eq!(unit.target(&fr).unwrap().part_count(), 1);

    let again = unit.create_target_property(&fr, "maxwidth", false, CreateOptions::COPY_ALL);
    assert_eq!(again.value, "50");
}

/// Test that the skeleton is stored and returned untouched
#[test]
fn test_skeleton_shouldBeStoredOpaquely() {
    let mut skeleton = GenericSkeleton::new();
    skeleton.add("<p>");
    skeleton.add_content_placeholder();
    skeleton.add("</p>");
    let mut unit = TextUnit::with_text("u", "Hi");
    unit.set_skeleton(Some(Arc::new(skeleton)));

    let stored = unit.skeleton().unwrap();
    let generic = stored.as_any().downcast_ref::<GenericSkeleton>().unwrap();
    assert_eq!(generic.render(&unit.source().to_string()), "<p>Hi</p>");
}

/// Test that shared units can be read from several threads
#[test]
fn test_sharedTextUnit_readers_shouldSeeCompleteTargets() {
    let fr = loc("fr");
    let shared = common::segmented_unit("u", &[("One.", "a"), ("Two.", "b")]).into_shared();

    {
        let mut unit = shared.write();
        unit.create_target(&fr, false, CreateOptions::COPY_ALL);
    }

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let shared = Arc::clone(&shared);
            let fr = fr.clone();
            thread::spawn(move || shared.read().target(&fr).map(|t| t.segment_count()))
        })
        .collect();
    for reader in readers {
        assert_eq!(reader.join().unwrap(), Some(2));
    }
}

/// Test that records keep segmentation, properties and alignment
#[test]
fn test_record_roundTrip_shouldKeepEverything() {
    let fr = loc("fr");
    let mut unit = common::segmented_unit("u", &[("One. ", "a"), ("Two.", "b")]);
    unit.set_name(Some("title"));
    unit.set_property(Property::read_only("origin", "test"));
    let mut content = common::bold_fragment();
    content.append_str(".");
    unit.source_mut().append_segment(Segment::new("c", content), false);
    unit.create_target(&fr, false, CreateOptions::COPY_ALL);
    unit.set_target_property(&fr, Property::new("state", "final"));
    unit.aligned_segments().align(&fr).unwrap();
    unit.create_source(&loc("de"), false, CreateOptions::COPY_SEGMENTS);

    let json = serde_json::to_string(&unit.to_record()).unwrap();
    let record: TextUnitRecord = serde_json::from_str(&json).unwrap();
    let restored = TextUnit::from_record(&record).unwrap();

    assert_eq!(restored.id(), "u");
    assert_eq!(restored.name(), Some("title"));
    assert!(restored.property("origin").unwrap().read_only);
    assert_eq!(restored.source(), unit.source());
    assert_eq!(restored.target(&fr), unit.target(&fr));
    assert_eq!(restored.target_property(&fr, "state").unwrap().value, "final");
    assert_eq!(restored.alignment_status_for(&fr), AlignmentStatus::Aligned);
    assert_eq!(restored.source_for(&loc("de")).segment_ids(), vec!["a", "b", "c"]);
}

/// Test that a record with mismatched codes is rejected
#[test]
fn test_fromRecord_withBadCodedText_shouldFail() {
    let mut record = TextUnit::with_text("u", "Hi").to_record();
    record.source.coded_text = common::bold_fragment().coded_text().to_string();

    assert!(TextUnit::from_record(&record).is_err());
}
