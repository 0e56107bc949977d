/*!
 * Tests for controller operations on in-memory units
 */

use segalign::app_config::Config;
use segalign::app_controller::Controller;
use segalign::resource::{AlignmentStatus, CreateOptions, TextUnit};

use crate::common::{self, loc};

fn controller() -> Controller {
    Controller::with_config(Config::default()).unwrap()
}

/// Test that command line locales override the configured ones
#[test]
fn test_resolveLocales_withOverrides_shouldParseAndDeduplicate() {
    let controller = controller();

    assert_eq!(controller.resolve_locales(&[]).unwrap(), vec![loc("fr")]);

    let overrides = vec!["de".to_string(), "ja".to_string(), "DE".to_string()];
    assert_eq!(controller.resolve_locales(&overrides).unwrap(), vec![loc("de"), loc("ja")]);

    assert!(controller.resolve_locales(&["en".to_string()]).is_err());
    assert!(controller.resolve_locales(&["??".to_string()]).is_err());
}

/// Test that an invalid configuration is refused
#[test]
fn test_withConfig_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.segmentation.break_pattern = "[".to_string();
    assert!(Controller::with_config(config).is_err());
}

/// Test that segmenting creates aligned targets for every locale
#[test]
fn test_segmentUnits_withNewTargets_shouldAlignEachLocale() {
    let controller = controller();
    let mut units = vec![TextUnit::with_text("1", "Hello world. How are you?")];
    let locales = vec![loc("fr"), loc("de")];

    controller.segment_units(&mut units, &locales).unwrap();

    let unit = &units[0];
    assert_eq!(unit.source().segment_count(), 2);
    for locale in &locales {
        let target = unit.target(locale).unwrap();
        assert_eq!(target.segment_ids(), unit.source().segment_ids());
        assert!(target.segments().all(|s| s.text.is_empty()));
        assert_eq!(target.to_string(), " ");
        assert_eq!(unit.alignment_status_for(locale), AlignmentStatus::Aligned);
    }
    assert_eq!(unit.alignment_status(), AlignmentStatus::Aligned);
}

/// Test that existing targets are segmented instead of replaced
#[test]
fn test_segmentUnits_withExistingTarget_shouldSegmentIt() {
    let controller = controller();
    let fr = loc("fr");
    let mut unit = TextUnit::with_text("1", "One. Two.");
    unit.set_target_content(&fr, "Un. Deux.".into());
    let mut units = vec![unit];

    controller.segment_units(&mut units, &[fr.clone()]).unwrap();

    let target = units[0].target(&fr).unwrap();
    let texts: Vec<String> = target.segments().map(|s| s.text.to_string()).collect();
    assert_eq!(texts, vec!["Un.", "Deux."]);
    assert_eq!(units[0].alignment_status_for(&fr), AlignmentStatus::Aligned);
}

/// Test that a target with fewer sentences gets empty counterparts
#[test]
fn test_segmentUnits_withShorterTarget_shouldFillMissingSegments() {
    let controller = controller();
    let fr = loc("fr");
    let mut unit = TextUnit::with_text("1", "One. Two.");
    unit.set_target_content(&fr, "Un et deux".into());
    let mut units = vec![unit];

    controller.segment_units(&mut units, &[fr.clone()]).unwrap();

    let unit = &units[0];
    let target = unit.target(&fr).unwrap();
    assert_eq!(target.segment_count(), 2);
    assert_eq!(target.segments().next().unwrap().text.to_string(), "Un et deux");
    assert_eq!(unit.alignment_status_for(&fr), AlignmentStatus::Aligned);
}

/// Test that aligning reports units without target
#[test]
fn test_alignUnits_withoutTarget_shouldReportIt() {
    let controller = controller();
    let mut units = vec![TextUnit::with_text("1", "Hello.")];

    let reports = controller.align_units(&mut units, &loc("fr"), false).unwrap();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].target_count, None);
    assert_eq!(reports[0].status, AlignmentStatus::NotAligned);
    assert_eq!(reports[0].to_string(), "1 [fr]: no target");
}

/// Test that collapsing aligns units whose counts differ
#[test]
fn test_alignUnits_withCollapse_shouldAlignMismatchedUnits() {
    let controller = controller();
    let fr = loc("fr");
    let mut unit = common::segmented_unit("m", &[("One. ", "a"), ("Two.", "b")]);
    unit.create_target(&fr, false, CreateOptions::CREATE_EMPTY);
    let mut units = vec![unit.clone()];

    let reports = controller.align_units(&mut units, &fr, false).unwrap();
    assert_eq!(reports[0].status, AlignmentStatus::NotAligned);
    assert_eq!((reports[0].source_count, reports[0].target_count), (2, Some(1)));

    let mut units = vec![unit];
    let reports = controller.align_units(&mut units, &fr, true).unwrap();
    assert_eq!(reports[0].status, AlignmentStatus::Aligned);
    assert_eq!((reports[0].source_count, reports[0].target_count), (1, Some(1)));
    assert_eq!(units[0].source().to_string(), "One. Two.");
}

/// Test the segmented view of units
#[test]
fn test_showUnits_shouldBracketSegments() {
    let controller = controller();
    let mut units = vec![TextUnit::with_text("1", "One. Two.")];
    controller.segment_units(&mut units, &[loc("fr")]).unwrap();

    let shown = controller.show_units(&units, false);

    assert!(shown.contains("1 (aligned)"));
    assert!(shown.contains("source: [One.] [Two.]"));
    assert!(shown.contains("fr (aligned): [] []"));
}
