/*!
 * Integration tests for segmenting, aligning and showing unit files
 */

use anyhow::Result;
use std::fs;

use segalign::app_config::Config;
use segalign::app_controller::Controller;
use segalign::file_utils::FileManager;
use segalign::resource::{AlignmentStatus, CreateOptions};

use crate::common::{self, loc};

fn controller() -> Result<Controller> {
    Controller::with_config(Config::default())
}

/// Test segmenting a units file end to end
#[test]
fn test_runSegment_withUnitsFile_shouldWriteSegmentedUnits() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let input = common::create_units_file(dir.path(), "units.json")?;
    let controller = controller()?;

    let written = controller.run_segment(&input, None, &[], false)?;

    let expected = dir.path().join("units.segmented.json");
    assert_eq!(written, vec![expected.clone()]);
    let units = FileManager::load_units(&expected)?;
    let fr = loc("fr");

    assert_eq!(units[0].source().segment_count(), 2);
    assert_eq!(units[1].source().segment_count(), 1);
    assert_eq!(units[2].source().segment_count(), 2);
    for unit in &units[..3] {
        assert_eq!(unit.target(&fr).unwrap().segment_ids(), unit.source().segment_ids());
        assert_eq!(unit.alignment_status(), AlignmentStatus::Aligned);
    }

    let first = units[2].source().segments().next().unwrap();
    assert_eq!(first.text.to_string(), "<b>bold</b> text.");
    assert!(first.text.check_balance().is_ok());

    assert!(!units[3].has_target(&fr));
    assert!(!units[3].source().is_segmented());
    Ok(())
}

/// Test that an existing output is kept unless forced
#[test]
fn test_runSegment_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let input = common::create_units_file(dir.path(), "units.json")?;
    let existing = common::create_test_file(dir.path(), "units.segmented.json", "[]")?;
    let controller = controller()?;

    let written = controller.run_segment(&input, None, &[], false)?;
    assert!(written.is_empty());
    assert_eq!(fs::read_to_string(&existing)?, "[]");

    let written = controller.run_segment(&input, None, &["de".to_string()], true)?;
    assert_eq!(written, vec![existing.clone()]);
    let units = FileManager::load_units(&existing)?;
    assert!(units[0].has_target(&loc("de")));
    assert!(!units[0].has_target(&loc("fr")));
    Ok(())
}

/// Test that a directory input skips files produced by earlier runs
#[test]
fn test_runSegment_withDirectory_shouldSkipOutputs() -> Result<()> {
    let dir = common::create_temp_dir()?;
    common::create_units_file(dir.path(), "a.json")?;
    common::create_units_file(dir.path(), "b.json")?;
    common::create_test_file(dir.path(), "broken.json", "not json")?;
    let controller = controller()?;

    let written = controller.run_segment(dir.path(), None, &[], false)?;
    assert_eq!(written.len(), 2);
    assert!(dir.path().join("a.segmented.json").exists());
    assert!(dir.path().join("b.segmented.json").exists());

    let again = controller.run_segment(dir.path(), None, &[], true)?;
    assert_eq!(again.len(), 2);
    assert!(!dir.path().join("a.segmented.segmented.json").exists());
    Ok(())
}

/// Test that a missing input is an error
#[test]
fn test_runSegment_withMissingInput_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let controller = controller()?;
    assert!(controller.run_segment(&dir.path().join("none.json"), None, &[], false).is_err());
    Ok(())
}

/// Test aligning a file whose unit counts differ, with and without collapse
#[test]
fn test_runAlign_withMismatchedUnit_shouldCollapseWhenAsked() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let fr = loc("fr");
    let mut unit = common::segmented_unit("m", &[("One. ", "a"), ("Two.", "b")]);
    unit.create_target(&fr, false, CreateOptions::CREATE_EMPTY);
    let input = dir.path().join("units.json");
    FileManager::save_units(&input, &[unit])?;
    let controller = controller()?;

    let reports = controller.run_align(&input, "fr", None, false)?;
    assert_eq!(reports[0].status, AlignmentStatus::NotAligned);
    let aligned_path = dir.path().join("units.aligned.json");
    assert!(aligned_path.exists());

    let output = dir.path().join("collapsed.json");
    let reports = controller.run_align(&input, "fr", Some(output.clone()), true)?;
    assert_eq!(reports[0].status, AlignmentStatus::Aligned);
    let units = FileManager::load_units(&output)?;
    assert_eq!(units[0].source().segment_count(), 1);
    assert_eq!(units[0].alignment_status_for(&fr), AlignmentStatus::Aligned);
    Ok(())
}

/// Test that an invalid locale is refused before touching files
#[test]
fn test_runAlign_withInvalidLocale_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let input = common::create_units_file(dir.path(), "units.json")?;
    let controller = controller()?;

    assert!(controller.run_align(&input, "??", None, false).is_err());
    assert!(!dir.path().join("units.aligned.json").exists());
    Ok(())
}

/// Test showing a segmented file
#[test]
fn test_runShow_withSegmentedFile_shouldBracketSegments() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let input = common::create_units_file(dir.path(), "units.json")?;
    let controller = controller()?;
    let written = controller.run_segment(&input, None, &[], false)?;

    let shown = controller.run_show(&written[0], false)?;
    assert!(shown.contains("[Hello world.] [How are you?]"));
    assert!(shown.contains("[<1>bold</1> text.] [Second sentence.]"));

    let with_data = controller.run_show(&written[0], true)?;
    assert!(with_data.contains("[<b>bold</b> text.]"));
    Ok(())
}
