/*!
 * Tests for file utility functions
 */

use std::fs;
use std::path::PathBuf;

use segalign::file_utils::FileManager;
use segalign::resource::TextUnit;

use crate::common;

/// Test file existence checks
#[test]
fn test_file_exists_withExistingAndMissingFiles_shouldReturnCorrectResult() {
    let dir = common::create_temp_dir().unwrap();
    let file = common::create_test_file(dir.path(), "units.json", "[]").unwrap();

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::file_exists(dir.path().join("missing.json")));
    assert!(!FileManager::file_exists(dir.path()));
}

/// Test that output paths keep the extension after the suffix
#[test]
fn test_generate_output_path_withVariousInputs_shouldInsertSuffix() {
    let path = FileManager::generate_output_path("/data/units.json", "/out", "aligned");
    assert_eq!(path, PathBuf::from("/out/units.aligned.json"));

    let path = FileManager::generate_output_path("notes", "/out", "segmented");
    assert_eq!(path, PathBuf::from("/out/notes.segmented.json"));
}

/// Test that file search is recursive, sorted and extension based
#[test]
fn test_find_files_withNestedDirectories_shouldFindMatchingFiles() {
    let dir = common::create_temp_dir().unwrap();
    let nested = dir.path().join("nested");
    fs::create_dir(&nested).unwrap();
    let b = common::create_test_file(dir.path(), "b.json", "[]").unwrap();
    let a = common::create_test_file(&nested, "a.JSON", "[]").unwrap();
    common::create_test_file(dir.path(), "c.txt", "").unwrap();

    let found = FileManager::find_files(dir.path(), ".json").unwrap();

    assert_eq!(found.len(), 2);
    assert!(found.contains(&a));
    assert!(found.contains(&b));
}

/// Test that writing creates missing parent directories
#[test]
fn test_write_to_file_withMissingParent_shouldCreateIt() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("x").join("y").join("out.txt");

    FileManager::write_to_file(&path, "content").unwrap();

    assert_eq!(FileManager::read_to_string(&path).unwrap(), "content");
}

/// Test that the units file written by the helpers loads back
#[test]
fn test_load_units_withSavedFile_shouldRestoreUnits() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_units_file(dir.path(), "units.json").unwrap();

    let units = FileManager::load_units(&path).unwrap();

    assert_eq!(units.len(), 4);
    assert_eq!(units[0].source().to_string(), "Hello world. How are you?");
    assert_eq!(units[2].source().to_string(), "<b>bold</b> text. Second sentence.");
    assert_eq!(units[2].source().segments().next().unwrap().text.codes().len(), 2);
    assert!(!units[3].is_translatable());
}

/// Test that invalid content is reported with context
#[test]
fn test_load_units_withInvalidContent_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let not_json = common::create_test_file(dir.path(), "bad.json", "{").unwrap();
    assert!(FileManager::load_units(&not_json).is_err());

    let mut record = TextUnit::with_text("u", "Hi").to_record();
    record.source.coded_text = "\u{E101}\u{E110}".to_string();
    let json = serde_json::to_string(&vec![record]).unwrap();
    let bad_codes = common::create_test_file(dir.path(), "codes.json", &json).unwrap();

    let error = FileManager::load_units(&bad_codes).unwrap_err();
    assert!(format!("{:#}", error).contains("Invalid text unit 'u'"));
}
