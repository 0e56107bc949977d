/*!
 * Common test utilities for the segalign test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use segalign::file_utils::FileManager;
use segalign::locale::LocaleId;
use segalign::resource::{Range, TagType, TextFragment, TextUnit};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Parses a locale known to be valid
pub fn loc(tag: &str) -> LocaleId {
    LocaleId::new(tag).unwrap()
}

/// Builds a unit whose source is segmented into the given (text, id) pieces.
///
/// Pieces are concatenated without separators and each becomes a segment.
pub fn segmented_unit(id: &str, pieces: &[(&str, &str)]) -> TextUnit {
    let text: String = pieces.iter().map(|(t, _)| *t).collect();
    let mut unit = TextUnit::with_text(id, &text);
    let mut ranges = Vec::new();
    let mut start = 0;
    for (piece, segment_id) in pieces {
        let end = start + piece.chars().count();
        ranges.push(Range::with_id(start, end, *segment_id));
        start = end;
    }
    unit.source_mut().create(&ranges).unwrap();
    unit
}

/// Builds the fragment `<b>bold</b> text` with one spanning code pair
pub fn bold_fragment() -> TextFragment {
    let mut fragment = TextFragment::new();
    fragment.append_code(TagType::Opening, Some("b"), Some("<b>"));
    fragment.append_str("bold");
    fragment.append_code(TagType::Closing, Some("b"), Some("</b>"));
    fragment.append_str(" text");
    fragment
}

/// Writes a small set of units to a JSON file
pub fn create_units_file(dir: &Path, filename: &str) -> Result<PathBuf> {
    let path = dir.join(filename);
    let mut with_code = TextUnit::new("3");
    let mut content = bold_fragment();
    content.append_str(". Second sentence.");
    with_code.set_source_content(content);
    let mut hidden = TextUnit::with_text("4", "Not for translation. Keep.");
    hidden.set_translatable(false);

    let units = vec![
        TextUnit::with_text("1", "Hello world. How are you?"),
        TextUnit::with_text("2", "Single sentence"),
        with_code,
        hidden,
    ];
    FileManager::save_units(&path, &units)?;
    Ok(path)
}
