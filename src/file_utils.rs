use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::resource::{TextUnit, TextUnitRecord};

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path).with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Output path next to the input, with a suffix before the extension
    // @params: input_file, output_dir, suffix
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        suffix: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();
        let extension = input_file
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_else(|| "json".to_string());
        output_dir
            .as_ref()
            .join(format!("{}.{}.{}", stem, suffix, extension))
    }

    /// Find files with a specific extension in a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let wanted = extension.trim_start_matches('.');
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            let matches = path
                .extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(wanted));
            if path.is_file() && matches {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path).with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Load the text units stored in a JSON array of records
    pub fn load_units<P: AsRef<Path>>(path: P) -> Result<Vec<TextUnit>> {
        let path = path.as_ref();
        let content = Self::read_to_string(path)?;
        let records: Vec<TextUnitRecord> =
            serde_json::from_str(&content).with_context(|| format!("Failed to parse records: {:?}", path))?;
        records
            .iter()
            .map(|record| {
                TextUnit::from_record(record).with_context(|| format!("Invalid text unit '{}' in {:?}", record.id, path))
            })
            .collect()
    }

    /// Store text units as a pretty JSON array of records
    pub fn save_units<P: AsRef<Path>>(path: P, units: &[TextUnit]) -> Result<()> {
        let records: Vec<TextUnitRecord> = units.iter().map(TextUnit::to_record).collect();
        let json = serde_json::to_string_pretty(&records).context("Failed to serialize records")?;
        Self::write_to_file(path, &json)
    }
}
