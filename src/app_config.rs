use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::locale::LocaleId;
use crate::resource::{CopyOptions, CreateOptions, VariantOptions};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Source locale of the processed units
    #[serde(default = "default_source_locale")]
    pub source_locale: String,

    /// Target locales to create
    #[serde(default = "default_target_locales")]
    pub target_locales: Vec<String>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Alignment engine options
    #[serde(default)]
    pub alignment: AlignmentConfig,

    /// Target creation options
    #[serde(default)]
    pub targets: TargetConfig,

    /// Sentence segmentation rules
    #[serde(default)]
    pub segmentation: SegmentationConfig,
}

/// Options given to the alignment engine
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct AlignmentConfig {
    // @field: Containers touched by structural edits
    #[serde(default)]
    pub variant_options: VariantOptions,

    // @field: Containers receiving copies of new content
    #[serde(default)]
    pub copy_options: CopyOptions,
}

/// How targets are created
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct TargetConfig {
    // @field: What a new target inherits from its source
    #[serde(default)]
    pub creation_options: CreateOptions,

    // @field: Replace targets that already exist
    #[serde(default)]
    pub overwrite_existing: bool,
}

/// Regex based sentence segmentation rules
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SegmentationConfig {
    /// Pattern matching a sentence end and the whitespace after it
    #[serde(default = "default_break_pattern")]
    pub break_pattern: String,

    /// Pattern matched against the text before a break; a match cancels the break
    #[serde(default = "default_exception_pattern")]
    pub exception_pattern: Option<String>,

    /// Keep the whitespace after a sentence inside its segment
    #[serde(default)]
    pub include_trailing_whitespace: bool,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            break_pattern: default_break_pattern(),
            exception_pattern: default_exception_pattern(),
            include_trailing_whitespace: false,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log facade filter
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(anyhow!("Invalid log level: {}", s)),
        }
    }
}

fn default_source_locale() -> String {
    "en".to_string()
}

fn default_target_locales() -> Vec<String> {
    vec!["fr".to_string()]
}

fn default_break_pattern() -> String {
    r#"[.!?]+["')\]]*\s+"#.to_string()
}

fn default_exception_pattern() -> Option<String> {
    Some(r"\b(?:Mr|Mrs|Ms|Dr|St|etc|e\.g|i\.e)\.\s*$".to_string())
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let source = self.source_locale()?;
        let targets = self.target_locales()?;
        if targets.is_empty() {
            return Err(anyhow!("At least one target locale is required"));
        }
        if targets.contains(&source) {
            return Err(anyhow!("Target locales must differ from the source locale: {}", source));
        }

        Regex::new(&self.segmentation.break_pattern)
            .context(format!("Invalid break pattern: {}", self.segmentation.break_pattern))?;
        if let Some(pattern) = &self.segmentation.exception_pattern {
            Regex::new(pattern).context(format!("Invalid exception pattern: {}", pattern))?;
        }

        Ok(())
    }

    // @returns: Parsed source locale
    pub fn source_locale(&self) -> Result<LocaleId> {
        LocaleId::new(&self.source_locale).context(format!("Invalid source locale: {}", self.source_locale))
    }

    // @returns: Parsed target locales, in configuration order
    pub fn target_locales(&self) -> Result<Vec<LocaleId>> {
        self.target_locales
            .iter()
            .map(|tag| LocaleId::new(tag).context(format!("Invalid target locale: {}", tag)))
            .collect()
    }

    /// Load a configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let reader = BufReader::new(file);
        let config: Config =
            serde_json::from_reader(reader).context(format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Save the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, json).context(format!("Failed to write config to file: {:?}", path))?;
        Ok(())
    }

    /// Load the configuration, or create and save a default one if the file is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }
        log::warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_locale: default_source_locale(),
            target_locales: default_target_locales(),
            log_level: LogLevel::default(),
            alignment: AlignmentConfig::default(),
            targets: TargetConfig::default(),
            segmentation: SegmentationConfig::default(),
        }
    }
}
