use anyhow::{anyhow, Context, Result};
use log::{debug, error, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::errors::ContentError;
use crate::file_utils::FileManager;
use crate::locale::LocaleId;
use crate::resource::{AlignmentStatus, GenericContent, TextUnit};
use crate::segmenter::{RegexSegmenter, Segmenter};

// @module: Application controller for segmentation and alignment of text unit files

/// Outcome of aligning one unit for one locale
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentReport {
    // @field: Text unit id
    pub unit_id: String,

    // @field: Target locale
    pub locale: LocaleId,

    // @field: Status after the attempt
    pub status: AlignmentStatus,

    pub source_count: usize,

    // @field: Target segment count, None when the unit has no target
    pub target_count: Option<usize>,
}

impl fmt::Display for AlignmentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target_count {
            Some(count) => write!(
                f,
                "{} [{}]: {} ({} source / {} target segment(s))",
                self.unit_id, self.locale, self.status, self.source_count, count
            ),
            None => write!(f, "{} [{}]: no target", self.unit_id, self.locale),
        }
    }
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Segmenter built from the segmentation rules
    segmenter: RegexSegmenter,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        let segmenter = RegexSegmenter::from_config(&config.segmentation)?;
        Ok(Self { config, segmenter })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // @returns: Target locales from the command line if any, else from the configuration
    pub fn resolve_locales(&self, overrides: &[String]) -> Result<Vec<LocaleId>> {
        if overrides.is_empty() {
            return self.config.target_locales();
        }
        let source = self.config.source_locale()?;
        let mut locales: Vec<LocaleId> = Vec::with_capacity(overrides.len());
        for tag in overrides {
            let locale = LocaleId::new(tag).context(format!("Invalid target locale: {}", tag))?;
            if locale == source {
                return Err(anyhow!("Target locale {} is the source locale", locale));
            }
            if !locales.contains(&locale) {
                locales.push(locale);
            }
        }
        Ok(locales)
    }

    /// Segment the sources of the units and prepare their targets.
    ///
    /// New targets are created with the configured options. Existing targets
    /// with content are segmented too; every target then gets a counterpart
    /// for each source segment, and is aligned when the counts match.
    pub fn segment_units(&self, units: &mut [TextUnit], locales: &[LocaleId]) -> Result<()> {
        if locales.is_empty() {
            return Err(anyhow!("No target locale to segment for"));
        }
        let alignment = &self.config.alignment;
        let targets = &self.config.targets;

        for unit in units.iter_mut() {
            if !unit.is_translatable() {
                debug!("Skipping non-translatable unit '{}'", unit.id());
                continue;
            }
            let mut default_done = false;
            for locale in locales {
                let variant = unit.variant_sources().has_variant(locale);
                if variant || !default_done {
                    unit.aligned_segments().segment_source(&self.segmenter, locale)?;
                    default_done |= !variant;
                }
            }

            for locale in locales {
                let existing = unit
                    .target(locale)
                    .is_some_and(|t| t.segments().any(|s| !s.text.is_empty()));
                if existing && !targets.overwrite_existing {
                    unit.aligned_segments().segment_target(&self.segmenter, locale)?;
                } else {
                    unit.create_target(locale, targets.overwrite_existing, targets.creation_options);
                }

                let source_segments: Vec<_> = unit.source_for(locale).segments().cloned().collect();
                let mut aligned = unit.aligned_segments();
                for segment in &source_segments {
                    aligned.get_corresponding_target(
                        segment,
                        locale,
                        alignment.variant_options,
                        alignment.copy_options,
                    )?;
                }
                match aligned.align(locale) {
                    Ok(()) => {}
                    Err(ContentError::MisAlignment { source_count, target_count, .. }) => {
                        warn!(
                            "Unit '{}' not aligned for {}: {} source / {} target segment(s)",
                            unit.id(),
                            locale,
                            source_count,
                            target_count
                        );
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
        Ok(())
    }

    /// Align the units positionally for a locale.
    ///
    /// With `collapse`, a unit whose counts differ is collapsed to one
    /// segment per container instead.
    pub fn align_units(&self, units: &mut [TextUnit], locale: &LocaleId, collapse: bool) -> Result<Vec<AlignmentReport>> {
        let mut reports = Vec::with_capacity(units.len());
        for unit in units.iter_mut() {
            let source_count = unit.source_for(locale).segment_count();
            if !unit.has_target(locale) {
                reports.push(AlignmentReport {
                    unit_id: unit.id().to_string(),
                    locale: locale.clone(),
                    status: AlignmentStatus::NotAligned,
                    source_count,
                    target_count: None,
                });
                continue;
            }

            let unit_id = unit.id().to_string();
            let mut aligned = unit.aligned_segments();
            match aligned.align(locale) {
                Ok(()) => {}
                Err(ContentError::MisAlignment { .. }) if collapse => {
                    debug!("Collapsing unit '{}' for {}", unit_id, locale);
                    aligned.align_collapse_all(locale, self.config.alignment.variant_options)?;
                }
                Err(ContentError::MisAlignment { source_count, target_count, .. }) => {
                    debug!("Unit '{}': {} vs {} segment(s)", unit_id, source_count, target_count);
                }
                Err(e) => return Err(e.into()),
            }

            reports.push(AlignmentReport {
                unit_id,
                locale: locale.clone(),
                status: unit.alignment_status_for(locale),
                source_count: unit.source_for(locale).segment_count(),
                target_count: unit.target(locale).map(|t| t.segment_count()),
            });
        }
        Ok(reports)
    }

    /// Segmented generic view of the units, one block per unit
    pub fn show_units(&self, units: &[TextUnit], with_data: bool) -> String {
        let mut out = String::new();
        for unit in units {
            out.push_str(&format!("{} ({})\n", unit.id(), unit.alignment_status()));
            out.push_str(&format!("  source: {}\n", GenericContent::segmented(unit.source(), with_data)));
            for (locale, source) in unit.variant_sources().iter() {
                out.push_str(&format!("  source[{}]: {}\n", locale, GenericContent::segmented(source, with_data)));
            }
            for (locale, target) in unit.targets() {
                out.push_str(&format!(
                    "  {} ({}): {}\n",
                    locale,
                    unit.alignment_status_for(locale),
                    GenericContent::segmented(target, with_data)
                ));
            }
        }
        out
    }

    /// Segment a file, or every JSON file of a directory
    pub fn run_segment(
        &self,
        input: &Path,
        output: Option<PathBuf>,
        locales: &[String],
        force_overwrite: bool,
    ) -> Result<Vec<PathBuf>> {
        let start_time = std::time::Instant::now();
        let locales = self.resolve_locales(locales)?;
        let mut written = Vec::new();

        for file in Self::input_files(input)? {
            let output_path = match (&output, input.is_dir()) {
                (Some(path), false) => path.clone(),
                _ => FileManager::generate_output_path(&file, file.parent().unwrap_or(Path::new(".")), "segmented"),
            };
            if output_path.exists() && !force_overwrite {
                warn!("Skipping {:?}, output already exists (use -f to force overwrite)", output_path);
                continue;
            }

            let result = FileManager::load_units(&file).and_then(|mut units| {
                self.segment_units(&mut units, &locales)?;
                FileManager::save_units(&output_path, &units)?;
                Ok(units.len())
            });
            match result {
                Ok(count) => {
                    info!("Segmented {} unit(s): {}", count, output_path.display());
                    written.push(output_path);
                }
                Err(e) if input.is_dir() => error!("Error processing file {:?}: {:#}", file, e),
                Err(e) => return Err(e),
            }
        }

        info!("Done in {}", Self::format_duration(start_time.elapsed()));
        Ok(written)
    }

    /// Align a file for a locale, writing the result and returning the reports
    pub fn run_align(
        &self,
        input: &Path,
        locale: &str,
        output: Option<PathBuf>,
        collapse: bool,
    ) -> Result<Vec<AlignmentReport>> {
        let locale = LocaleId::new(locale).context(format!("Invalid target locale: {}", locale))?;
        let mut units = FileManager::load_units(input)?;
        let reports = self.align_units(&mut units, &locale, collapse)?;

        let output_path = output.unwrap_or_else(|| {
            FileManager::generate_output_path(input, input.parent().unwrap_or(Path::new(".")), "aligned")
        });
        FileManager::save_units(&output_path, &units)?;

        let aligned = reports.iter().filter(|r| r.status.is_aligned()).count();
        info!("{} of {} unit(s) aligned for {}: {}", aligned, reports.len(), locale, output_path.display());
        Ok(reports)
    }

    /// Generic view of the units of a file
    pub fn run_show(&self, input: &Path, with_data: bool) -> Result<String> {
        let units = FileManager::load_units(input)?;
        Ok(self.show_units(&units, with_data))
    }

    fn input_files(input: &Path) -> Result<Vec<PathBuf>> {
        if input.is_file() {
            return Ok(vec![input.to_path_buf()]);
        }
        if !input.is_dir() {
            return Err(anyhow!("Input path does not exist: {:?}", input));
        }
        let files: Vec<PathBuf> = FileManager::find_files(input, "json")?
            .into_iter()
            .filter(|f| {
                let stem = f.file_stem().unwrap_or_default().to_string_lossy();
                !stem.ends_with(".segmented") && !stem.ends_with(".aligned")
            })
            .collect();
        debug!("Found {} file(s) in {:?}", files.len(), input);
        Ok(files)
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }

    /// Segmenter used by this controller
    pub fn segmenter(&self) -> &dyn Segmenter {
        &self.segmenter
    }
}
