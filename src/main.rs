// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::PathBuf;

use segalign::app_config::{Config, LogLevel};
use segalign::app_controller::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Segment the sources of a JSON file of text units and prepare their targets
    Segment {
        /// Input JSON file, or directory of JSON files
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Target locale (repeatable, defaults to the configured locales)
        #[arg(short, long = "target")]
        targets: Vec<String>,

        /// Output file (single input only)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Align source and target segments positionally for a locale
    Align {
        /// Input JSON file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Target locale to align
        #[arg(short, long = "target")]
        target: String,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Collapse units whose segment counts differ
        #[arg(long)]
        collapse: bool,
    },

    /// Print the segmented content of a JSON file of text units
    Show {
        /// Input JSON file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Print the native data of the codes instead of generic tags
        #[arg(long)]
        with_data: bool,
    },

    /// Generate shell completions for segalign
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// segalign - segmentation and alignment of localizable text units
#[derive(Parser, Debug)]
#[command(name = "segalign")]
#[command(version)]
#[command(about = "Segment and align the content of localizable text units")]
#[command(long_about = "segalign reads JSON files of text unit records, segments their source content into
sentences, creates or segments their targets and keeps source and target segments aligned.

EXAMPLES:
    segalign segment units.json                 # Segment for the configured target locales
    segalign segment units.json -t fr -t de     # Segment and prepare French and German targets
    segalign segment ./units/ -f                # Segment every JSON file of a directory
    segalign align units.segmented.json -t fr   # Align French targets and report status
    segalign show units.segmented.json          # Print segments with generic code tags
    segalign completions bash > segalign.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in segalign.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "segalign.json", global = true)]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Symbol and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌", "1;31"),
            Level::Warn => ("🚧", "1;33"),
            Level::Info => ("", "1;32"),
            Level::Debug => ("🔍", "1;36"),
            Level::Trace => ("📋", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (symbol, color) = Self::style_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, symbol, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger with the most verbose level; the effective
    // level is set with set_max_level once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "segalign", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        log::set_max_level(LogLevel::from(level.clone()).to_level_filter());
    }

    let mut config = Config::load_or_create(&cli.config_path)
        .context(format!("Failed to load configuration: {:?}", cli.config_path))?;
    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Segment {
            input,
            targets,
            output,
            force_overwrite,
        } => {
            let written = controller.run_segment(&input, output, &targets, force_overwrite)?;
            info!("{} file(s) written", written.len());
        }
        Commands::Align {
            input,
            target,
            output,
            collapse,
        } => {
            for report in controller.run_align(&input, &target, output, collapse)? {
                println!("{}", report);
            }
        }
        Commands::Show { input, with_data } => {
            print!("{}", controller.run_show(&input, with_data)?);
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
