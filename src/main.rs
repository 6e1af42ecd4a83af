// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::PathBuf;

use subfix::app_config::{self, Config};
use subfix::app_controller::{Controller, FileOutcome, RunOptions};
use subfix::repair::FixPass;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fix subtitle files (default command)
    Fix(FixArgs),

    /// List the available fix passes in execution order
    Passes,

    /// Generate shell completions for subfix
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct FixArgs {
    /// Input subtitle file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Subtitle language code (e.g., 'en', 'es', 'spa')
    #[arg(short = 'L', long)]
    language: Option<String>,

    /// Comma-separated passes to run (e.g. 'balance_tags,capitalize')
    #[arg(short, long, value_delimiter = ',')]
    passes: Option<Vec<FixPass>>,

    /// Directory with replace lists and word lists
    #[arg(short, long)]
    resources_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Print the changes without writing any file
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Append every change to this file
    #[arg(long)]
    change_log: Option<PathBuf>,
}

/// SUBFIX - subtitle text repair
///
/// Repairs common problems in subtitle text: broken italic tags, missing
/// capitals and periods, speaker dashes, short split lines, Spanish
/// inverted marks and OCR errors.
#[derive(Parser, Debug)]
#[command(name = "subfix")]
#[command(version)]
#[command(about = "Subtitle text repair tool")]
#[command(long_about = "subfix repairs the text of SRT subtitle files with a fixed set of idempotent passes.

EXAMPLES:
    subfix movie.srt                          # Fix using default config, writes movie.fixed.srt
    subfix -f movie.srt                       # Overwrite an existing movie.fixed.srt
    subfix -n movie.srt                       # Show what would change
    subfix -L es /subs/                       # Fix a whole directory of Spanish subtitles
    subfix -p balance_tags,capitalize a.srt   # Run selected passes only
    subfix passes                             # List the available passes
    subfix completions bash > subfix.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    fix: FixArgs,
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

    // @returns: ANSI color and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Installed at the most verbose level; the effective level is
    // narrowed through log::set_max_level once config is known.
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subfix", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Passes) => {
            for pass in FixPass::ALL {
                println!("{:<26} {}", pass.name(), pass.description());
            }
            Ok(())
        }
        Some(Commands::Fix(args)) => run_fix(args),
        None => run_fix(cli.fix),
    }
}

fn run_fix(options: FixArgs) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let input_path = options
        .input_path
        .clone()
        .ok_or_else(|| anyhow!("INPUT_PATH is required"))?;

    let mut config = Config::load_or_create(&options.config_path)?;

    // Override config with CLI options if provided
    if let Some(language) = &options.language {
        config.language = language.clone();
    }
    if let Some(passes) = &options.passes {
        config.fixes.enabled_passes = passes.clone();
    }
    if let Some(dir) = &options.resources_dir {
        config.resources_dir = Some(dir.clone());
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;

    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;
    let run_options = RunOptions {
        force_overwrite: options.force_overwrite,
        dry_run: options.dry_run,
        change_log: options.change_log.clone(),
    };

    if input_path.is_file() {
        let result = controller.run(&input_path, &run_options)?;
        if let FileOutcome::Written(path) = &result.outcome {
            info!("{} cue(s) changed, written to {}", result.report.changed_count(), path.display());
        }
    } else if input_path.is_dir() {
        let summary = controller.run_folder(&input_path, &run_options)?;
        if summary.failed > 0 {
            return Err(anyhow!("{} file(s) could not be fixed", summary.failed));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    Ok(())
}
