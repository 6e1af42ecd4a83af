use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::document::Document;
use crate::file_utils::FileManager;
use crate::repair::{EngineOptions, FixEngine, FixPass, FixReport};
use crate::resources::ResourceCatalog;
use crate::subtitle_processor::SubtitleCollection;

// @module: Application controller for subtitle fixing

/// What happened to one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Fixed and written to the given path
    Written(PathBuf),
    /// Dry run, nothing written
    Previewed,
    /// Output already existed and overwriting was not forced
    Skipped(PathBuf),
}

/// Result of fixing one file
#[derive(Debug, Clone)]
pub struct FileResult {
    pub input: PathBuf,
    pub outcome: FileOutcome,
    pub report: FixReport,
}

/// Totals for a folder run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub cues_changed: usize,
}

/// Per-run switches coming from the command line
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Overwrite existing output files
    pub force_overwrite: bool,
    /// Report changes without writing files
    pub dry_run: bool,
    /// Append every change to this file
    pub change_log: Option<PathBuf>,
}

/// Main application controller for subtitle fixing
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Engine with the run language's resources loaded
    engine: FixEngine,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let mut catalog = ResourceCatalog::new();
        if let Some(dir) = &config.resources_dir {
            catalog
                .load_language(dir, &config.language)
                .with_context(|| format!("Failed to load resources for '{}'", config.language))?;
        }

        let engine = FixEngine::new(EngineOptions {
            max_merged_length: config.fixes.max_merged_length,
        })
        .with_catalog(catalog);

        Ok(Self { config, engine })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn engine(&self) -> &FixEngine {
        &self.engine
    }

    /// Passes enabled by the configuration, in execution order
    pub fn enabled_passes(&self) -> Vec<FixPass> {
        FixPass::ordered(&self.config.fixes.enabled_passes)
    }

    /// Fix an in-memory document with the configured passes.
    pub fn fix_document(&self, document: &mut Document) -> FixReport {
        self.engine
            .apply(document, &self.enabled_passes(), &self.config.language)
    }

    /// Fix a single subtitle file.
    pub fn run(&self, input_file: &Path, options: &RunOptions) -> Result<FileResult> {
        let start_time = Instant::now();

        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let output_path =
            FileManager::generate_output_path(input_file, None, &self.config.output_suffix);
        if output_path == input_file && !options.force_overwrite && !options.dry_run {
            return Err(anyhow!(
                "Output would overwrite the input file {:?} (empty output suffix, use -f to allow)",
                input_file
            ));
        }
        if output_path.exists() && !options.force_overwrite && !options.dry_run {
            warn!("Skipping file, fixed output already exists (use -f to force overwrite)");
            return Ok(FileResult {
                input: input_file.to_path_buf(),
                outcome: FileOutcome::Skipped(output_path),
                report: FixReport::default(),
            });
        }

        let mut subtitles = SubtitleCollection::load(input_file)?;
        let report = self.fix_document(&mut subtitles.document);

        if let Some(log_path) = &options.change_log {
            Self::write_change_log(log_path, input_file, &report)?;
        }

        let outcome = if options.dry_run {
            Self::print_changes(input_file, &report);
            FileOutcome::Previewed
        } else {
            subtitles.write_to_srt(&output_path)?;
            info!("Success: {}", output_path.display());
            FileOutcome::Written(output_path)
        };

        debug!(
            "Fixed {:?} in {}",
            input_file,
            Self::format_duration(start_time.elapsed())
        );

        Ok(FileResult {
            input: input_file.to_path_buf(),
            outcome,
            report,
        })
    }

    /// Run the workflow in folder mode, fixing every subtitle file below
    /// `input_dir`. Outputs of earlier runs are not picked up again.
    pub fn run_folder(&self, input_dir: &Path, options: &RunOptions) -> Result<FolderSummary> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let files = FileManager::find_subtitle_files(input_dir, &self.config.output_suffix)?;
        if files.is_empty() {
            return Err(anyhow!("No subtitle files found in directory: {:?}", input_dir));
        }

        let folder_pb = ProgressBar::new(files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Fixing files");

        let mut summary = FolderSummary::default();

        for file in &files {
            let file_name = file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Fixing: {}", file_name));

            match self.run(file, options) {
                Ok(result) => match result.outcome {
                    FileOutcome::Skipped(_) => summary.skipped += 1,
                    _ => {
                        summary.processed += 1;
                        summary.cues_changed += result.report.changed_count();
                    }
                },
                Err(e) => {
                    error!("Error fixing {:?}: {:#}", file, e);
                    summary.failed += 1;
                }
            }
            folder_pb.inc(1);
        }

        folder_pb.finish_and_clear();

        info!(
            "Fixed {} files ({} cues changed), {} skipped, {} failed in {}",
            summary.processed,
            summary.cues_changed,
            summary.skipped,
            summary.failed,
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }

    fn print_changes(input_file: &Path, report: &FixReport) {
        println!("{}: {} cue(s) would change", input_file.display(), report.changed_count());
        for change in &report.changes {
            let passes: Vec<&str> = change.passes.iter().map(FixPass::name).collect();
            println!("  #{} [{}]", change.index + 1, passes.join(", "));
            println!("    - {:?}", change.old_text);
            println!("    + {:?}", change.new_text);
        }
        for skipped in &report.skipped {
            println!("  #{} skipped {}: {}", skipped.index + 1, skipped.pass, skipped.reason);
        }
    }

    fn write_change_log(log_path: &Path, input_file: &Path, report: &FixReport) -> Result<()> {
        for change in &report.changes {
            let passes: Vec<&str> = change.passes.iter().map(FixPass::name).collect();
            FileManager::append_to_log_file(
                log_path,
                &format!(
                    "{} #{} [{}] {:?} -> {:?}",
                    input_file.display(),
                    change.index + 1,
                    passes.join(", "),
                    change.old_text,
                    change.new_text
                ),
            )?;
        }
        Ok(())
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
