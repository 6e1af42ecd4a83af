/*!
 * Integration tests for controller runs over files and folders
 */

use anyhow::Result;
use std::fs;

use subfix::app_config::Config;
use subfix::app_controller::{Controller, FileOutcome, RunOptions};
use subfix::repair::FixPass;
use subfix::subtitle_processor::SubtitleCollection;

use crate::common;

/// Fixing one file writes `<stem>.fixed.srt` next to it
#[test]
fn test_controller_run_withSingleFile_shouldWriteFixedCopy() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;

    let controller = Controller::new_for_test()?;
    let result = controller.run(&input, &RunOptions::default())?;

    let expected_output = temp_dir.path().join("movie.fixed.srt");
    assert_eq!(result.outcome, FileOutcome::Written(expected_output.clone()));
    assert_eq!(result.report.changed_count(), 3);

    let fixed = SubtitleCollection::load(&expected_output)?;
    assert_eq!(fixed.document.text(0), Some("<i>Hey!</i> <i>Boy!</i>"));
    assert_eq!(fixed.document.text(1), Some("- Hi Joe!\n- Hi Pete!"));
    assert_eq!(fixed.document.text(2), Some("Mm-hmm."));

    // input untouched
    assert_eq!(fs::read_to_string(&input)?, common::BROKEN_SRT);
    Ok(())
}

/// An existing output is only replaced with force_overwrite
#[test]
fn test_controller_run_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let output = common::create_test_file(temp_dir.path(), "movie.fixed.srt", "old")?;

    let controller = Controller::new_for_test()?;
    let result = controller.run(&input, &RunOptions::default())?;
    assert_eq!(result.outcome, FileOutcome::Skipped(output.clone()));
    assert_eq!(fs::read_to_string(&output)?, "old");

    let forced = RunOptions {
        force_overwrite: true,
        ..RunOptions::default()
    };
    let result = controller.run(&input, &forced)?;
    assert_eq!(result.outcome, FileOutcome::Written(output.clone()));
    assert_ne!(fs::read_to_string(&output)?, "old");
    Ok(())
}

/// A dry run reports changes and writes nothing
#[test]
fn test_controller_run_withDryRun_shouldNotWriteOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;

    let controller = Controller::new_for_test()?;
    let options = RunOptions {
        dry_run: true,
        ..RunOptions::default()
    };
    let result = controller.run(&input, &options)?;

    assert_eq!(result.outcome, FileOutcome::Previewed);
    assert_eq!(result.report.changed_count(), 3);
    assert!(!temp_dir.path().join("movie.fixed.srt").exists());
    Ok(())
}

/// The change log gets one timestamped line per changed cue
#[test]
fn test_controller_run_withChangeLog_shouldAppendChanges() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;
    let log_path = temp_dir.path().join("logs/changes.log");

    let controller = Controller::new_for_test()?;
    let options = RunOptions {
        dry_run: true,
        change_log: Some(log_path.clone()),
        ..RunOptions::default()
    };
    controller.run(&input, &options)?;

    let log = fs::read_to_string(&log_path)?;
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("#1 [balance_tags, merge_short_lines]"));
    assert!(lines[2].contains("dialogue_dashes"));
    Ok(())
}

/// Configured passes limit what the controller changes
#[test]
fn test_controller_withSelectedPasses_shouldRunOnlyThose() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;

    let mut config = Config::default();
    config.fixes.enabled_passes = vec![FixPass::BalanceTags];
    let controller = Controller::with_config(config)?;
    let result = controller.run(&input, &RunOptions::default())?;

    assert_eq!(result.report.changed_count(), 1);
    assert_eq!(
        result.report.changes[0].new_text,
        "<i>Hey!</i>\n<i>Boy!</i>"
    );
    Ok(())
}

/// Resource files are picked up from the configured directory
#[test]
fn test_controller_withResourcesDir_shouldApplyReplaceList() -> Result<()> {
    let resources_dir = common::create_temp_dir()?;
    common::create_english_resources(resources_dir.path())?;

    let mut config = Config::default();
    config.resources_dir = Some(resources_dir.path().to_path_buf());
    config.validate()?;
    let controller = Controller::with_config(config)?;
    assert!(controller.engine().catalog().contains("en"));

    let mut document = subfix::Document::from_texts(["The font is ita/ic!"]);
    let report = controller.fix_document(&mut document);
    assert_eq!(document.text(0), Some("The font is italic!"));
    assert_eq!(report.changes[0].passes, vec![FixPass::OcrReplaceList]);
    Ok(())
}

/// Folder mode fixes every subtitle, skips old outputs and survives bad files
#[test]
fn test_controller_run_folder_shouldSummarizeResults() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("season1");
    fs::create_dir_all(&nested)?;

    common::create_test_subtitle(temp_dir.path(), "a.srt")?;
    common::create_test_subtitle(&nested, "b.srt")?;
    common::create_test_file(temp_dir.path(), "broken.srt", "nothing useful here\n")?;
    common::create_test_file(temp_dir.path(), "notes.txt", "ignored")?;

    let controller = Controller::new_for_test()?;
    let summary = controller.run_folder(temp_dir.path(), &RunOptions::default())?;

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.cues_changed, 6);
    assert!(temp_dir.path().join("a.fixed.srt").exists());
    assert!(nested.join("b.fixed.srt").exists());

    // a second run must not treat a.fixed.srt as input; existing outputs are skipped
    let summary = controller.run_folder(temp_dir.path(), &RunOptions::default())?;
    assert_eq!(summary.processed, 0);
    assert_eq!(summary.skipped, 2);
    assert!(!temp_dir.path().join("a.fixed.fixed.srt").exists());
    Ok(())
}

#[test]
fn test_controller_run_folder_withoutSubtitles_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "notes.txt", "ignored")?;

    let controller = Controller::new_for_test()?;
    assert!(controller.run_folder(temp_dir.path(), &RunOptions::default()).is_err());
    Ok(())
}
