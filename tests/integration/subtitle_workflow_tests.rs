/*!
 * Integration tests for the load, fix and write workflow
 */

use anyhow::Result;

use subfix::document::Document;
use subfix::errors::OracleError;
use subfix::file_utils::FileManager;
use subfix::repair::{EngineOptions, FixEngine, FixPass};
use subfix::resources::{LanguageResources, ReplaceList, ReplaceRule, ResourceCatalog};
use subfix::subtitle_processor::SubtitleCollection;

use crate::common;

/// Load a broken file, fix it with every pass and write it back out
#[test]
fn test_subtitle_workflow_withAllPasses_shouldRepairEveryCue() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;

    let mut collection = SubtitleCollection::load(&input)?;
    let engine = FixEngine::default();
    let report = engine.apply(&mut collection.document, &FixPass::ALL, "en");

    assert_eq!(collection.document.text(0), Some("<i>Hey!</i> <i>Boy!</i>"));
    assert_eq!(collection.document.text(1), Some("- Hi Joe!\n- Hi Pete!"));
    assert_eq!(collection.document.text(2), Some("Mm-hmm."));
    assert_eq!(report.changed_count(), 3);
    assert!(report.skipped.is_empty());

    let output = FileManager::generate_output_path(&input, None, "fixed");
    collection.write_to_srt(&output)?;

    let written = FileManager::read_to_string(&output)?;
    assert!(written.starts_with("1\n00:00:01,000 --> 00:00:04,000\n<i>Hey!</i> <i>Boy!</i>\n"));
    assert!(written.contains("3\n00:00:10,000 --> 00:00:14,000\nMm-hmm.\n"));
    Ok(())
}

/// A second run over fixed output must not find anything to change
#[test]
fn test_subtitle_workflow_runTwice_shouldBeIdempotent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_english_resources(temp_dir.path())?;

    let mut catalog = ResourceCatalog::new();
    catalog.load_language(temp_dir.path(), "eng")?;
    let engine = FixEngine::new(EngineOptions::default()).with_catalog(catalog);

    let mut document = SubtitleCollection::parse_srt_string(common::BROKEN_SRT)?;
    document.push(subfix::Cue::from_milliseconds(15_000, 16_000, "The font is ita/ic"));
    document.push(subfix::Cue::from_milliseconds(17_000, 18_000, "The<i>end</i>"));

    let first = engine.apply(&mut document, &FixPass::ALL, "en");
    assert!(!first.is_clean());
    assert_eq!(document.text(3), Some("The font is italic."));

    let fixed = document.clone();
    let second = engine.apply(&mut document, &FixPass::ALL, "en");
    assert!(second.is_clean(), "second run changed: {:?}", second.changes);
    assert_eq!(document, fixed);
    Ok(())
}

/// Resources loaded from disk drive the OCR passes; unconditional rules apply too
#[test]
fn test_subtitle_workflow_withResourceDir_shouldApplyOcrRules() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_english_resources(temp_dir.path())?;

    let mut catalog = ResourceCatalog::new();
    catalog.load_language(temp_dir.path(), "en")?;
    let engine = FixEngine::default().with_catalog(catalog);

    let mut document = Document::from_texts(["|t's in ita/ic!", "(laughing/clapping)"]);
    let report = engine.apply(&mut document, &[FixPass::OcrReplaceList], "eng");

    assert_eq!(document.text(0), Some("It's in italic!"));
    assert_eq!(document.text(1), Some("(laughing/clapping)"));
    assert_eq!(report.pass_counts().get(&FixPass::OcrReplaceList), Some(&1));
    Ok(())
}

/// Spanish marks only run for Spanish subtitles
#[test]
fn test_subtitle_workflow_withSpanish_shouldInsertInvertedMarks() {
    let engine = FixEngine::default();
    let mut document = Document::from_texts(["Cómo estás?", "¡Cómo estás?"]);

    let report = engine.apply(&mut document, &[FixPass::SpanishMarks], "spa");

    assert_eq!(document.text(0), Some("¿Cómo estás?"));
    assert_eq!(document.text(1), Some("¿¡Cómo estás!?"));
    assert_eq!(report.changed_count(), 2);
}

/// An oracle that fails skips only the affected cue
#[test]
fn test_subtitle_workflow_withFailingOracle_shouldReportSkippedCue() -> Result<()> {
    common::init_logging();
    let failing = |word: &str| -> Result<bool, OracleError> {
        Err(OracleError::Lookup {
            word: word.to_string(),
            message: "backend down".to_string(),
        })
    };
    let resources = LanguageResources::new("en")
        .with_replace_list(ReplaceList::new("eng", vec![ReplaceRule::new("/", "l")]))
        .with_oracle(failing);
    let engine = FixEngine::default().with_resources(resources)?;

    let mut document = Document::from_texts(["Ita/ic", "hello there"]);
    let report = engine.apply(
        &mut document,
        &[FixPass::Capitalize, FixPass::OcrReplaceList],
        "en",
    );

    assert_eq!(document.text(0), Some("Ita/ic"));
    // previous cue does not end a sentence
    assert_eq!(document.text(1), Some("hello there"));
    assert_eq!(report.cues_processed, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].pass, FixPass::OcrReplaceList);
    assert!(report.skipped[0].reason.contains("backend down"));
    Ok(())
}
