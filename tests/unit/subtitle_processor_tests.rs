/*!
 * Tests for SRT reading and writing
 */

use anyhow::Result;
use subfix::document::{Document, TimeCode};
use subfix::errors::SubtitleError;
use subfix::subtitle_processor::SubtitleCollection;

use crate::common;

#[test]
fn test_parse_srt_string_withBrokenCues_shouldKeepTextVerbatim() -> Result<()> {
    let document = SubtitleCollection::parse_srt_string(common::BROKEN_SRT)?;

    assert_eq!(document.len(), 3);
    assert_eq!(document.text(0), Some("<i>Hey!\n<i>Boy!"));
    assert_eq!(document.text(2), Some("- Mm-hmm."));

    let first = document.cue(0).unwrap();
    assert_eq!(first.start, TimeCode::from_milliseconds(1_000));
    assert_eq!(first.end, TimeCode::from_milliseconds(4_000));
    Ok(())
}

#[test]
fn test_parse_srt_string_withGarbage_shouldReturnNoEntries() {
    let result = SubtitleCollection::parse_srt_string("not a subtitle file\n");
    assert_eq!(result.unwrap_err(), SubtitleError::NoEntries);
}

#[test]
fn test_to_srt_string_shouldParseBackToSameDocument() -> Result<()> {
    let document = SubtitleCollection::parse_srt_string(common::BROKEN_SRT)?;
    let rendered = SubtitleCollection::to_srt_string(&document);
    let reparsed: Document = SubtitleCollection::parse_srt_string(&rendered)?;
    assert_eq!(reparsed, document);
    Ok(())
}

#[test]
fn test_load_and_write_to_srt_shouldCreateParentDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "movie.srt")?;

    let collection = SubtitleCollection::load(&input)?;
    assert_eq!(collection.source_file, input);

    let output = temp_dir.path().join("out/nested/movie.srt");
    collection.write_to_srt(&output)?;
    let reloaded = SubtitleCollection::load(&output)?;
    assert_eq!(reloaded.document, collection.document);

    let display = format!("{}", collection);
    assert!(display.contains("Cues: 3"));
    Ok(())
}

#[test]
fn test_load_withMissingFile_shouldFail() {
    assert!(SubtitleCollection::load("/definitely/not/here.srt").is_err());
}
