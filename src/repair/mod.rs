/*!
 * Text repair passes for subtitle cues.
 *
 * Every pass is a pure, idempotent function from one cue's text (plus,
 * where noted, a neighbouring cue's text) to corrected text. Passes work
 * on the markup model rather than raw characters, so they never corrupt
 * tags.
 *
 * - `tags`: repairs unmatched, empty and misplaced emphasis tags
 * - `casing`: uppercases the first letter after a sentence boundary
 * - `spacing`: inserts missing spaces around tags
 * - `dialogue`: adds or removes speaker dashes
 * - `line_merge`: merges short multi-line cues
 * - `spanish`: inverted question and exclamation marks
 * - `ocr`: replace-list corrections and the uppercase-I fix
 * - `periods`: adds a period where the next cue starts a sentence
 * - `engine`: sequences passes over a document and reports changes
 */

pub mod casing;
pub mod dialogue;
pub mod engine;
pub mod line_merge;
pub mod ocr;
pub mod periods;
pub mod spacing;
pub mod spanish;
pub mod tags;

pub use engine::{CueChange, CueContext, EngineOptions, FixEngine, FixPass, FixReport, SkippedCue};

use crate::markup::{self, Glyph};

/// Characters accepted as a speaker dash
pub(crate) const DASH_CHARS: [char; 4] = ['-', '‐', '–', '—'];

pub(crate) fn is_dash(c: char) -> bool {
    DASH_CHARS.contains(&c)
}

/// Trailing characters ignored when looking for sentence-ending punctuation
const CLOSING_DECORATION: [char; 9] = ['"', '\'', ')', ']', '”', '’', '»', '♪', '♫'];

/// True if the visible text ends with `.`, `!`, `?` or an ellipsis.
pub(crate) fn ends_sentence(text: &str) -> bool {
    let visible = markup::visible_text(text);
    let trimmed =
        visible.trim_end_matches(|c: char| c.is_whitespace() || CLOSING_DECORATION.contains(&c));
    match trimmed.chars().last() {
        Some(last) => matches!(last, '.' | '!' | '?' | '…'),
        None => true,
    }
}

/// The first letter of a cue, found after skipping markup and symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LeadingLetter {
    /// Index into the glyph sequence
    pub index: usize,
    pub letter: char,
    /// The skipped prefix holds an ellipsis, so the cue continues a sentence
    pub continuation: bool,
}

/// Locate the first letter on the first display line.
///
/// Returns `None` when a digit or the end of the line comes first.
pub(crate) fn leading_letter(glyphs: &[Glyph]) -> Option<LeadingLetter> {
    let mut dots = 0;
    let mut ellipsis = false;

    for (index, glyph) in glyphs.iter().enumerate() {
        let Some(c) = glyph.as_char() else { continue };
        if glyph.is_line_break() || c.is_numeric() {
            return None;
        }
        if c.is_alphabetic() {
            return Some(LeadingLetter {
                index,
                letter: c,
                continuation: ellipsis || dots >= 2,
            });
        }
        match c {
            '.' => dots += 1,
            '…' => ellipsis = true,
            _ => {}
        }
    }

    None
}
