/*!
 * Missing period at the end of a cue.
 */

use crate::markup::{self, Glyph};

use super::leading_letter;

/// True when `text` opens a new sentence: its first letter is uppercase
/// and it does not start with an ellipsis.
fn starts_sentence(text: &str) -> bool {
    leading_letter(&markup::glyphs(text))
        .is_some_and(|found| found.letter.is_uppercase() && !found.continuation)
}

/// Append a period to a cue that ends mid-sentence when the next cue
/// starts a new sentence.
///
/// The period goes right after the last visible character, before any
/// closing tags. Cues already ending in punctuation are unchanged, and so
/// is the last cue of a document (`next` is `None`).
pub fn add_missing_period(text: &str, next: Option<&str>) -> String {
    if !next.is_some_and(starts_sentence) {
        return text.to_string();
    }

    let mut glyphs = markup::glyphs(text);
    let Some(last) = glyphs
        .iter()
        .rposition(|g| g.as_char().is_some_and(|c| !c.is_whitespace()))
    else {
        return text.to_string();
    };

    if !glyphs[last].as_char().is_some_and(char::is_alphanumeric) {
        return text.to_string();
    }

    glyphs.insert(last + 1, Glyph::Char('.'));
    markup::render_glyphs(&glyphs)
}
