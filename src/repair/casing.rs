/*!
 * First-letter capitalization.
 */

use crate::markup::{self, Glyph};

use super::{ends_sentence, leading_letter};

/// Uppercase the first letter of a cue that starts a new sentence.
///
/// `previous` is the text of the previous cue, `None` for the first cue.
/// The cue starts a sentence when there is no previous cue or the previous
/// one ends with terminal punctuation. Cues opening with an ellipsis
/// continue a sentence and are left alone.
pub fn capitalize_first_letter(text: &str, previous: Option<&str>) -> String {
    if previous.is_some_and(|prev| !ends_sentence(prev)) {
        return text.to_string();
    }

    let mut glyphs = markup::glyphs(text);
    let Some(found) = leading_letter(&glyphs) else {
        return text.to_string();
    };
    if found.continuation || !found.letter.is_lowercase() {
        return text.to_string();
    }

    let mut upper = found.letter.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(letter), None) => {
            glyphs[found.index] = Glyph::Char(letter);
            markup::render_glyphs(&glyphs)
        }
        // multi-character uppercase forms such as `ß` are skipped
        _ => text.to_string(),
    }
}
