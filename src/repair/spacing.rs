/*!
 * Spaces around markup.
 */

use crate::markup::{self, Span};

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

/// Insert a single space where a tag's outer edge touches a word.
///
/// `The<i>Bombshell</i>will` becomes `The <i>Bombshell</i> will`. Existing
/// whitespace is left as it is and punctuation next to a tag is accepted.
pub fn fix_missing_spaces(text: &str) -> String {
    if !text.contains('<') {
        return text.to_string();
    }

    let mut spans = markup::parse(text);
    let mut changed = false;

    for i in 0..spans.len() {
        let opens = matches!(spans[i], Span::Open { .. });
        let closes = matches!(spans[i], Span::Close { .. });

        if opens && i > 0 {
            if let Span::Text(before) = &mut spans[i - 1] {
                if before.chars().last().is_some_and(is_word_char) {
                    before.push(' ');
                    changed = true;
                }
            }
        }

        if closes && i + 1 < spans.len() {
            if let Span::Text(after) = &mut spans[i + 1] {
                if after.chars().next().is_some_and(is_word_char) {
                    after.insert(0, ' ');
                    changed = true;
                }
            }
        }
    }

    if changed {
        markup::render(&spans)
    } else {
        text.to_string()
    }
}
