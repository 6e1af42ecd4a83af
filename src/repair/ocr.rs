/*!
 * OCR artifact correction.
 *
 * Two passes live here: the replace-list corrector, which applies a
 * language's literal rules gated by the dictionary, and the uppercase-I
 * fixer for the common `I`/`l` confusion inside lowercase words.
 *
 * Both only ever touch plain spans; markup is never rewritten.
 */

use crate::errors::OracleError;
use crate::markup::{self, Span};
use crate::resources::{ReplaceList, ReplaceRule, WordOracle};

/// Apply the replace list to a cue's text.
///
/// Rules run in list order, each in a single left-to-right scan. A
/// conditional rule needs an oracle; without one only unconditional rules
/// apply.
pub fn fix_with_replace_list(
    text: &str,
    list: &ReplaceList,
    oracle: Option<&dyn WordOracle>,
) -> Result<String, OracleError> {
    let mut spans = markup::parse(text);
    let mut changed = false;

    for rule in list.rules() {
        if rule.is_noop() || (!rule.unconditional && oracle.is_none()) {
            continue;
        }
        for span in spans.iter_mut() {
            let Span::Text(content) = span else { continue };
            if !content.contains(&rule.find) {
                continue;
            }
            let fixed = apply_rule(content, rule, oracle)?;
            if fixed != *content {
                *content = fixed;
                changed = true;
            }
        }
    }

    Ok(if changed {
        markup::render(&spans)
    } else {
        text.to_string()
    })
}

fn apply_rule(
    content: &str,
    rule: &ReplaceRule,
    oracle: Option<&dyn WordOracle>,
) -> Result<String, OracleError> {
    let mut text = content.to_string();
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find(&rule.find) {
        let start = cursor + offset;
        let end = start + rule.find.len();

        let accepted = match oracle {
            _ if rule.unconditional => true,
            Some(oracle) => corrects_word(&text, start, end, &rule.replace, oracle)?,
            None => false,
        };

        if accepted {
            text.replace_range(start..end, &rule.replace);
            cursor = start + rule.replace.len();
        } else {
            cursor = end;
        }
    }

    Ok(text)
}

fn trim_word(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_alphanumeric())
}

/// Whether replacing `start..end` turns an unknown word into a known one.
fn corrects_word(
    text: &str,
    start: usize,
    end: usize,
    replacement: &str,
    oracle: &dyn WordOracle,
) -> Result<bool, OracleError> {
    let word_start = text[..start]
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(i, c)| i + c.len_utf8());
    let word_end = text[end..]
        .find(char::is_whitespace)
        .map_or(text.len(), |i| end + i);

    let original = trim_word(&text[word_start..word_end]);
    let candidate_full = format!(
        "{}{}{}",
        &text[word_start..start],
        replacement,
        &text[end..word_end]
    );
    let candidate = trim_word(&candidate_full);

    if original.is_empty() || candidate.is_empty() || original == candidate {
        return Ok(false);
    }
    if oracle.contains(original)? {
        return Ok(false);
    }
    oracle.contains(candidate)
}

/// Name prefixes that legitimately carry a capital I (`McIntyre`, `MacIver`)
const NAME_PREFIXES: [&str; 2] = ["Mc", "Mac"];

/// Replace an OCR-confused `I` inside a lowercase word with `l`.
///
/// `troubIe` becomes `trouble`. A word the oracle knows as written is left
/// alone unless the corrected word is known as well.
pub fn fix_uppercase_i_inside_words(
    text: &str,
    oracle: Option<&dyn WordOracle>,
) -> Result<String, OracleError> {
    if !text.contains('I') {
        return Ok(text.to_string());
    }

    let mut spans = markup::parse(text);
    let mut changed = false;

    for span in spans.iter_mut() {
        let Span::Text(content) = span else { continue };
        if !content.contains('I') {
            continue;
        }
        let mut fixed = String::with_capacity(content.len());
        for piece in content.split_inclusive(char::is_whitespace) {
            let word = piece.trim_end_matches(char::is_whitespace);
            fixed.push_str(&fix_word(word, oracle)?);
            fixed.push_str(&piece[word.len()..]);
        }
        if fixed != *content {
            *content = fixed;
            changed = true;
        }
    }

    Ok(if changed {
        markup::render(&spans)
    } else {
        text.to_string()
    })
}

fn fix_word(word: &str, oracle: Option<&dyn WordOracle>) -> Result<String, OracleError> {
    let chars: Vec<char> = word.chars().collect();
    let mut fixed = chars.clone();
    let mut changed = false;

    for k in 1..chars.len() {
        if chars[k] != 'I' || !chars[k - 1].is_lowercase() {
            continue;
        }
        let ends_word = match chars.get(k + 1) {
            None => true,
            Some(&next) => next.is_lowercase() || (!next.is_alphanumeric() && next != '\''),
        };
        if !ends_word {
            continue;
        }
        let prefix: String = chars[..k].iter().collect();
        if NAME_PREFIXES.contains(&prefix.trim_start_matches(|c: char| !c.is_alphanumeric())) {
            continue;
        }
        fixed[k] = 'l';
        changed = true;
    }

    if !changed {
        return Ok(word.to_string());
    }
    let fixed: String = fixed.into_iter().collect();
    if let Some(oracle) = oracle {
        // a listed garble (a name, say) stays only while its correction is no word
        if oracle.contains(trim_word(word))? && !oracle.contains(trim_word(&fixed))? {
            return Ok(word.to_string());
        }
    }

    Ok(fixed)
}
