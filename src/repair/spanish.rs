/*!
 * Spanish inverted punctuation.
 *
 * Every question or exclamation in Spanish opens with the inverted mark:
 * `¿Cómo estás?`, `¡Hola!`. Each display line is split into sentence runs
 * and the leading marks of every run are made to mirror its trailing ones.
 */

use crate::document::LINE_BREAK;
use crate::markup::{self, Glyph};

use super::is_dash;

const TERMINALS: [char; 4] = ['.', '?', '!', '…'];

/// Closing decoration allowed after the terminal cluster
const RUN_SUFFIX: [char; 7] = ['"', '\'', '»', '”', '’', ')', ']'];

/// Skipped when looking for the first content character of a run
const RUN_PREFIX: [char; 12] = ['"', '\'', '«', '“', '‘', '(', '[', '♪', '♫', '.', '…', '*'];

fn is_inverted(c: char) -> bool {
    matches!(c, '¿' | '¡')
}

fn invert(c: char) -> char {
    match c {
        '?' => '¿',
        '!' => '¡',
        other => other,
    }
}

fn is_run_prefix(c: char) -> bool {
    c.is_whitespace() || is_dash(c) || RUN_PREFIX.contains(&c)
}

/// Insert or repair inverted question and exclamation marks.
pub fn fix_inverted_marks(text: &str) -> String {
    if !text.contains(['?', '!']) {
        return text.to_string();
    }

    text.split(LINE_BREAK)
        .map(fix_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn fix_line(line: &str) -> String {
    if !line.contains(['?', '!']) {
        return line.to_string();
    }

    let mut glyphs = markup::glyphs(line);
    let runs = sentence_runs(&glyphs);
    // right to left, so earlier runs keep their positions
    for run in runs.iter().rev() {
        fix_run(&mut glyphs, run);
    }
    markup::render_glyphs(&glyphs)
}

/// Glyph positions of the visible characters of each sentence run.
fn sentence_runs(glyphs: &[Glyph]) -> Vec<Vec<usize>> {
    let visible: Vec<(usize, char)> = glyphs
        .iter()
        .enumerate()
        .filter_map(|(i, g)| g.as_char().map(|c| (i, c)))
        .collect();

    let mut runs = Vec::new();
    let mut current = Vec::new();

    for (k, &(position, c)) in visible.iter().enumerate() {
        current.push(position);
        if !TERMINALS.contains(&c) {
            continue;
        }
        let next = visible.get(k + 1).map(|&(_, n)| n);
        let cluster_ends = !next.is_some_and(|n| TERMINALS.contains(&n));
        if cluster_ends && next.is_none_or(char::is_whitespace) {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    runs
}

fn fix_run(glyphs: &mut Vec<Glyph>, run: &[usize]) {
    let chars: Vec<char> = run
        .iter()
        .filter_map(|&position| glyphs[position].as_char())
        .collect();
    if chars.len() != run.len() {
        return;
    }

    let mut trailing_end = chars.len();
    while trailing_end > 0 && RUN_SUFFIX.contains(&chars[trailing_end - 1]) {
        trailing_end -= 1;
    }
    let mut trailing_start = trailing_end;
    while trailing_start > 0 && TERMINALS.contains(&chars[trailing_start - 1]) {
        trailing_start -= 1;
    }
    let trailing = &chars[trailing_start..trailing_end];
    if trailing.is_empty() || !trailing.iter().all(|c| matches!(c, '?' | '!')) {
        return;
    }

    let (leading_start, leading_end) =
        match (0..trailing_start).rev().find(|&k| is_inverted(chars[k])) {
            Some(last) => {
                let mut start = last;
                while start > 0 && is_inverted(chars[start - 1]) {
                    start -= 1;
                }
                (start, last + 1)
            }
            None => match (0..trailing_start).find(|&k| !is_run_prefix(chars[k])) {
                Some(first) => (first, first),
                None => return,
            },
        };

    if !chars[leading_end..trailing_start]
        .iter()
        .any(|c| c.is_alphanumeric())
    {
        return;
    }

    let leading = &chars[leading_start..leading_end];
    let mut wanted_trailing = trailing.to_vec();
    for kind in ['?', '!'] {
        if leading.contains(&invert(kind)) && !wanted_trailing.contains(&kind) {
            // innermost, next to the text
            wanted_trailing.insert(0, kind);
        }
    }
    let wanted_leading: Vec<char> = wanted_trailing.iter().rev().map(|&c| invert(c)).collect();

    if wanted_trailing == trailing && wanted_leading == leading {
        return;
    }

    // existing trailing marks keep their place; added ones go in front of them
    let added = wanted_trailing.len() - trailing.len();
    if added > 0 {
        replace_glyphs(glyphs, &[], run[trailing_start], &wanted_trailing[..added]);
    }
    if wanted_leading != leading {
        replace_glyphs(
            glyphs,
            &run[leading_start..leading_end],
            run[leading_start],
            &wanted_leading,
        );
    }
}

/// Remove the glyphs at `positions` and insert `chars` at `anchor`.
///
/// `anchor` is not after any removed position, so it stays valid.
fn replace_glyphs(glyphs: &mut Vec<Glyph>, positions: &[usize], anchor: usize, chars: &[char]) {
    for &position in positions.iter().rev() {
        glyphs.remove(position);
    }
    for (offset, &c) in chars.iter().enumerate() {
        glyphs.insert(anchor + offset, Glyph::Char(c));
    }
}
