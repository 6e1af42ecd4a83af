/*!
 * Speaker dash normalization.
 *
 * A two-line cue where only one line carries a speaker dash gets the dash
 * on the other line too. A single-line cue loses its dash, since one line
 * can only hold one speaker.
 */

use crate::markup::{self, Span};

use super::is_dash;

/// Dash-space marker found at the start of a line's content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Marker {
    /// Index of the first plain span
    span: usize,
    dash: char,
}

impl Marker {
    fn text(&self) -> String {
        format!("{} ", self.dash)
    }
}

fn leading_marker(line: &[Span]) -> Option<Marker> {
    let span = markup::first_text_index(line)?;
    let text = line[span].as_text()?.trim_start();
    let mut chars = text.chars();
    let dash = chars.next().filter(|c| is_dash(*c))?;
    if !chars.as_str().starts_with(' ') {
        return None;
    }
    Some(Marker { span, dash })
}

fn starts_with_any_dash(line: &[Span]) -> bool {
    markup::first_text_index(line)
        .and_then(|i| line[i].as_text())
        .is_some_and(|text| text.trim_start().starts_with(is_dash))
}

/// Add or remove leading speaker dashes.
pub fn normalize_dialogue_dashes(text: &str) -> String {
    let mut lines = markup::lines(text);
    let changed = match lines.len() {
        1 => remove_markers(&mut lines[0]),
        2 => add_missing_marker(&mut lines),
        _ => false,
    };

    if changed {
        markup::join_lines(&lines)
    } else {
        text.to_string()
    }
}

fn add_missing_marker(lines: &mut [Vec<Span>]) -> bool {
    let first = leading_marker(&lines[0]);
    let second = leading_marker(&lines[1]);

    let (marker, target) = match (first, second) {
        (Some(marker), None) => (marker, 1),
        (None, Some(marker)) => (marker, 0),
        _ => return false,
    };

    let line = &mut lines[target];
    if starts_with_any_dash(line) {
        return false;
    }
    let Some(index) = markup::first_text_index(line) else {
        return false;
    };
    let Some(content) = line[index].as_text() else {
        return false;
    };
    if content.trim().is_empty() {
        return false;
    }

    line[index] = Span::Text(format!("{}{}", marker.text(), content.trim_start()));
    true
}

fn remove_markers(line: &mut Vec<Span>) -> bool {
    let mut changed = false;

    while let Some(marker) = leading_marker(line) {
        let Some(content) = line[marker.span].as_text() else {
            break;
        };
        let rest = content
            .trim_start()
            .trim_start_matches(marker.dash)
            .trim_start()
            .to_string();

        // never strip a line down to nothing
        let remaining_visible = !rest.is_empty()
            || line[marker.span + 1..]
                .iter()
                .filter_map(Span::as_text)
                .any(|t| !t.trim().is_empty());
        if !remaining_visible {
            break;
        }

        if rest.is_empty() {
            line.remove(marker.span);
            drop_emptied_pairs(line, marker.span);
        } else {
            line[marker.span] = Span::Text(rest);
        }
        changed = true;
    }

    changed
}

/// Remove tag pairs left empty around `at` after the marker was taken out.
fn drop_emptied_pairs(line: &mut Vec<Span>, mut at: usize) {
    while at > 0 && at < line.len() {
        let same_tag = matches!(
            (&line[at - 1], &line[at]),
            (Span::Open { name: open, .. }, Span::Close { name: close, .. }) if open == close
        );
        if !same_tag {
            break;
        }
        line.drain(at - 1..=at);
        at -= 1;
    }
}
