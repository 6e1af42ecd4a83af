/*!
 * Short line merger.
 */

use crate::document::LINE_BREAK;
use crate::markup::{self, EMPHASIS_TAGS};

use super::is_dash;

/// Default upper bound for the visible length of a merged line
pub const DEFAULT_MAX_MERGED_LENGTH: usize = 32;

/// Join a multi-line cue into one line when the result is short enough.
///
/// Dialogue cues, cues with an empty line, and merges that would leave an
/// emphasis tag unbalanced are returned unchanged.
pub fn merge_short_lines(text: &str, max_length: usize) -> String {
    let lines: Vec<&str> = text.split(LINE_BREAK).collect();
    if lines.len() < 2 {
        return text.to_string();
    }
    if lines
        .iter()
        .any(|line| markup::visible_text(line).trim().is_empty())
    {
        return text.to_string();
    }
    if lines.iter().any(|line| starts_with_dash(line)) {
        return text.to_string();
    }

    let merged = lines
        .iter()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join(" ");

    if markup::visible_text(&merged).chars().count() > max_length {
        return text.to_string();
    }

    let spans = markup::parse(&merged);
    if EMPHASIS_TAGS
        .iter()
        .any(|tag| !markup::is_balanced(&spans, tag))
    {
        return text.to_string();
    }

    merged
}

fn starts_with_dash(line: &str) -> bool {
    markup::visible_text(line)
        .trim_start()
        .starts_with(is_dash)
}
