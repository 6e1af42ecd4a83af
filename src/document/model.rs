/*!
 * Core document model types for subtitle repair.
 *
 * A document is an ordered list of cues. Order is display order and the
 * repair passes rely on it (capitalization looks at the previous cue,
 * the missing-period fix at the next one).
 */

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SubtitleError;

/// Separator between display lines inside a cue's text
pub const LINE_BREAK: char = '\n';

/// A point in time inside a subtitle track, millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct TimeCode {
    total_ms: u64,
}

impl TimeCode {
    /// Create a time code from a millisecond offset.
    pub fn from_milliseconds(total_ms: u64) -> Self {
        Self { total_ms }
    }

    /// Create a time code from its components.
    pub fn from_hms(hours: u64, minutes: u64, seconds: u64, millis: u64) -> Self {
        Self {
            total_ms: hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis,
        }
    }

    pub fn total_milliseconds(&self) -> u64 {
        self.total_ms
    }

    pub fn hours(&self) -> u64 {
        self.total_ms / 3_600_000
    }

    pub fn minutes(&self) -> u64 {
        (self.total_ms % 3_600_000) / 60_000
    }

    pub fn seconds(&self) -> u64 {
        (self.total_ms % 60_000) / 1_000
    }

    pub fn milliseconds(&self) -> u64 {
        self.total_ms % 1_000
    }

    /// Parse an SRT timestamp (`HH:MM:SS,mmm`, `.` also accepted as separator).
    pub fn parse_srt(timestamp: &str) -> Result<Self, SubtitleError> {
        let invalid = || SubtitleError::InvalidTimestamp(timestamp.to_string());

        let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();
        if parts.len() != 4 {
            return Err(invalid());
        }

        let mut values = [0u64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| invalid())?;
        }
        let [hours, minutes, seconds, millis] = values;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(invalid());
        }

        Ok(Self::from_hms(hours, minutes, seconds, millis))
    }

    /// Format as SRT timestamp (`HH:MM:SS,mmm`).
    pub fn format_srt(&self) -> String {
        format!(
            "{:02}:{:02}:{:02},{:03}",
            self.hours(),
            self.minutes(),
            self.seconds(),
            self.milliseconds()
        )
    }
}

impl fmt::Display for TimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_srt())
    }
}

impl FromStr for TimeCode {
    type Err = SubtitleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_srt(s)
    }
}

/// One timed subtitle entry, possibly spanning multiple display lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    /// Start of display
    pub start: TimeCode,

    /// End of display
    pub end: TimeCode,

    /// Raw text, display lines separated by `\n`
    text: String,
}

impl Cue {
    /// Create a cue. Windows line endings are normalized to `\n`.
    pub fn new(start: TimeCode, end: TimeCode, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: normalize_line_breaks(text.into()),
        }
    }

    /// Convenience constructor used by tests and adapters.
    pub fn from_milliseconds(start_ms: u64, end_ms: u64, text: impl Into<String>) -> Self {
        Self::new(
            TimeCode::from_milliseconds(start_ms),
            TimeCode::from_milliseconds(end_ms),
            text,
        )
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the cue's text. Timing is never touched.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = normalize_line_breaks(text.into());
    }

    /// Display lines of the cue.
    pub fn lines(&self) -> Vec<&str> {
        self.text.split(LINE_BREAK).collect()
    }

    pub fn line_count(&self) -> usize {
        self.text.split(LINE_BREAK).count()
    }

    /// Duration in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.end
            .total_milliseconds()
            .saturating_sub(self.start.total_milliseconds())
    }
}

fn normalize_line_breaks(text: String) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text
    }
}

/// Ordered sequence of cues.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// All cues in display order
    pub cues: Vec<Cue>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cues(cues: Vec<Cue>) -> Self {
        Self { cues }
    }

    /// Build a document from plain texts, one second per cue.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cues = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let start = i as u64 * 1_000;
                Cue::from_milliseconds(start, start + 900, text)
            })
            .collect();
        Self { cues }
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn cue(&self, index: usize) -> Option<&Cue> {
        self.cues.get(index)
    }

    /// Text of the cue at `index`, if any.
    pub fn text(&self, index: usize) -> Option<&str> {
        self.cues.get(index).map(Cue::text)
    }

    pub fn push(&mut self, cue: Cue) {
        self.cues.push(cue);
    }
}
