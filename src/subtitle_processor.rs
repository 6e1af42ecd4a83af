use std::fmt;
use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::{Cue, Document, TimeCode};
use crate::errors::SubtitleError;

// @module: SRT reading and writing for the fix workflow

// @const: SRT timestamp line, `,` or `.` before the milliseconds
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2}:\d{2}:\d{2}[,.]\d{3})\s*-->\s*(\d{1,2}:\d{2}:\d{2}[,.]\d{3})")
        .expect("Invalid timestamp regex")
});

/// A subtitle file loaded into a document
#[derive(Debug, Clone)]
pub struct SubtitleCollection {
    /// File the cues were read from
    pub source_file: PathBuf,

    pub document: Document,
}

impl SubtitleCollection {
    pub fn new(source_file: PathBuf, document: Document) -> Self {
        Self {
            source_file,
            document,
        }
    }

    /// Read and parse an SRT file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read subtitle file: {}", path.display()))?;
        let document = Self::parse_srt_string(&content)
            .with_context(|| format!("Failed to parse subtitle file: {}", path.display()))?;
        debug!("Loaded {} cues from {}", document.len(), path.display());
        Ok(Self::new(path.to_path_buf(), document))
    }

    /// Write the document to an SRT file, creating parent directories.
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;
        file.write_all(Self::to_srt_string(&self.document).as_bytes())
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))?;

        Ok(())
    }

    /// Parse SRT content into a document.
    ///
    /// Cue text is kept as written apart from line endings. Malformed
    /// entries are logged and skipped; cue order is the file order.
    pub fn parse_srt_string(content: &str) -> Result<Document, SubtitleError> {
        let content = content.trim_start_matches('\u{feff}');
        let mut document = Document::new();

        let mut current_seq_num: Option<usize> = None;
        let mut current_times: Option<(TimeCode, TimeCode)> = None;
        let mut current_text: Vec<&str> = Vec::new();

        let mut finish_entry = |seq_num: usize, times: (TimeCode, TimeCode), text: &[&str]| {
            if text.is_empty() {
                warn!("Skipping empty subtitle entry {}", seq_num);
                return;
            }
            match validate_time_range(seq_num, times.0, times.1) {
                Ok(()) => document.push(Cue::new(times.0, times.1, text.join("\n"))),
                Err(e) => warn!("Skipping invalid subtitle entry {}: {}", seq_num, e),
            }
        };

        for (line_number, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                if let (Some(seq_num), Some(times)) = (current_seq_num, current_times) {
                    if !current_text.is_empty() {
                        finish_entry(seq_num, times, &current_text);
                        current_seq_num = None;
                        current_times = None;
                        current_text.clear();
                    }
                }
                continue;
            }

            if current_seq_num.is_none() && current_text.is_empty() {
                if let Ok(num) = trimmed.parse::<usize>() {
                    current_seq_num = Some(num);
                    continue;
                }
            }

            if current_seq_num.is_some() && current_times.is_none() {
                if let Some(caps) = TIMESTAMP_REGEX.captures(trimmed) {
                    match (TimeCode::parse_srt(&caps[1]), TimeCode::parse_srt(&caps[2])) {
                        (Ok(start), Ok(end)) => {
                            current_times = Some((start, end));
                            continue;
                        }
                        _ => warn!("Invalid timestamp at line {}: {}", line_number + 1, trimmed),
                    }
                }
            }

            if current_seq_num.is_some() && current_times.is_some() {
                current_text.push(line.trim_end());
            } else {
                warn!(
                    "Unexpected text at line {} before sequence number or timestamp: {}",
                    line_number + 1,
                    trimmed
                );
            }
        }

        if let (Some(seq_num), Some(times)) = (current_seq_num, current_times) {
            finish_entry(seq_num, times, &current_text);
        }

        if document.is_empty() {
            return Err(SubtitleError::NoEntries);
        }

        let overlaps = document
            .cues
            .windows(2)
            .filter(|pair| pair[0].end > pair[1].start)
            .count();
        if overlaps > 0 {
            warn!("Found {} overlapping subtitle entries", overlaps);
        }

        Ok(document)
    }

    /// Render a document as SRT, numbering cues from 1.
    pub fn to_srt_string(document: &Document) -> String {
        let mut out = String::new();
        for (i, cue) in document.cues.iter().enumerate() {
            out.push_str(&format!(
                "{}\n{} --> {}\n{}\n\n",
                i + 1,
                cue.start.format_srt(),
                cue.end.format_srt(),
                cue.text()
            ));
        }
        out
    }
}

fn validate_time_range(seq_num: usize, start: TimeCode, end: TimeCode) -> Result<(), SubtitleError> {
    if end <= start {
        return Err(SubtitleError::InvalidTimeRange {
            index: seq_num,
            start: start.format_srt(),
            end: end.format_srt(),
        });
    }
    Ok(())
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Cues: {}", self.document.len())?;
        Ok(())
    }
}
