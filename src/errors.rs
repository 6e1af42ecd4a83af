/*!
 * Error types for the subfix application.
 *
 * The repair passes themselves are total and never fail; the only fallible
 * edges are the dictionary oracle, resource loading and subtitle I/O.
 * These are modelled with the thiserror crate, while application-level code
 * uses anyhow on top of them.
 */

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by a dictionary oracle while checking a word
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    /// The dictionary backend could not be reached or was not loaded
    #[error("Dictionary unavailable: {0}")]
    Unavailable(String),

    /// A single lookup failed
    #[error("Dictionary lookup failed for '{word}': {message}")]
    Lookup {
        /// Word that was being checked
        word: String,
        /// Backend error message
        message: String,
    },
}

/// Errors that can occur while loading per-language resources
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The resource file could not be read
    #[error("Failed to read resource {path:?}: {source}")]
    Io {
        /// Path of the resource file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The resource file exists but has an invalid format
    #[error("Invalid resource {path:?}: {message}")]
    Parse {
        /// Path of the resource file
        path: PathBuf,
        /// Parser error message
        message: String,
    },

    /// The language code could not be normalized
    #[error("Unknown language code: {0}")]
    UnknownLanguage(String),
}

/// Errors that can occur during subtitle processing
#[derive(Error, Debug, PartialEq)]
pub enum SubtitleError {
    /// A timestamp could not be parsed
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A cue ends before it starts
    #[error("Invalid time range for cue {index}: end {end} <= start {start}")]
    InvalidTimeRange {
        /// 1-based cue number
        index: usize,
        /// Formatted start time
        start: String,
        /// Formatted end time
        end: String,
    },

    /// The input did not contain a single usable cue
    #[error("No valid subtitle entries were found")]
    NoEntries,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from resource loading
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from the dictionary oracle
    #[error("Dictionary error: {0}")]
    Oracle(#[from] OracleError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
