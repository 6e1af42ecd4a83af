/*!
 * Dictionary oracle.
 *
 * The OCR passes only ever ask one question of a dictionary: is this word
 * known? Backends implement [`WordOracle`]; [`WordList`] is the plain
 * in-memory one loaded from a word-per-line file.
 */

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::errors::{OracleError, ResourceError};

/// Spell-check lookup used to gate OCR corrections
pub trait WordOracle {
    /// Whether `word` is a known word. Lookups are case-insensitive.
    fn contains(&self, word: &str) -> Result<bool, OracleError>;
}

impl<F> WordOracle for F
where
    F: Fn(&str) -> Result<bool, OracleError>,
{
    fn contains(&self, word: &str) -> Result<bool, OracleError> {
        self(word)
    }
}

/// In-memory word set
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: HashSet<String>,
}

impl WordList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        for word in words {
            list.insert(word.as_ref());
        }
        list
    }

    /// Parse one word per line. Blank lines and `#` comments are ignored.
    pub fn from_text(text: &str) -> Self {
        Self::from_words(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    pub fn load(path: &Path) -> Result<Self, ResourceError> {
        let content = fs::read_to_string(path).map_err(|source| ResourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_text(&content))
    }

    pub fn insert(&mut self, word: &str) {
        let word = word.trim();
        if !word.is_empty() {
            self.words.insert(word.to_lowercase());
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl WordOracle for WordList {
    fn contains(&self, word: &str) -> Result<bool, OracleError> {
        Ok(self.words.contains(&word.to_lowercase()))
    }
}
