/*!
 * Per-language resources for the OCR passes.
 *
 * - `replace_list`: ordered literal find/replace rules
 * - `dictionary`: the word oracle trait and an in-memory word list
 *
 * Resources are loaded once before a run and are read-only afterwards.
 * Files live in a resource directory and are named by ISO 639-2/T code:
 * `eng_replace_list.json`, `eng_words.txt`.
 */

pub mod dictionary;
pub mod replace_list;

pub use dictionary::{WordList, WordOracle};
pub use replace_list::{ReplaceList, ReplaceRule};

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::errors::ResourceError;
use crate::language_utils;

/// Resources for one language
pub struct LanguageResources {
    /// ISO 639-2/T code
    pub language: String,

    pub replace_list: Option<ReplaceList>,

    oracle: Option<Box<dyn WordOracle>>,
}

impl LanguageResources {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            replace_list: None,
            oracle: None,
        }
    }

    pub fn with_replace_list(mut self, list: ReplaceList) -> Self {
        self.replace_list = Some(list);
        self
    }

    pub fn with_oracle(mut self, oracle: impl WordOracle + 'static) -> Self {
        self.oracle = Some(Box::new(oracle));
        self
    }

    pub fn oracle(&self) -> Option<&dyn WordOracle> {
        self.oracle.as_deref()
    }

    pub fn has_oracle(&self) -> bool {
        self.oracle.is_some()
    }
}

impl fmt::Debug for LanguageResources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageResources")
            .field("language", &self.language)
            .field("rules", &self.replace_list.as_ref().map_or(0, ReplaceList::len))
            .field("oracle", &self.oracle.is_some())
            .finish()
    }
}

/// Path of the replace list for `language` inside `dir`.
pub fn replace_list_path(dir: &Path, language: &str) -> PathBuf {
    dir.join(format!("{}_replace_list.json", language))
}

/// Path of the word list for `language` inside `dir`.
pub fn word_list_path(dir: &Path, language: &str) -> PathBuf {
    dir.join(format!("{}_words.txt", language))
}

fn resource_key(code: &str) -> Result<String, ResourceError> {
    language_utils::normalize_to_part2t(code)
        .map_err(|_| ResourceError::UnknownLanguage(code.to_string()))
}

/// Language resources keyed by ISO 639-2/T code
#[derive(Debug, Default)]
pub struct ResourceCatalog {
    languages: HashMap<String, LanguageResources>,
}

impl ResourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register resources, replacing any previous entry for the language.
    pub fn insert(&mut self, mut resources: LanguageResources) -> Result<(), ResourceError> {
        let key = resource_key(&resources.language)?;
        resources.language = key.clone();
        self.languages.insert(key, resources);
        Ok(())
    }

    /// Resources for any form of the language code
    pub fn get(&self, code: &str) -> Option<&LanguageResources> {
        let key = resource_key(code).ok()?;
        self.languages.get(&key)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Load whatever resource files exist for `code` from `dir`.
    ///
    /// A missing file is not an error; the pass that needs it becomes a
    /// no-op. An unreadable or malformed file is.
    pub fn load_language(&mut self, dir: &Path, code: &str) -> Result<&LanguageResources, ResourceError> {
        let key = resource_key(code)?;
        let mut resources = LanguageResources::new(key.clone());

        let list_path = replace_list_path(dir, &key);
        if list_path.is_file() {
            let list = ReplaceList::load(&list_path)?;
            debug!("Loaded {} replace rules from {:?}", list.len(), list_path);
            resources.replace_list = Some(list);
        }

        let words_path = word_list_path(dir, &key);
        if words_path.is_file() {
            let words = WordList::load(&words_path)?;
            debug!("Loaded {} dictionary words from {:?}", words.len(), words_path);
            resources = resources.with_oracle(words);
        }

        if resources.replace_list.is_none() && !resources.has_oracle() {
            warn!("No resources found for language '{}' in {:?}", key, dir);
        }

        self.languages.insert(key.clone(), resources);
        self.languages
            .get(&key)
            .ok_or(ResourceError::UnknownLanguage(key))
    }
}
