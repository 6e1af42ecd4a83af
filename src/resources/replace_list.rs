/*!
 * OCR replace lists.
 *
 * A replace list is an ordered set of literal find/replace rules for one
 * language, stored as JSON:
 *
 * ```json
 * {"language": "eng", "rules": [{"find": "/", "replace": "l"}]}
 * ```
 */

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ResourceError;

/// One literal substitution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceRule {
    /// Literal text to look for
    pub find: String,

    /// Literal replacement
    pub replace: String,

    /// Apply without consulting the dictionary
    #[serde(default)]
    pub unconditional: bool,
}

impl ReplaceRule {
    /// A rule applied only when the dictionary confirms the correction.
    pub fn new(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
            unconditional: false,
        }
    }

    /// A rule applied to every match.
    pub fn unconditional(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            unconditional: true,
            ..Self::new(find, replace)
        }
    }

    /// Rules that can never change anything
    pub fn is_noop(&self) -> bool {
        self.find.is_empty() || self.find == self.replace
    }
}

/// Ordered replace rules for one language
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceList {
    /// ISO 639-2/T code, informational
    #[serde(default)]
    pub language: String,

    #[serde(default)]
    pub rules: Vec<ReplaceRule>,
}

impl ReplaceList {
    pub fn new(language: impl Into<String>, rules: Vec<ReplaceRule>) -> Self {
        Self {
            language: language.into(),
            rules,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a replace list from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ResourceError> {
        let content = fs::read_to_string(path).map_err(|source| ResourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|e| ResourceError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn rules(&self) -> &[ReplaceRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// True if any rule needs a dictionary to be applied.
    pub fn needs_dictionary(&self) -> bool {
        self.rules.iter().any(|rule| !rule.unconditional && !rule.is_noop())
    }
}
