use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::repair::FixPass;
use crate::repair::line_merge::DEFAULT_MAX_MERGED_LENGTH;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Language of the subtitles (ISO 639-1 or 639-2)
    #[serde(default = "default_language")]
    pub language: String,

    /// Directory holding `<lang>_replace_list.json` and `<lang>_words.txt`
    #[serde(default)]
    pub resources_dir: Option<PathBuf>,

    /// Fix pass selection and tunables
    #[serde(default)]
    pub fixes: FixConfig,

    /// Inserted before the extension of output files (`movie.fixed.srt`)
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Which passes run and how
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FixConfig {
    /// Passes to run; execution order is fixed regardless of list order
    #[serde(default = "default_enabled_passes")]
    pub enabled_passes: Vec<FixPass>,

    /// Longest visible length of a merged line
    #[serde(default = "default_max_merged_length")]
    pub max_merged_length: usize,
}

impl Default for FixConfig {
    fn default() -> Self {
        Self {
            enabled_passes: default_enabled_passes(),
            max_merged_length: default_max_merged_length(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_output_suffix() -> String {
    "fixed".to_string()
}

fn default_enabled_passes() -> Vec<FixPass> {
    FixPass::ALL.to_vec()
}

fn default_max_merged_length() -> usize {
    DEFAULT_MAX_MERGED_LENGTH
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::validate_language_code(&self.language)
            .with_context(|| format!("Invalid subtitle language '{}'", self.language))?;

        if self.fixes.max_merged_length == 0 {
            return Err(anyhow!("fixes.max_merged_length must be greater than zero"));
        }

        if self.fixes.enabled_passes.is_empty() {
            warn!("No fix passes enabled, files will be copied unchanged");
        }

        if let Some(dir) = &self.resources_dir {
            if !dir.is_dir() {
                return Err(anyhow!("Resource directory does not exist: {:?}", dir));
            }
        }

        if self.output_suffix.contains(['/', '\\']) {
            return Err(anyhow!("Output suffix must not contain path separators: {}", self.output_suffix));
        }

        Ok(())
    }

    /// Load a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open config file: {:?}", path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Save the configuration as pretty JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, json).with_context(|| format!("Failed to write config file: {:?}", path))
    }

    /// Load the configuration, writing a default one first if it is missing.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            language: default_language(),
            resources_dir: None,
            fixes: FixConfig::default(),
            output_suffix: default_output_suffix(),
            log_level: LogLevel::default(),
        }
    }
}
