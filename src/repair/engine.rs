/*!
 * Fix engine.
 *
 * Sequences the repair passes over a document in a fixed order, one cue at
 * a time, and records what changed. The engine does no text work itself.
 */

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::errors::{OracleError, ResourceError};
use crate::language_utils;
use crate::resources::{LanguageResources, ResourceCatalog};

use super::line_merge::DEFAULT_MAX_MERGED_LENGTH;
use super::{casing, dialogue, line_merge, ocr, periods, spacing, spanish, tags};

/// One repair pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixPass {
    BalanceTags,
    Capitalize,
    MissingSpaces,
    DialogueDashes,
    MergeShortLines,
    SpanishMarks,
    OcrReplaceList,
    UppercaseIInsideWords,
    MissingPeriods,
}

impl FixPass {
    /// Every pass, in execution order
    pub const ALL: [FixPass; 9] = [
        FixPass::BalanceTags,
        FixPass::Capitalize,
        FixPass::MissingSpaces,
        FixPass::DialogueDashes,
        FixPass::MergeShortLines,
        FixPass::SpanishMarks,
        FixPass::OcrReplaceList,
        FixPass::UppercaseIInsideWords,
        FixPass::MissingPeriods,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FixPass::BalanceTags => "balance_tags",
            FixPass::Capitalize => "capitalize",
            FixPass::MissingSpaces => "missing_spaces",
            FixPass::DialogueDashes => "dialogue_dashes",
            FixPass::MergeShortLines => "merge_short_lines",
            FixPass::SpanishMarks => "spanish_marks",
            FixPass::OcrReplaceList => "ocr_replace_list",
            FixPass::UppercaseIInsideWords => "uppercase_i_inside_words",
            FixPass::MissingPeriods => "missing_periods",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FixPass::BalanceTags => "Repair unmatched, empty and misplaced <i>, <b> and <u> tags",
            FixPass::Capitalize => "Uppercase the first letter after a sentence end",
            FixPass::MissingSpaces => "Insert missing spaces around tags",
            FixPass::DialogueDashes => "Add or remove speaker dashes",
            FixPass::MergeShortLines => "Merge short multi-line cues into one line",
            FixPass::SpanishMarks => "Insert Spanish inverted question and exclamation marks",
            FixPass::OcrReplaceList => "Apply the language's OCR replace list",
            FixPass::UppercaseIInsideWords => "Replace OCR-confused uppercase I inside words",
            FixPass::MissingPeriods => "Add a period before a new sentence in the next cue",
        }
    }

    /// Passes that consult the dictionary and may be skipped on oracle errors
    pub fn uses_dictionary(&self) -> bool {
        matches!(self, FixPass::OcrReplaceList | FixPass::UppercaseIInsideWords)
    }

    /// The given passes deduplicated and sorted into execution order
    pub fn ordered(passes: &[FixPass]) -> Vec<FixPass> {
        FixPass::ALL
            .iter()
            .copied()
            .filter(|pass| passes.contains(pass))
            .collect()
    }
}

impl fmt::Display for FixPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for FixPass {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        FixPass::ALL
            .iter()
            .copied()
            .find(|pass| pass.name() == wanted)
            .ok_or_else(|| anyhow!("Unknown fix pass: {}", s))
    }
}

/// Tunables shared by all runs of an engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Longest visible length a merged line may have
    pub max_merged_length: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_merged_length: DEFAULT_MAX_MERGED_LENGTH,
        }
    }
}

/// Neighbourhood of the cue being fixed
#[derive(Debug, Clone, Copy, Default)]
pub struct CueContext<'a> {
    /// 0-based cue index
    pub index: usize,
    /// Text of the previous cue, `None` for the first cue
    pub previous: Option<&'a str>,
    /// Text of the next cue, `None` for the last cue
    pub next: Option<&'a str>,
}

/// Before/after record for one changed cue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CueChange {
    pub index: usize,
    pub old_text: String,
    pub new_text: String,
    /// Passes that changed the text, in execution order
    pub passes: Vec<FixPass>,
}

/// A cue a pass could not process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedCue {
    pub index: usize,
    pub pass: FixPass,
    pub reason: String,
}

/// Outcome of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FixReport {
    pub changes: Vec<CueChange>,
    pub skipped: Vec<SkippedCue>,
    /// Cues visited before the run ended
    pub cues_processed: usize,
    /// The caller stopped the run early
    pub cancelled: bool,
}

impl FixReport {
    pub fn changed_count(&self) -> usize {
        self.changes.len()
    }

    pub fn is_clean(&self) -> bool {
        self.changes.is_empty() && self.skipped.is_empty()
    }

    pub fn change_for(&self, index: usize) -> Option<&CueChange> {
        self.changes.iter().find(|change| change.index == index)
    }

    /// Number of cues each pass changed
    pub fn pass_counts(&self) -> BTreeMap<FixPass, usize> {
        let mut counts = BTreeMap::new();
        for change in &self.changes {
            for pass in &change.passes {
                *counts.entry(*pass).or_insert(0) += 1;
            }
        }
        counts
    }
}

/// Runs repair passes over documents
#[derive(Debug, Default)]
pub struct FixEngine {
    options: EngineOptions,
    catalog: ResourceCatalog,
}

impl FixEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            options,
            catalog: ResourceCatalog::new(),
        }
    }

    /// Use the given resource catalog for the OCR passes.
    pub fn with_catalog(mut self, catalog: ResourceCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Register resources for one language.
    pub fn with_resources(mut self, resources: LanguageResources) -> Result<Self, ResourceError> {
        self.catalog.insert(resources)?;
        Ok(self)
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }

    /// Run the enabled passes over every cue of the document.
    pub fn apply(&self, document: &mut Document, passes: &[FixPass], language: &str) -> FixReport {
        self.apply_until(document, passes, language, |_| true)
    }

    /// Like [`apply`](Self::apply), checking `should_continue` before each
    /// cue. Returning `false` stops the run; cues already fixed stay fixed.
    pub fn apply_until<F>(
        &self,
        document: &mut Document,
        passes: &[FixPass],
        language: &str,
        mut should_continue: F,
    ) -> FixReport
    where
        F: FnMut(usize) -> bool,
    {
        let ordered = FixPass::ordered(passes);
        let resources = self.catalog.get(language);
        self.warn_missing_resources(&ordered, resources, language);

        let mut report = FixReport::default();

        for index in 0..document.len() {
            if !should_continue(index) {
                info!("Fix run cancelled at cue {} of {}", index + 1, document.len());
                report.cancelled = true;
                break;
            }

            let previous = index
                .checked_sub(1)
                .and_then(|i| document.text(i))
                .map(str::to_owned);
            let next = document.text(index + 1).map(str::to_owned);
            let Some(original) = document.text(index).map(str::to_owned) else {
                break;
            };

            let context = CueContext {
                index,
                previous: previous.as_deref(),
                next: next.as_deref(),
            };

            let mut text = original.clone();
            let mut touched = Vec::new();

            for &pass in &ordered {
                match self.run_pass(pass, &text, context, resources, language) {
                    Ok(fixed) => {
                        if fixed != text {
                            debug!("Cue {} [{}]: {:?} -> {:?}", index + 1, pass, text, fixed);
                            touched.push(pass);
                            text = fixed;
                        }
                    }
                    Err(e) => {
                        warn!("Skipping cue {} for {}: {}", index + 1, pass, e);
                        report.skipped.push(SkippedCue {
                            index,
                            pass,
                            reason: e.to_string(),
                        });
                    }
                }
            }

            if text != original {
                document.cues[index].set_text(text.clone());
                report.changes.push(CueChange {
                    index,
                    old_text: original,
                    new_text: text,
                    passes: touched,
                });
            }
            report.cues_processed += 1;
        }

        info!(
            "Fixed {} of {} cues ({} skipped)",
            report.changed_count(),
            report.cues_processed,
            report.skipped.len()
        );

        report
    }

    /// Report what [`apply`](Self::apply) would change without touching
    /// the document.
    pub fn preview(&self, document: &Document, passes: &[FixPass], language: &str) -> FixReport {
        let mut copy = document.clone();
        self.apply(&mut copy, passes, language)
    }

    /// Run a single pass on one text.
    pub fn fix_text(
        &self,
        text: &str,
        pass: FixPass,
        context: CueContext<'_>,
        language: &str,
    ) -> Result<String, OracleError> {
        self.run_pass(pass, text, context, self.catalog.get(language), language)
    }

    fn run_pass(
        &self,
        pass: FixPass,
        text: &str,
        context: CueContext<'_>,
        resources: Option<&LanguageResources>,
        language: &str,
    ) -> Result<String, OracleError> {
        let oracle = resources.and_then(LanguageResources::oracle);

        let fixed = match pass {
            FixPass::BalanceTags => tags::balance_tags(text),
            FixPass::Capitalize => casing::capitalize_first_letter(text, context.previous),
            FixPass::MissingSpaces => spacing::fix_missing_spaces(text),
            FixPass::DialogueDashes => dialogue::normalize_dialogue_dashes(text),
            FixPass::MergeShortLines => {
                line_merge::merge_short_lines(text, self.options.max_merged_length)
            }
            FixPass::SpanishMarks if language_utils::is_spanish(language) => {
                spanish::fix_inverted_marks(text)
            }
            FixPass::SpanishMarks => text.to_string(),
            FixPass::OcrReplaceList => match resources.and_then(|r| r.replace_list.as_ref()) {
                Some(list) => ocr::fix_with_replace_list(text, list, oracle)?,
                None => text.to_string(),
            },
            FixPass::UppercaseIInsideWords => ocr::fix_uppercase_i_inside_words(text, oracle)?,
            FixPass::MissingPeriods => periods::add_missing_period(text, context.next),
        };

        Ok(fixed)
    }

    fn warn_missing_resources(
        &self,
        passes: &[FixPass],
        resources: Option<&LanguageResources>,
        language: &str,
    ) {
        if passes.contains(&FixPass::OcrReplaceList)
            && resources.and_then(|r| r.replace_list.as_ref()).is_none()
        {
            warn!("No replace list for language '{}', OCR replace list pass disabled", language);
        }
        if passes.contains(&FixPass::SpanishMarks) && !language_utils::is_spanish(language) {
            debug!("Language '{}' is not Spanish, skipping inverted marks", language);
        }
    }
}
