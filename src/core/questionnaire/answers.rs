//! Accumulated questionnaire answers.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::questions::QuestionKey;

/// Answers keyed by [`QuestionKey`]. Every field defaults to an empty string,
/// never missing.
///
/// The set is treated as a value: [`AnswerSet::with_answer`] returns a new
/// snapshot rather than editing in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerSet {
    pub idea: String,
    /// What inspired the idea.
    #[serde(rename = "q11")]
    pub inspiration: String,
    /// Who benefits most.
    #[serde(rename = "q12")]
    pub beneficiaries: String,
    /// Main problem being solved.
    #[serde(rename = "q13")]
    pub problem: String,
    /// Technology or method.
    #[serde(rename = "q14")]
    pub technology: String,
    /// Expected results or impact.
    #[serde(rename = "q15")]
    pub impact: String,
    /// Main concerns or risks.
    #[serde(rename = "q16")]
    pub concerns: String,
    /// Medical or technical background.
    #[serde(rename = "q17")]
    pub background: String,
    /// Type of feedback requested.
    #[serde(rename = "q18")]
    pub feedback: String,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer for `key` (empty string if unanswered).
    pub fn get(&self, key: QuestionKey) -> &str {
        match key {
            QuestionKey::Idea => &self.idea,
            QuestionKey::Inspiration => &self.inspiration,
            QuestionKey::Beneficiaries => &self.beneficiaries,
            QuestionKey::Problem => &self.problem,
            QuestionKey::Technology => &self.technology,
            QuestionKey::Impact => &self.impact,
            QuestionKey::Concerns => &self.concerns,
            QuestionKey::Background => &self.background,
            QuestionKey::Feedback => &self.feedback,
        }
    }

    fn slot_mut(&mut self, key: QuestionKey) -> &mut String {
        match key {
            QuestionKey::Idea => &mut self.idea,
            QuestionKey::Inspiration => &mut self.inspiration,
            QuestionKey::Beneficiaries => &mut self.beneficiaries,
            QuestionKey::Problem => &mut self.problem,
            QuestionKey::Technology => &mut self.technology,
            QuestionKey::Impact => &mut self.impact,
            QuestionKey::Concerns => &mut self.concerns,
            QuestionKey::Background => &mut self.background,
            QuestionKey::Feedback => &mut self.feedback,
        }
    }

    /// New snapshot with `key` replaced by `value`.
    pub fn with_answer(&self, key: QuestionKey, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        *next.slot_mut(key) = value.into();
        next
    }

    /// Whether the answer for `key` is empty after trimming whitespace.
    pub fn is_blank(&self, key: QuestionKey) -> bool {
        self.get(key).trim().is_empty()
    }

    /// Keys whose answers are blank, in question order.
    pub fn blank_keys(&self) -> Vec<QuestionKey> {
        QuestionKey::ALL
            .into_iter()
            .filter(|&k| self.is_blank(k))
            .collect()
    }

    /// Load an answer file. The format is picked from the extension:
    /// `.toml` or `.json`.
    pub fn from_path(path: &Path) -> Result<Self, AnswerFileError> {
        let contents = std::fs::read_to_string(path).map_err(|source| AnswerFileError::Io {
            path: path.display().to_string(),
            source,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(toml::from_str(&contents)?),
            Some("json") => Ok(serde_json::from_str(&contents)?),
            other => Err(AnswerFileError::UnsupportedFormat(
                other.unwrap_or("").to_string(),
            )),
        }
    }
}

/// Errors raised while reading an answer file.
#[derive(Debug, thiserror::Error)]
pub enum AnswerFileError {
    #[error("Failed to read answer file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML answer file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON answer file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported answer file format: '{0}' (expected .toml or .json)")]
    UnsupportedFormat(String),
}
