// ABOUTME: Keyword predicate deciding whether a prompt is technical
// ABOUTME: Whole-word, case-insensitive match against a configurable word set
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

use regex::Regex;

use crate::errors::{AppError, AppResult};

/// Interrogative and technical words that route a prompt to provider A
pub const TECHNICAL_KEYWORDS: [&str; 9] = [
    "how",
    "what",
    "why",
    "explain",
    "define",
    "calculate",
    "solve",
    "code",
    "program",
];

/// Whole-word keyword matcher.
///
/// Word boundaries are ASCII (`[A-Za-z0-9_]` counts as a word character),
/// so "showcase" does not match "how" while "code-review" matches "code".
/// Case folding is ASCII only.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    pattern: Regex,
    words: Vec<String>,
}

impl KeywordClassifier {
    /// Build a classifier over an arbitrary word set
    ///
    /// # Errors
    ///
    /// Returns a config error if the word set is empty or the pattern cannot be compiled
    pub fn new<I, S>(words: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(Into::into)
            .map(|word| word.trim().to_owned())
            .filter(|word| !word.is_empty())
            .collect();
        if words.is_empty() {
            return Err(AppError::config("keyword classifier needs at least one word"));
        }

        let alternation = words
            .iter()
            .map(|word| regex::escape(word))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"(?i-u)\b(?:{alternation})\b"))
            .map_err(|e| AppError::config(format!("invalid keyword pattern: {e}")))?;

        Ok(Self { pattern, words })
    }

    /// Classifier over [`TECHNICAL_KEYWORDS`]
    ///
    /// # Errors
    ///
    /// Returns a config error if the pattern cannot be compiled
    pub fn technical() -> AppResult<Self> {
        Self::new(TECHNICAL_KEYWORDS)
    }

    /// Whether any keyword occurs as a whole word in `prompt`
    #[must_use]
    pub fn is_match(&self, prompt: &str) -> bool {
        self.pattern.is_match(prompt)
    }

    /// The configured words
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }
}
