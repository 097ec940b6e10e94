// ABOUTME: Provider result and orchestrated response types
// ABOUTME: AiResult upholds its success/text/error invariant through its only two constructors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::messages::{BOTH_PROVIDERS_UNAVAILABLE, GENERIC_PROCESSING_ERROR};

/// Provider tag attached to results and persisted chat entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiSource {
    /// Gemini completion API ("provider A")
    Gemini,
    /// DeepSeek chat completion API ("provider B")
    Deepseek,
}

impl AiSource {
    /// Wire tag
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Deepseek => "deepseek",
        }
    }
}

impl fmt::Display for AiSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of one provider call.
///
/// A failed result always carries empty text; a successful one never carries
/// an error. Fields are private so that [`AiResult::ok`] and
/// [`AiResult::failed`] are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AiResult {
    source: AiSource,
    text: String,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl AiResult {
    /// Successful completion
    #[must_use]
    pub fn ok(source: AiSource, text: impl Into<String>) -> Self {
        Self {
            source,
            text: text.into(),
            success: true,
            error: None,
        }
    }

    /// Failed completion with a diagnostic
    #[must_use]
    pub fn failed(source: AiSource, error: impl Into<String>) -> Self {
        Self {
            source,
            text: String::new(),
            success: false,
            error: Some(error.into()),
        }
    }

    /// Which provider produced this result
    #[must_use]
    pub const fn source(&self) -> AiSource {
        self.source
    }

    /// Reply text, empty on failure
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the call succeeded
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }

    /// Failure diagnostic
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Consume the result, returning the reply text
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Final answer of the orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrchestratedResponse {
    /// Whether any provider produced the text
    pub success: bool,
    /// Chosen reply, or a fixed apology when nothing succeeded
    pub text: String,
    /// Contributing providers, primary first
    pub sources: Vec<AiSource>,
    /// Provider whose text is `text`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<AiSource>,
    /// The other provider's reply when both succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative: Option<String>,
    /// Diagnostic for unexpected failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OrchestratedResponse {
    /// Both providers failed
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            success: false,
            text: BOTH_PROVIDERS_UNAVAILABLE.to_owned(),
            sources: Vec::new(),
            primary: None,
            alternative: None,
            error: None,
        }
    }

    /// Something other than a provider failure went wrong
    #[must_use]
    pub fn internal_failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            text: GENERIC_PROCESSING_ERROR.to_owned(),
            sources: Vec::new(),
            primary: None,
            alternative: None,
            error: Some(error.into()),
        }
    }

    /// Exactly one provider answered
    #[must_use]
    pub fn single(result: AiResult) -> Self {
        let source = result.source();
        Self {
            success: true,
            text: result.into_text(),
            sources: vec![source],
            primary: Some(source),
            alternative: None,
            error: None,
        }
    }

    /// Both providers answered; `primary` supplies the text
    #[must_use]
    pub fn dual(primary: AiResult, alternative: AiResult) -> Self {
        let primary_source = primary.source();
        Self {
            success: true,
            sources: vec![primary_source, alternative.source()],
            text: primary.into_text(),
            primary: Some(primary_source),
            alternative: Some(alternative.into_text()),
            error: None,
        }
    }

    /// Wrap one provider result as-is (single-provider mode).
    ///
    /// A failed result keeps its empty text and error, with no sources.
    #[must_use]
    pub fn from_single(result: AiResult) -> Self {
        if result.is_success() {
            return Self::single(result);
        }
        Self {
            success: false,
            text: String::new(),
            sources: Vec::new(),
            primary: None,
            alternative: None,
            error: result.error().map(str::to_owned),
        }
    }
}

/// Which provider(s) a chat message should be sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiModelSelector {
    /// Gemini only
    Gemini,
    /// DeepSeek only
    Deepseek,
    /// Dual-provider resolve
    #[default]
    Both,
}

impl AiModelSelector {
    /// Parse a client-supplied selector; missing or unknown values mean `Both`
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("gemini") => Self::Gemini,
            Some("deepseek") => Self::Deepseek,
            _ => Self::Both,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_result_has_empty_text() {
        let result = AiResult::failed(AiSource::Gemini, "timeout");
        assert!(!result.is_success());
        assert_eq!(result.text(), "");
        assert_eq!(result.error(), Some("timeout"));
    }

    #[test]
    fn test_ok_result_has_no_error() {
        let result = AiResult::ok(AiSource::Deepseek, "hello");
        assert!(result.is_success());
        assert!(result.error().is_none());
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["source"], "deepseek");
    }

    #[test]
    fn test_selector_parse_defaults_to_both() {
        assert_eq!(AiModelSelector::parse(Some("gemini")), AiModelSelector::Gemini);
        assert_eq!(AiModelSelector::parse(Some("deepseek")), AiModelSelector::Deepseek);
        assert_eq!(AiModelSelector::parse(Some("both")), AiModelSelector::Both);
        assert_eq!(AiModelSelector::parse(Some("claude")), AiModelSelector::Both);
        assert_eq!(AiModelSelector::parse(None), AiModelSelector::Both);
    }

    #[test]
    fn test_from_single_failure_has_no_sources() {
        let response =
            OrchestratedResponse::from_single(AiResult::failed(AiSource::Gemini, "boom"));
        assert!(!response.success);
        assert!(response.sources.is_empty());
        assert!(response.primary.is_none());
        assert_eq!(response.error.as_deref(), Some("boom"));
    }
}
