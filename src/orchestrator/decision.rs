// ABOUTME: Pure decision function turning two provider results into one answer
// ABOUTME: Tagged outcome plus the technical/conversational routing rule
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

use ridhi_core::models::{AiResult, OrchestratedResponse};

use super::KeywordClassifier;

/// What the two providers produced. `a` is Gemini, `b` is DeepSeek.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Both succeeded
    Both {
        /// Provider A result
        a: AiResult,
        /// Provider B result
        b: AiResult,
    },
    /// Only provider A succeeded
    OnlyA(AiResult),
    /// Only provider B succeeded
    OnlyB(AiResult),
    /// Neither succeeded
    Neither,
}

impl Outcome {
    /// Tag a pair of results
    #[must_use]
    pub fn from_results(a: AiResult, b: AiResult) -> Self {
        match (a.is_success(), b.is_success()) {
            (true, true) => Self::Both { a, b },
            (true, false) => Self::OnlyA(a),
            (false, true) => Self::OnlyB(b),
            (false, false) => Self::Neither,
        }
    }
}

/// Choose the reply.
///
/// With both answers available, technical prompts take A's text with B as
/// the alternative; everything else takes B's text with A as the alternative.
#[must_use]
pub fn decide(prompt: &str, outcome: Outcome, classifier: &KeywordClassifier) -> OrchestratedResponse {
    match outcome {
        Outcome::Neither => OrchestratedResponse::unavailable(),
        Outcome::OnlyA(result) | Outcome::OnlyB(result) => OrchestratedResponse::single(result),
        Outcome::Both { a, b } => {
            if classifier.is_match(prompt) {
                OrchestratedResponse::dual(a, b)
            } else {
                OrchestratedResponse::dual(b, a)
            }
        }
    }
}
