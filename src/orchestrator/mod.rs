// ABOUTME: Dual-provider response orchestrator with summarize and document Q&A helpers
// ABOUTME: Runs both adapters concurrently, joins on both, then applies the pure decision function
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

//! # Response Orchestrator
//!
//! `resolve` spawns one task per provider and waits for both of them; the
//! first answer is never taken early. Provider failures arrive as failed
//! [`AiResult`]s. A task that dies (panics) is the only unexpected failure
//! and yields the generic error response.

mod classifier;
mod decision;

pub use classifier::{KeywordClassifier, TECHNICAL_KEYWORDS};
pub use decision::{decide, Outcome};

use std::sync::Arc;

use ridhi_core::constants::prompts;
use ridhi_core::models::{AiModelSelector, AiResult, Message, OrchestratedResponse};
use tokio::task::JoinError;
use tracing::{error, info, instrument, Instrument};

use crate::config::LlmConfig;
use crate::errors::AppResult;
use crate::llm::ProviderAdapter;

/// Combines provider A (Gemini) and provider B (DeepSeek)
#[derive(Debug, Clone)]
pub struct Orchestrator {
    provider_a: Arc<ProviderAdapter>,
    provider_b: Arc<ProviderAdapter>,
    classifier: Arc<KeywordClassifier>,
}

impl Orchestrator {
    /// Create an orchestrator over two adapters and a classifier
    #[must_use]
    pub fn new(
        provider_a: ProviderAdapter,
        provider_b: ProviderAdapter,
        classifier: KeywordClassifier,
    ) -> Self {
        Self {
            provider_a: Arc::new(provider_a),
            provider_b: Arc::new(provider_b),
            classifier: Arc::new(classifier),
        }
    }

    /// Gemini + DeepSeek with the technical keyword set
    ///
    /// # Errors
    ///
    /// Returns a config error if the keyword pattern cannot be compiled
    pub fn from_config(config: &LlmConfig) -> AppResult<Self> {
        Ok(Self::new(
            ProviderAdapter::gemini(config),
            ProviderAdapter::deepseek(config),
            KeywordClassifier::technical()?,
        ))
    }

    /// Provider A adapter
    #[must_use]
    pub fn provider_a(&self) -> &ProviderAdapter {
        &self.provider_a
    }

    /// Provider B adapter
    #[must_use]
    pub fn provider_b(&self) -> &ProviderAdapter {
        &self.provider_b
    }

    /// Ask both providers and pick the answer
    #[instrument(skip_all, fields(prompt.len = prompt.len(), history.len = history.len()))]
    pub async fn resolve(&self, prompt: &str, history: &[Message]) -> OrchestratedResponse {
        let shared_prompt: Arc<str> = Arc::from(prompt);
        let shared_history: Arc<[Message]> = Arc::from(history);

        let task_a = spawn_call(&self.provider_a, &shared_prompt, &shared_history);
        let task_b = spawn_call(&self.provider_b, &shared_prompt, &shared_history);
        let (a, b) = tokio::join!(task_a, task_b);

        match (a, b) {
            (Ok(a), Ok(b)) => {
                let response = decide(prompt, Outcome::from_results(a, b), &self.classifier);
                info!(
                    success = response.success,
                    primary = response.primary.map_or("none", |p| p.as_str()),
                    "Resolved prompt"
                );
                response
            }
            (Err(join_error), _) | (_, Err(join_error)) => internal_failure(&join_error),
        }
    }

    /// Route a chat message to one provider or to both
    pub async fn ask(
        &self,
        prompt: &str,
        history: &[Message],
        selector: AiModelSelector,
    ) -> OrchestratedResponse {
        let adapter = match selector {
            AiModelSelector::Both => return self.resolve(prompt, history).await,
            AiModelSelector::Gemini => &self.provider_a,
            AiModelSelector::Deepseek => &self.provider_b,
        };

        let task = spawn_call(adapter, &Arc::from(prompt), &Arc::from(history));
        match task.await {
            Ok(result) => OrchestratedResponse::from_single(result),
            Err(join_error) => internal_failure(&join_error),
        }
    }

    /// Summarize content with provider A only; `content_type` defaults to "general"
    #[instrument(skip(self, content), fields(content.len = content.len()))]
    pub async fn summarize(&self, content: &str, content_type: Option<&str>) -> AiResult {
        let content_type = content_type
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(prompts::DEFAULT_SUMMARY_TYPE);
        self.provider_a
            .call(&prompts::summarize(content, content_type), &[])
            .await
    }

    /// Answer a question about content through the full dual-provider resolve
    #[instrument(skip(self, content, query), fields(content.len = content.len()))]
    pub async fn extract_information(&self, content: &str, query: &str) -> OrchestratedResponse {
        self.resolve(&prompts::extract_information(content, query), &[])
            .await
    }
}

fn spawn_call(
    adapter: &Arc<ProviderAdapter>,
    prompt: &Arc<str>,
    history: &Arc<[Message]>,
) -> tokio::task::JoinHandle<AiResult> {
    let adapter = Arc::clone(adapter);
    let prompt = Arc::clone(prompt);
    let history = Arc::clone(history);
    tokio::spawn(async move { adapter.call(&prompt, &history).await }.in_current_span())
}

fn internal_failure(join_error: &JoinError) -> OrchestratedResponse {
    error!(error = %join_error, "Provider task failed unexpectedly");
    OrchestratedResponse::internal_failure(join_error.to_string())
}
