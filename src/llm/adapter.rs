// ABOUTME: Fail-soft provider adapter with per-call timeout and bounded retry
// ABOUTME: Turns every provider outcome into an AiResult tagged with its source
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

use std::sync::Arc;
use std::time::{Duration, Instant};

use ridhi_core::constants::{limits, prompts};
use ridhi_core::models::{AiResult, AiSource, Message};
use tracing::{debug, instrument, warn};

use super::{ChatMessage, ChatRequest, ChatResponse, DeepSeekProvider, GeminiProvider, LlmProvider};
use crate::config::LlmConfig;
use crate::errors::AppError;

/// Retry schedule for transient provider failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one
    pub max_retries: u32,
    /// Delay before the first retry; doubled for every further retry
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// No retries at all
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Backoff before retry number `retry` (zero-based)
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay
            .saturating_mul(2_u32.saturating_pow(retry.min(16)))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: limits::DEFAULT_PROVIDER_MAX_RETRIES,
            base_delay: Duration::from_millis(limits::PROVIDER_RETRY_BASE_DELAY_MS),
        }
    }
}

/// One completion API behind the `call(prompt, history) -> AiResult` contract
pub struct ProviderAdapter {
    source: AiSource,
    provider: Arc<dyn LlmProvider>,
    system_prompt: Option<String>,
    timeout: Duration,
    retry: RetryPolicy,
}

impl ProviderAdapter {
    /// Wrap a provider with default timeout and retry
    #[must_use]
    pub fn new(source: AiSource, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            source,
            provider,
            system_prompt: None,
            timeout: Duration::from_secs(limits::DEFAULT_PROVIDER_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        }
    }

    /// Gemini adapter built from configuration
    #[must_use]
    pub fn gemini(config: &LlmConfig) -> Self {
        let provider = GeminiProvider::new(config.gemini_api_key.clone().unwrap_or_default())
            .with_default_model(config.gemini_model.clone())
            .with_base_url(config.gemini_base_url.clone());
        Self::new(AiSource::Gemini, Arc::new(provider))
            .with_timeout(config.timeout)
            .with_retry(RetryPolicy {
                max_retries: config.max_retries,
                ..RetryPolicy::default()
            })
    }

    /// DeepSeek adapter built from configuration, with the Ridhi system instruction
    #[must_use]
    pub fn deepseek(config: &LlmConfig) -> Self {
        let provider = DeepSeekProvider::new(config.deepseek_api_key.clone().unwrap_or_default())
            .with_base_url(config.deepseek_base_url.clone());
        Self::new(AiSource::Deepseek, Arc::new(provider))
            .with_system_prompt(prompts::RIDHI_SYSTEM_PROMPT)
            .with_timeout(config.timeout)
            .with_retry(RetryPolicy {
                max_retries: config.max_retries,
                ..RetryPolicy::default()
            })
    }

    /// Prepend a fixed system instruction to every request
    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Bound every attempt by `timeout`
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the retry schedule
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Tag carried by every result of this adapter
    #[must_use]
    pub const fn source(&self) -> AiSource {
        self.source
    }

    /// The wrapped provider
    #[must_use]
    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    fn build_request(&self, prompt: &str, history: &[Message]) -> ChatRequest {
        let mut messages = Vec::with_capacity(history.len() + 2);
        if let Some(system) = &self.system_prompt {
            messages.push(ChatMessage::system(system.clone()));
        }
        messages.extend(history.iter().map(ChatMessage::from));
        messages.push(ChatMessage::user(prompt));

        ChatRequest::new(messages)
            .with_temperature(limits::TEMPERATURE)
            .with_max_tokens(limits::MAX_OUTPUT_TOKENS)
    }

    /// Ask the provider; never fails, failures become `AiResult::failed`
    #[instrument(skip_all, fields(provider = %self.source, history.len = history.len()))]
    pub async fn call(&self, prompt: &str, history: &[Message]) -> AiResult {
        let request = self.build_request(prompt, history);
        let started = Instant::now();

        match self.complete_with_retry(&request).await {
            Ok(response) => {
                debug!(
                    duration_ms = started.elapsed().as_millis() as u64,
                    chars = response.content.len(),
                    "Provider call succeeded"
                );
                AiResult::ok(self.source, response.content)
            }
            Err(error) => {
                warn!(
                    duration_ms = started.elapsed().as_millis() as u64,
                    code = ?error.code,
                    error = %error.message,
                    "Provider call failed"
                );
                AiResult::failed(self.source, error.message)
            }
        }
    }

    async fn complete_with_retry(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let mut retry = 0;
        loop {
            match self.attempt(request).await {
                Err(error) if error.is_transient() && retry < self.retry.max_retries => {
                    let delay = self.retry.delay_for(retry);
                    debug!(retry = retry + 1, delay_ms = delay.as_millis() as u64, error = %error.message, "Retrying provider call");
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
                outcome => return outcome,
            }
        }
    }

    async fn attempt(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        tokio::time::timeout(self.timeout, self.provider.complete(request))
            .await
            .map_err(|_| {
                AppError::external_timeout(self.provider.display_name(), self.timeout.as_secs())
            })?
    }
}

impl std::fmt::Debug for ProviderAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderAdapter")
            .field("source", &self.source)
            .field("provider", &self.provider.name())
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
