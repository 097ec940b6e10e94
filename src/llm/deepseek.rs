// ABOUTME: DeepSeek provider implementation over its OpenAI-compatible chat completions API
// ABOUTME: Bearer-authenticated, model deepseek-chat, reply taken from the first choice
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

//! # DeepSeek Provider
//!
//! Set `DEEPSEEK_API_KEY` with a key from the DeepSeek platform. The request
//! and response shapes follow the OpenAI chat completions format.

use async_trait::async_trait;
use reqwest::Client;
use ridhi_core::constants::{endpoints, limits, messages, models};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmProvider};
use crate::errors::AppError;
use crate::utils::http_client::shared_client;

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

#[derive(Debug, Serialize)]
struct DeepSeekRequest {
    model: String,
    messages: Vec<DeepSeekMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DeepSeekMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for DeepSeekMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeepSeekResponse {
    #[serde(default)]
    choices: Vec<DeepSeekChoice>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeepSeekChoice {
    message: Option<DeepSeekResponseMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeepSeekResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeepSeekErrorResponse {
    error: DeepSeekErrorDetail,
}

#[derive(Debug, Deserialize)]
struct DeepSeekErrorDetail {
    message: String,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// DeepSeek chat completion provider
pub struct DeepSeekProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl DeepSeekProvider {
    /// Create a new DeepSeek provider with the given API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: shared_client().clone(),
            api_key: api_key.into(),
            base_url: endpoints::DEEPSEEK_API_BASE.to_owned(),
        }
    }

    /// Point the provider at a different API host
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    fn build_request(request: &ChatRequest) -> DeepSeekRequest {
        DeepSeekRequest {
            model: request
                .model
                .clone()
                .unwrap_or_else(|| models::DEEPSEEK_MODEL.to_owned()),
            messages: request.messages.iter().map(DeepSeekMessage::from).collect(),
            temperature: request.temperature.unwrap_or(limits::TEMPERATURE),
            max_tokens: request.max_tokens.unwrap_or(limits::MAX_OUTPUT_TOKENS),
        }
    }

    fn parse_error_response(status: reqwest::StatusCode, body: &str) -> AppError {
        let message = serde_json::from_str::<DeepSeekErrorResponse>(body).map_or_else(
            |_| body.chars().take(200).collect::<String>(),
            |e| e.error.message,
        );
        AppError::from_upstream_status("DeepSeek", status.as_u16(), &message)
    }
}

#[async_trait]
impl LlmProvider for DeepSeekProvider {
    fn name(&self) -> &'static str {
        "deepseek"
    }

    fn display_name(&self) -> &'static str {
        "DeepSeek"
    }

    fn default_model(&self) -> &str {
        models::DEEPSEEK_MODEL
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(models::DEEPSEEK_MODEL)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        if self.api_key.is_empty() {
            return Err(AppError::config("DEEPSEEK_API_KEY is not configured"));
        }

        let body = Self::build_request(request);
        debug!(messages = body.messages.len(), "Sending chat completion request to DeepSeek");

        let response = self
            .client
            .post(self.api_url("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to DeepSeek API: {e}");
                AppError::from(e)
            })?;

        let status = response.status();
        let text = response.text().await.map_err(AppError::from)?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &text));
        }

        let parsed: DeepSeekResponse = serde_json::from_str(&text).map_err(|e| {
            error!("Failed to parse DeepSeek API response: {e}");
            AppError::external_service("DeepSeek", format!("Failed to parse response: {e}"))
        })?;

        let choice = parsed.choices.into_iter().next();
        let finish_reason = choice.as_ref().and_then(|c| c.finish_reason.clone());
        let content = choice
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|content| !content.is_empty())
            .unwrap_or_else(|| messages::NO_DEEPSEEK_RESPONSE.to_owned());

        debug!(chars = content.len(), ?finish_reason, "Received DeepSeek response");

        Ok(ChatResponse {
            content,
            model: parsed.model.unwrap_or(body.model),
            finish_reason,
        })
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, AppError> {
        let response = self
            .client
            .get(self.api_url("models"))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(AppError::from)?;

        let healthy = response.status().is_success();
        if !healthy {
            warn!("DeepSeek health check failed with status: {}", response.status());
        }
        Ok(healthy)
    }
}

impl std::fmt::Debug for DeepSeekProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepSeekProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
