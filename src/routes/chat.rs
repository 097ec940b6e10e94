// ABOUTME: Chat route handlers: ask the providers, persist the exchange, browse and clear history
// ABOUTME: History is partitioned per user by week label; routes carry no authentication
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

//! Chat routes
//!
//! `POST /api/chat/message` stores the exchange only when a `userId` was
//! sent and the orchestrated response succeeded.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use ridhi_core::models::{AiModelSelector, AiSource, ChatEntry, Message};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{server_failure, JsonBody};
use crate::errors::AppError;
use crate::resources::ServerResources;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Body of `POST /api/chat/message`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    /// The prompt
    #[serde(default)]
    pub message: Option<String>,
    /// Owner; the exchange is only stored when present
    #[serde(default)]
    pub user_id: Option<String>,
    /// Earlier turns, oldest first
    #[serde(default)]
    pub conversation_history: Vec<Message>,
    /// "gemini", "deepseek" or "both" (default)
    #[serde(default)]
    pub ai_model: Option<String>,
}

/// Reply of `POST /api/chat/message`
#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageResponse {
    /// Whether any provider answered
    pub success: bool,
    /// Reply text, or the unavailable / error message
    pub response: String,
    /// Contributing providers, primary first
    pub sources: Vec<AiSource>,
    /// The provider whose text is `response`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<AiSource>,
}

/// `?week=` filter
#[derive(Debug, Default, Deserialize)]
pub struct WeekQuery {
    /// Week label such as "Week 2 March"
    #[serde(default)]
    pub week: Option<String>,
}

/// Reply of `GET /api/chat/history/:userId`
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    /// Always true
    pub success: bool,
    /// Newest first
    pub messages: Vec<ChatEntry>,
}

/// Reply of `GET /api/chat/weeks/:userId`
#[derive(Debug, Serialize, Deserialize)]
pub struct WeeksResponse {
    /// Always true
    pub success: bool,
    /// Distinct week labels, most recent first
    pub weeks: Vec<String>,
}

// ============================================================================
// Chat Routes
// ============================================================================

/// Chat routes handler
pub struct ChatRoutes;

impl ChatRoutes {
    /// Create all chat routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/chat/message", post(Self::send_message))
            .route(
                "/api/chat/history/:user_id",
                get(Self::get_history).delete(Self::clear_history),
            )
            .route("/api/chat/weeks/:user_id", get(Self::get_weeks))
            .with_state(resources)
    }

    /// Ask the selected provider(s) and optionally persist the exchange
    #[instrument(skip_all, fields(user.id = request.user_id.as_deref().unwrap_or("anonymous")))]
    async fn send_message(
        State(resources): State<Arc<ServerResources>>,
        JsonBody(request): JsonBody<SendMessageRequest>,
    ) -> Result<Response, AppError> {
        let message = request
            .message
            .filter(|m| !m.is_empty())
            .ok_or_else(|| AppError::missing_field("Message is required"))?;
        let selector = AiModelSelector::parse(request.ai_model.as_deref());

        let response = resources
            .orchestrator
            .ask(&message, &request.conversation_history, selector)
            .await;

        if let Some(user_id) = request.user_id.as_deref().filter(|id| !id.is_empty()) {
            if response.success {
                resources
                    .conversations
                    .append(user_id, &message, &response.text, &response.sources)
                    .await
                    .map_err(server_failure("Failed to process message"))?;
            }
        }

        info!(
            success = response.success,
            sources = response.sources.len(),
            "Chat message answered"
        );

        Ok((
            StatusCode::OK,
            Json(SendMessageResponse {
                success: response.success,
                response: response.text,
                sources: response.sources,
                primary: response.primary,
            }),
        )
            .into_response())
    }

    /// Up to 100 entries, newest first
    async fn get_history(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
        Query(query): Query<WeekQuery>,
    ) -> Result<Response, AppError> {
        let messages = resources
            .conversations
            .list(&user_id, query.week.as_deref())
            .await
            .map_err(server_failure("Failed to fetch history"))?;

        Ok((
            StatusCode::OK,
            Json(HistoryResponse {
                success: true,
                messages,
            }),
        )
            .into_response())
    }

    /// Distinct week labels
    async fn get_weeks(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
    ) -> Result<Response, AppError> {
        let weeks = resources
            .conversations
            .list_week_labels(&user_id)
            .await
            .map_err(server_failure("Failed to fetch weeks"))?;

        Ok((StatusCode::OK, Json(WeeksResponse { success: true, weeks })).into_response())
    }

    /// Delete all history, or one week of it
    async fn clear_history(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
        Query(query): Query<WeekQuery>,
    ) -> Result<Response, AppError> {
        resources
            .conversations
            .clear(&user_id, query.week.as_deref())
            .await
            .map_err(server_failure("Failed to delete history"))?;

        Ok((
            StatusCode::OK,
            Json(serde_json::json!({ "success": true, "message": "Chat history cleared" })),
        )
            .into_response())
    }
}
