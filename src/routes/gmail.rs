// ABOUTME: Gmail route handlers: consent URL, code exchange, list, read and send
// ABOUTME: The client passes its own access token in each mailbox request body
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::{server_failure, JsonBody};
use crate::errors::AppError;
use crate::resources::ServerResources;

/// Body of `POST /api/gmail/set-tokens`
#[derive(Debug, Default, Deserialize)]
pub struct SetTokensRequest {
    /// Authorization code from the consent redirect
    #[serde(default)]
    pub code: Option<String>,
}

/// Body of `POST /api/gmail/list`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMailRequest {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub max_results: Option<u32>,
    /// Gmail search query; "is:unread" when empty
    #[serde(default)]
    pub query: Option<String>,
}

/// Body of `POST /api/gmail/read`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadMailRequest {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
}

/// Body of `POST /api/gmail/send`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMailRequest {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// Gmail routes handler
pub struct GmailRoutes;

impl GmailRoutes {
    /// Create all Gmail routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/gmail/auth-url", get(Self::auth_url))
            .route("/api/gmail/set-tokens", post(Self::set_tokens))
            .route("/api/gmail/list", post(Self::list))
            .route("/api/gmail/read", post(Self::read))
            .route("/api/gmail/send", post(Self::send))
            .with_state(resources)
    }

    async fn auth_url(State(resources): State<Arc<ServerResources>>) -> Result<Response, AppError> {
        let auth_url = resources
            .gmail
            .auth_url()
            .map_err(server_failure("Failed to generate auth URL"))?;

        Ok((
            StatusCode::OK,
            Json(json!({ "success": true, "authUrl": auth_url })),
        )
            .into_response())
    }

    async fn set_tokens(
        State(resources): State<Arc<ServerResources>>,
        JsonBody(request): JsonBody<SetTokensRequest>,
    ) -> Result<Response, AppError> {
        let tokens = resources
            .gmail
            .exchange_code(request.code.as_deref().unwrap_or_default())
            .await
            .map_err(server_failure("Failed to exchange code for tokens"))?;

        Ok((StatusCode::OK, Json(json!({ "success": true, "tokens": tokens }))).into_response())
    }

    async fn list(
        State(resources): State<Arc<ServerResources>>,
        JsonBody(request): JsonBody<ListMailRequest>,
    ) -> Result<Response, AppError> {
        let messages = resources
            .gmail
            .list(
                request.access_token.as_deref().unwrap_or_default(),
                request.max_results,
                request.query.as_deref(),
            )
            .await
            .map_err(server_failure("Failed to fetch emails"))?;

        Ok((
            StatusCode::OK,
            Json(json!({ "success": true, "messages": messages })),
        )
            .into_response())
    }

    async fn read(
        State(resources): State<Arc<ServerResources>>,
        JsonBody(request): JsonBody<ReadMailRequest>,
    ) -> Result<Response, AppError> {
        let email = resources
            .gmail
            .read(
                request.access_token.as_deref().unwrap_or_default(),
                request.message_id.as_deref().unwrap_or_default(),
            )
            .await
            .map_err(server_failure("Failed to read email"))?;

        Ok((StatusCode::OK, Json(json!({ "success": true, "email": email }))).into_response())
    }

    async fn send(
        State(resources): State<Arc<ServerResources>>,
        JsonBody(request): JsonBody<SendMailRequest>,
    ) -> Result<Response, AppError> {
        let message_id = resources
            .gmail
            .send(
                request.access_token.as_deref().unwrap_or_default(),
                request.to.as_deref().unwrap_or_default(),
                request.subject.as_deref().unwrap_or_default(),
                request.body.as_deref().unwrap_or_default(),
            )
            .await
            .map_err(server_failure("Failed to send email"))?;

        Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Email sent successfully",
                "messageId": message_id,
            })),
        )
            .into_response())
    }
}
