// ABOUTME: Session key routes and Firebase ID token verification
// ABOUTME: Keys are opaque JSON stored per owner email, "anon" when no email is given
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

//! Session routes
//!
//! These keep the legacy `{ok, ...}` envelope rather than `{success, ...}`.
//! A rejected ID token is a 401 with `{ok: false, error}`; a server without
//! Firebase answers 200 with `{ok: false, message}`.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use ridhi_core::constants::messages;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::JsonBody;
use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::sessions::owner_key;

/// Body of `POST /save-keys`
#[derive(Debug, Default, Deserialize)]
pub struct SaveKeysRequest {
    #[serde(default)]
    pub email: Option<String>,
    /// Opaque key material; must be present and non-null
    #[serde(default)]
    pub keys: Option<Value>,
}

/// `?email=` owner selector
#[derive(Debug, Default, Deserialize)]
pub struct OwnerQuery {
    #[serde(default)]
    pub email: Option<String>,
}

/// Body of `POST /verify-token`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyTokenRequest {
    #[serde(default)]
    pub id_token: Option<String>,
}

/// Session routes handler
pub struct SessionRoutes;

impl SessionRoutes {
    /// Create all session routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/save-keys", post(Self::save_keys))
            .route("/keys", get(Self::get_keys))
            .route("/verify-token", post(Self::verify_token))
            .with_state(resources)
    }

    async fn save_keys(
        State(resources): State<Arc<ServerResources>>,
        JsonBody(request): JsonBody<SaveKeysRequest>,
    ) -> Result<Response, AppError> {
        let keys = request
            .keys
            .filter(|keys| !keys.is_null())
            .ok_or_else(|| AppError::missing_field("Missing keys payload"))?;
        let owner = owner_key(request.email.as_deref());

        resources.sessions.save_keys(owner, keys).await?;
        info!(owner, "Session keys saved");

        Ok((StatusCode::OK, Json(json!({ "ok": true }))).into_response())
    }

    async fn get_keys(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<OwnerQuery>,
    ) -> Result<Response, AppError> {
        let keys = resources
            .sessions
            .get_keys(owner_key(query.email.as_deref()))
            .await?;

        Ok((StatusCode::OK, Json(json!({ "keys": keys }))).into_response())
    }

    async fn verify_token(
        State(resources): State<Arc<ServerResources>>,
        JsonBody(request): JsonBody<VerifyTokenRequest>,
    ) -> Result<Response, AppError> {
        let id_token = request
            .id_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::missing_field("Missing idToken"))?;

        if !resources.firebase_auth.is_enabled() {
            return Ok((
                StatusCode::OK,
                Json(json!({ "ok": false, "message": messages::FIREBASE_NOT_CONFIGURED })),
            )
                .into_response());
        }

        match resources.firebase_auth.verify_token(&id_token).await {
            Ok(claims) => Ok((
                StatusCode::OK,
                Json(json!({ "ok": true, "uid": claims.uid(), "claims": claims })),
            )
                .into_response()),
            Err(e) => {
                warn!(error = %e, "ID token rejected");
                Ok((
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "ok": false, "error": e.message })),
                )
                    .into_response())
            }
        }
    }
}
