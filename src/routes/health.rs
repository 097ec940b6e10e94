// ABOUTME: Liveness banner plus health and readiness endpoints
// ABOUTME: Readiness reports which external integrations are configured
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use ridhi_core::constants::messages;
use serde_json::{json, Value};

use crate::logging::SERVICE_NAME;
use crate::resources::ServerResources;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/", get(Self::banner))
            .route("/health", get(Self::health))
            .route("/ready", get(Self::ready))
            .with_state(resources)
    }

    async fn banner() -> Json<Value> {
        Json(json!({ "ok": true, "message": messages::SERVICE_BANNER }))
    }

    async fn health() -> Json<Value> {
        Json(json!({
            "status": "healthy",
            "service": SERVICE_NAME,
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }

    async fn ready(State(resources): State<Arc<ServerResources>>) -> Json<Value> {
        let config = &resources.config;
        Json(json!({
            "status": "ready",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "integrations": {
                "gemini": config.llm.gemini_api_key.is_some(),
                "deepseek": config.llm.deepseek_api_key.is_some(),
                "firebase": config.firebase.is_configured(),
                "gmail": config.gmail.client_id.is_some()
            }
        }))
    }
}
