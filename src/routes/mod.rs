// ABOUTME: Route module organization for the Ridhi HTTP API
// ABOUTME: One router per domain, each a thin layer over the service in ServerResources
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

//! Route modules
//!
//! Handlers only parse input, call one service operation and shape the JSON
//! reply. Failures are `AppError`s rendered by its `IntoResponse` impl.

/// Chat message and history routes
pub mod chat;
/// File upload, listing, query and delete routes
pub mod files;
/// Gmail OAuth and mailbox routes
pub mod gmail;
/// Liveness, health and readiness routes
pub mod health;
/// Session key and ID token routes
pub mod sessions;

pub use chat::ChatRoutes;
pub use files::FileRoutes;
pub use gmail::GmailRoutes;
pub use health::HealthRoutes;
pub use sessions::SessionRoutes;

use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;

use crate::errors::AppError;

/// `Json` extractor whose rejections render as the standard error body
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| Self(value))
            .map_err(|rejection| AppError::invalid_input(rejection.body_text()))
    }
}

/// Re-label server-side failures with a route message; client errors pass through unchanged
pub(crate) fn server_failure(message: &'static str) -> impl FnOnce(AppError) -> AppError {
    move |error| {
        if error.http_status() >= 500 {
            error.context(message)
        } else {
            error
        }
    }
}
