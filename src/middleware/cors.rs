// ABOUTME: CORS layer for the browser client
// ABOUTME: Origins come from CORS_ALLOWED_ORIGINS; "*" or an empty list allows any origin
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

use http::{header::HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::CorsConfig;

/// Build the CORS layer
///
/// ```bash
/// # Any origin (development)
/// export CORS_ALLOWED_ORIGINS="*"
///
/// # Specific origins (production)
/// export CORS_ALLOWED_ORIGINS="https://ridhi.ai,https://app.ridhi.ai"
/// ```
#[must_use]
pub fn setup_cors(config: &CorsConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allow_origin(&config.allowed_origins))
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("authorization"),
            HeaderName::from_static("x-requested-with"),
            HeaderName::from_static("x-request-id"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
        ])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
            Method::PATCH,
        ])
        .expose_headers([HeaderName::from_static("x-request-id")])
}

fn allow_origin(allowed_origins: &str) -> AllowOrigin {
    if allowed_origins.trim().is_empty() || allowed_origins.trim() == "*" {
        return AllowOrigin::any();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    }
}
