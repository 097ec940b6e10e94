// ABOUTME: Shared HTTP client utilities with connection pooling and timeout configuration
// ABOUTME: One pooled reqwest client for provider and Google API calls, plus a short-timeout OAuth client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

use reqwest::{Client, ClientBuilder};
use std::sync::OnceLock;
use std::time::Duration;

/// Global shared HTTP client with default configuration
static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Get or create the shared HTTP client
///
/// The request timeout here is only a backstop; provider calls are bounded
/// more tightly by the adapter's own timeout.
pub fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| create_client_with_timeout(120, 10))
}

/// Create a new HTTP client with custom timeout settings
#[must_use]
pub fn create_client_with_timeout(timeout_secs: u64, connect_timeout_secs: u64) -> Client {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Create a new HTTP client for OAuth token exchanges
#[must_use]
pub fn oauth_client() -> Client {
    create_client_with_timeout(15, 5)
}
