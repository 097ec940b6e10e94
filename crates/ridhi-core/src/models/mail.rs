// ABOUTME: Gmail message views and OAuth token payload
// ABOUTME: Header defaults mirror what the web client expects for missing headers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

use serde::{Deserialize, Serialize};

/// One row of a mailbox listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailSummary {
    /// Gmail message id
    pub id: String,
    /// Subject header or "No Subject"
    pub subject: String,
    /// From header or "Unknown"
    pub from: String,
    /// Date header or empty
    pub date: String,
    /// Gmail-provided snippet
    pub snippet: String,
}

/// A fully read message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    /// Gmail message id
    pub id: String,
    /// Subject header or "No Subject"
    pub subject: String,
    /// From header or "Unknown"
    pub from: String,
    /// Date header or empty
    pub date: String,
    /// Decoded plain-text body, empty when none was found
    pub body: String,
    /// Gmail-provided snippet
    pub snippet: String,
}

/// Tokens returned by the Google OAuth code exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthTokens {
    /// Bearer token for Gmail API calls
    pub access_token: String,
    /// Long-lived token, present because consent is always prompted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Granted scopes, space separated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Usually "Bearer"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// OpenID token when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    /// Lifetime in seconds as reported by Google
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    /// Absolute expiry in epoch milliseconds, computed at exchange time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<i64>,
}
