// ABOUTME: Gmail integration: OAuth consent URL, authorization code exchange and mailbox operations
// ABOUTME: Thin reqwest client over the Gmail REST API authorized with a caller-supplied access token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

mod message;

pub use message::encode_raw_message;

use chrono::Utc;
use futures_util::future::try_join_all;
use reqwest::{Client, RequestBuilder, Response};
use ridhi_core::constants::{endpoints, limits, scopes};
use ridhi_core::models::{MailMessage, MailSummary, OAuthTokens};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, instrument, warn};
use url::Url;

use self::message::{GmailMessage, MessageList};
use crate::config::GmailConfig;
use crate::errors::{AppError, AppResult};
use crate::utils::http_client::{oauth_client, shared_client};

/// Query used when the caller sends none
pub const DEFAULT_QUERY: &str = "is:unread";

const SERVICE: &str = "Gmail";

/// Gmail OAuth and mailbox client
#[derive(Clone)]
pub struct GmailClient {
    config: GmailConfig,
    http_client: Client,
    oauth_http_client: Client,
}

impl GmailClient {
    /// Client for the configured OAuth application
    #[must_use]
    pub fn new(config: GmailConfig) -> Self {
        Self {
            config,
            http_client: shared_client().clone(),
            oauth_http_client: oauth_client(),
        }
    }

    fn client_credentials(&self) -> AppResult<(&str, &str)> {
        match (
            self.config.client_id.as_deref(),
            self.config.client_secret.as_deref(),
        ) {
            (Some(id), Some(secret)) => Ok((id, secret)),
            _ => Err(AppError::config(
                "Gmail OAuth client is not configured (GOOGLE_CLIENT_ID / GOOGLE_CLIENT_SECRET)",
            )),
        }
    }

    /// Consent URL requesting offline access to the Gmail scopes
    ///
    /// # Errors
    ///
    /// Returns a config error when no OAuth client id is configured
    pub fn auth_url(&self) -> AppResult<String> {
        let client_id = self
            .config
            .client_id
            .as_deref()
            .ok_or_else(|| AppError::config("Gmail OAuth client is not configured"))?;

        let mut url = Url::parse(endpoints::GOOGLE_AUTH_URL)
            .map_err(|e| AppError::config(format!("Invalid Google auth URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("access_type", "offline")
            .append_pair("scope", &scopes::GMAIL.join(" "))
            .append_pair("prompt", "consent")
            .append_pair("response_type", "code")
            .append_pair("client_id", client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri());
        Ok(url.into())
    }

    /// Exchange an authorization code for tokens
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty code and an external-service
    /// error if Google rejects the exchange
    #[instrument(skip_all)]
    pub async fn exchange_code(&self, code: &str) -> AppResult<OAuthTokens> {
        if code.trim().is_empty() {
            return Err(AppError::missing_field("code is required"));
        }
        let (client_id, client_secret) = self.client_credentials()?;
        let redirect_uri = self.config.redirect_uri();

        let response = self
            .oauth_http_client
            .post(&self.config.token_url)
            .form(&[
                ("code", code),
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("redirect_uri", redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(AppError::from)?;

        let mut tokens: OAuthTokens = read_json(response, "Google OAuth").await?;
        tokens.expiry_date = tokens
            .expires_in
            .map(|secs| Utc::now().timestamp_millis() + secs * 1000);

        info!(has_refresh_token = tokens.refresh_token.is_some(), "Gmail tokens exchanged");
        Ok(tokens)
    }

    fn get(&self, access_token: &str, path: &str) -> RequestBuilder {
        self.http_client
            .get(format!("{}/users/me/{path}", self.config.api_base_url))
            .bearer_auth(access_token)
    }

    async fn fetch_full(&self, access_token: &str, id: &str) -> AppResult<GmailMessage> {
        let response = self
            .get(access_token, &format!("messages/{}", urlencoding::encode(id)))
            .query(&[("format", "full")])
            .send()
            .await
            .map_err(AppError::from)?;
        read_json(response, SERVICE).await
    }

    /// List messages matching `query` ("is:unread" when empty) with headers resolved
    ///
    /// # Errors
    ///
    /// Returns a validation error without an access token, or an external-service
    /// error if listing or any detail fetch fails
    #[instrument(skip(self, access_token))]
    pub async fn list(
        &self,
        access_token: &str,
        max_results: Option<u32>,
        query: Option<&str>,
    ) -> AppResult<Vec<MailSummary>> {
        if access_token.trim().is_empty() {
            return Err(AppError::missing_field("Access token is required"));
        }
        let max_results = max_results.unwrap_or(limits::DEFAULT_MAIL_RESULTS);
        let query = query.filter(|q| !q.trim().is_empty()).unwrap_or(DEFAULT_QUERY);

        let response = self
            .get(access_token, "messages")
            .query(&[("maxResults", max_results.to_string().as_str()), ("q", query)])
            .send()
            .await
            .map_err(AppError::from)?;
        let listing: MessageList = read_json(response, SERVICE).await?;

        debug!(count = listing.messages.len(), "Fetching Gmail message details");

        try_join_all(listing.messages.into_iter().map(|reference| async move {
            let details = self.fetch_full(access_token, &reference.id).await?;
            Ok::<_, AppError>(details.into_summary(reference.id))
        }))
        .await
    }

    /// Read one message with its plain-text body
    ///
    /// # Errors
    ///
    /// Returns a validation error for missing input, or an external-service
    /// error if the fetch fails
    #[instrument(skip(self, access_token))]
    pub async fn read(&self, access_token: &str, message_id: &str) -> AppResult<MailMessage> {
        if access_token.trim().is_empty() || message_id.trim().is_empty() {
            return Err(AppError::missing_field(
                "Access token and messageId are required",
            ));
        }
        let message = self.fetch_full(access_token, message_id).await?;
        Ok(message.into_message(message_id.to_owned()))
    }

    /// Send a plain-text message; returns the new message id
    ///
    /// # Errors
    ///
    /// Returns a validation error unless every field is non-empty, or an
    /// external-service error if Gmail rejects the message
    #[instrument(skip(self, access_token, subject, body))]
    pub async fn send(
        &self,
        access_token: &str,
        to: &str,
        subject: &str,
        body: &str,
    ) -> AppResult<String> {
        if [access_token, to, subject, body]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(AppError::missing_field("All fields are required"));
        }

        let response = self
            .http_client
            .post(format!("{}/users/me/messages/send", self.config.api_base_url))
            .bearer_auth(access_token)
            .json(&json!({ "raw": encode_raw_message(to, subject, body) }))
            .send()
            .await
            .map_err(AppError::from)?;

        let sent: serde_json::Value = read_json(response, SERVICE).await?;
        let id = sent
            .get("id")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_owned();
        info!(message.id = %id, "Email sent");
        Ok(id)
    }
}

impl std::fmt::Debug for GmailClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GmailClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

async fn read_json<T: DeserializeOwned>(response: Response, service: &str) -> AppResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(service, status = %status, "Google API request rejected");
        return Err(AppError::from_upstream_status(service, status.as_u16(), &body));
    }
    response
        .json()
        .await
        .map_err(|e| AppError::external_service(service, format!("invalid response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GmailConfig {
        GmailConfig {
            client_id: Some("client-123".into()),
            client_secret: Some("secret".into()),
            frontend_url: "http://localhost:3000".into(),
            api_base_url: endpoints::GMAIL_API_BASE.into(),
            token_url: endpoints::GOOGLE_TOKEN_URL.into(),
        }
    }

    #[test]
    fn test_auth_url_requests_offline_consent() {
        let url = Url::parse(&GmailClient::new(config()).auth_url().unwrap()).unwrap();
        let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(params["access_type"], "offline");
        assert_eq!(params["prompt"], "consent");
        assert_eq!(params["client_id"], "client-123");
        assert_eq!(
            params["redirect_uri"],
            "http://localhost:3000/api/auth/callback/google"
        );
        assert!(params["scope"].contains("gmail.readonly"));
        assert!(params["scope"].contains("gmail.send"));
        assert!(params["scope"].contains("gmail.compose"));
    }

    #[test]
    fn test_auth_url_requires_client_id() {
        let client = GmailClient::new(GmailConfig {
            client_id: None,
            ..config()
        });
        assert!(client.auth_url().is_err());
    }

    #[tokio::test]
    async fn test_missing_fields_are_rejected_before_any_request() {
        let client = GmailClient::new(config());
        let error = client.list("", None, None).await.unwrap_err();
        assert_eq!(error.message, "Access token is required");
        let error = client.read("token", " ").await.unwrap_err();
        assert_eq!(error.message, "Access token and messageId are required");
        let error = client.send("token", "a@b.c", "", "body").await.unwrap_err();
        assert_eq!(error.message, "All fields are required");
    }
}
