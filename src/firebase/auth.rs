// ABOUTME: Firebase ID token verification against Google's rotating x509 signing certificates
// ABOUTME: Caches public keys per Cache-Control max-age and checks RS256 signature, audience and issuer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

//! Firebase ID token verification
//!
//! - Certificates come from Google's securetoken x509 endpoint, keyed by `kid`
//! - Keys are cached for the response's `max-age` (at least five minutes)
//! - Tokens must be RS256, unexpired, with `aud` = project id and
//!   `iss` = `https://securetoken.google.com/<project id>`

use std::collections::HashMap;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use ridhi_core::constants::endpoints;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use x509_parser::prelude::*;

use crate::errors::{AppError, AppResult};
use crate::utils::http_client::oauth_client;

const MIN_CACHE_TTL_SECS: i64 = 300;

const DEFAULT_CACHE_TTL_SECS: i64 = 3600;

struct CachedKeys {
    /// kid -> PEM public key
    keys: HashMap<String, String>,
    expires_at: DateTime<Utc>,
}

/// Verified Firebase ID token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirebaseClaims {
    /// Issuer
    pub iss: String,
    /// Audience (project id)
    pub aud: String,
    /// Firebase user id
    pub sub: String,
    /// Issued at
    pub iat: i64,
    /// Expiry
    pub exp: i64,
    /// Last sign-in time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_time: Option<i64>,
    /// User email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Whether the email is verified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Profile picture URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Firebase-specific claims
    #[serde(default)]
    pub firebase: FirebaseSpecificClaims,
}

impl FirebaseClaims {
    /// The Firebase user id
    #[must_use]
    pub fn uid(&self) -> &str {
        &self.sub
    }

    /// `firebase.sign_in_provider`, "unknown" when absent
    #[must_use]
    pub fn provider(&self) -> &str {
        self.firebase
            .sign_in_provider
            .as_deref()
            .unwrap_or("unknown")
    }
}

/// The `firebase` claim object
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FirebaseSpecificClaims {
    /// e.g. "google.com", "password"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_in_provider: Option<String>,
    /// Linked identities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identities: Option<HashMap<String, Value>>,
}

/// Verifies Firebase ID tokens for one project
pub struct FirebaseAuth {
    project_id: Option<String>,
    certs_url: String,
    http_client: Client,
    cached_keys: Arc<RwLock<Option<CachedKeys>>>,
}

impl FirebaseAuth {
    /// Verifier for `project_id`; `None` leaves verification disabled
    #[must_use]
    pub fn new(project_id: Option<String>) -> Self {
        Self {
            project_id,
            certs_url: endpoints::FIREBASE_CERTS_URL.to_owned(),
            http_client: oauth_client(),
            cached_keys: Arc::new(RwLock::new(None)),
        }
    }

    /// Fetch certificates from a different endpoint
    #[must_use]
    pub fn with_certs_url(mut self, url: impl Into<String>) -> Self {
        self.certs_url = url.into();
        self
    }

    /// Whether a project id is available to verify against
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.project_id.is_some()
    }

    /// Project id tokens must be issued for
    #[must_use]
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Verify an ID token and return its claims
    ///
    /// # Errors
    ///
    /// Returns a config error when disabled, `AuthExpired` for expired tokens
    /// and `AuthInvalid` for anything else that fails verification
    pub async fn verify_token(&self, token: &str) -> AppResult<FirebaseClaims> {
        let project_id = self
            .project_id
            .as_deref()
            .ok_or_else(|| AppError::config("Firebase authentication is not configured"))?;

        let header = decode_header(token).map_err(|e| {
            debug!(error = %e, "Failed to decode Firebase token header");
            AppError::auth_invalid("Invalid token format")
        })?;
        if header.alg != Algorithm::RS256 {
            return Err(AppError::auth_invalid("Unexpected token algorithm"));
        }
        let kid = header
            .kid
            .ok_or_else(|| AppError::auth_invalid("Token missing key ID"))?;

        let pem_key = self.public_key(&kid).await?;
        let decoding_key = DecodingKey::from_rsa_pem(pem_key.as_bytes()).map_err(|e| {
            warn!(error = %e, kid = %kid, "Failed to create decoding key from PEM");
            AppError::internal(format!("Invalid public key: {e}"))
        })?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[project_id]);
        validation.set_issuer(&[format!("{}{project_id}", endpoints::FIREBASE_ISSUER_PREFIX)]);

        let claims = decode::<FirebaseClaims>(token, &decoding_key, &validation)
            .map_err(|e| {
                debug!(error = %e, "Firebase token validation failed");
                match e.kind() {
                    ErrorKind::ExpiredSignature => AppError::auth_expired(),
                    ErrorKind::InvalidAudience => AppError::auth_invalid("Invalid token audience"),
                    ErrorKind::InvalidIssuer => AppError::auth_invalid("Invalid token issuer"),
                    _ => AppError::auth_invalid("Invalid token"),
                }
            })?
            .claims;

        if claims.sub.is_empty() {
            return Err(AppError::auth_invalid("Token has an empty subject"));
        }

        info!(user.id = %claims.sub, provider = %claims.provider(), "Firebase token verified");
        Ok(claims)
    }

    async fn public_key(&self, kid: &str) -> AppResult<String> {
        if let Some(key) = self.cached_key(kid).await {
            return Ok(key);
        }

        // Unknown kid or stale cache: Google may have rotated keys
        self.refresh_keys().await?;

        let cache = self.cached_keys.read().await;
        cache
            .as_ref()
            .and_then(|cached| cached.keys.get(kid).cloned())
            .ok_or_else(|| {
                debug!(kid = %kid, "No Firebase public key for kid");
                AppError::auth_invalid("Unknown token signing key")
            })
    }

    async fn cached_key(&self, kid: &str) -> Option<String> {
        let cache = self.cached_keys.read().await;
        cache
            .as_ref()
            .filter(|cached| cached.expires_at > Utc::now())
            .and_then(|cached| cached.keys.get(kid).cloned())
    }

    async fn refresh_keys(&self) -> AppResult<()> {
        debug!(url = %self.certs_url, "Fetching Firebase signing certificates");

        let response = self
            .http_client
            .get(&self.certs_url)
            .send()
            .await
            .map_err(|e| AppError::external_unavailable("Firebase certificates", e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::from_upstream_status(
                "Firebase certificates",
                response.status().as_u16(),
                "certificate fetch rejected",
            ));
        }

        let cache_ttl = response
            .headers()
            .get(reqwest::header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_max_age)
            .unwrap_or(DEFAULT_CACHE_TTL_SECS)
            .max(MIN_CACHE_TTL_SECS);

        let certs: HashMap<String, String> = response.json().await.map_err(|e| {
            AppError::external_service("Firebase certificates", format!("invalid body: {e}"))
        })?;
        let keys = convert_certs_to_keys(certs)?;
        let expires_at = Utc::now() + Duration::seconds(cache_ttl);

        info!(num_keys = keys.len(), cache_ttl_secs = cache_ttl, "Firebase public keys cached");

        *self.cached_keys.write().await = Some(CachedKeys { keys, expires_at });
        Ok(())
    }
}

impl std::fmt::Debug for FirebaseAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseAuth")
            .field("project_id", &self.project_id)
            .field("certs_url", &self.certs_url)
            .finish_non_exhaustive()
    }
}

fn convert_certs_to_keys(certs: HashMap<String, String>) -> AppResult<HashMap<String, String>> {
    let keys: HashMap<String, String> = certs
        .into_iter()
        .filter_map(|(kid, cert_pem)| match extract_public_key_from_cert(&cert_pem) {
            Ok(public_key) => Some((kid, public_key)),
            Err(e) => {
                warn!(kid = %kid, error = %e, "Skipping unusable Firebase certificate");
                None
            }
        })
        .collect();

    if keys.is_empty() {
        return Err(AppError::external_service(
            "Firebase certificates",
            "no usable signing keys",
        ));
    }
    Ok(keys)
}

/// "public, max-age=3600, must-revalidate" -> 3600
fn parse_max_age(cache_control: &str) -> Option<i64> {
    cache_control
        .split(',')
        .map(str::trim)
        .find_map(|directive| directive.strip_prefix("max-age="))
        .and_then(|secs| secs.parse().ok())
}

/// PEM SubjectPublicKeyInfo of an x509 certificate
fn extract_public_key_from_cert(cert_pem: &str) -> AppResult<String> {
    let (_, pem) = parse_x509_pem(cert_pem.as_bytes())
        .map_err(|e| AppError::internal(format!("Failed to parse X.509 PEM: {e}")))?;
    let (_, cert) = X509Certificate::from_der(&pem.contents)
        .map_err(|e| AppError::internal(format!("Failed to parse X.509 certificate: {e}")))?;

    let encoded = STANDARD.encode(cert.public_key().raw);
    let body = encoded
        .as_bytes()
        .chunks(64)
        .map(String::from_utf8_lossy)
        .collect::<Vec<_>>()
        .join("\n");

    Ok(format!(
        "-----BEGIN PUBLIC KEY-----\n{body}\n-----END PUBLIC KEY-----"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_parse_max_age() {
        assert_eq!(parse_max_age("public, max-age=19302, must-revalidate"), Some(19302));
        assert_eq!(parse_max_age("no-cache"), None);
        assert_eq!(parse_max_age("max-age=abc"), None);
    }

    #[tokio::test]
    async fn test_disabled_verifier_reports_config_error() {
        let auth = FirebaseAuth::new(None);
        assert!(!auth.is_enabled());
        let error = auth.verify_token("anything").await.unwrap_err();
        assert_eq!(error.code, ErrorCode::ConfigError);
    }

    #[tokio::test]
    async fn test_garbage_token_is_invalid() {
        let auth = FirebaseAuth::new(Some("ridhi-dev".into()));
        let error = auth.verify_token("not-a-jwt").await.unwrap_err();
        assert_eq!(error.code, ErrorCode::AuthInvalid);
    }

    #[test]
    fn test_bad_certificates_are_rejected() {
        assert!(extract_public_key_from_cert("not a certificate").is_err());
        let certs = HashMap::from([("kid1".to_owned(), "garbage".to_owned())]);
        assert!(convert_certs_to_keys(certs).is_err());
    }

    #[test]
    fn test_provider_defaults_to_unknown() {
        let claims: FirebaseClaims = serde_json::from_value(serde_json::json!({
            "iss": "https://securetoken.google.com/p",
            "aud": "p",
            "sub": "uid-1",
            "iat": 1,
            "exp": 2
        }))
        .unwrap();
        assert_eq!(claims.uid(), "uid-1");
        assert_eq!(claims.provider(), "unknown");
    }
}
