// ABOUTME: Environment-based configuration for the HTTP server and its collaborators
// ABOUTME: Loads provider keys, Firebase credentials, Gmail OAuth client, CORS and upload limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

use anyhow::{Context, Result};
use ridhi_core::constants::{endpoints, limits, models, ports};
use std::env;
use std::time::Duration;
use tracing::{info, warn};

use crate::firebase::ServiceAccountKey;

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Deployment environment name (development, production)
    pub environment: String,
    /// LLM provider settings
    pub llm: LlmConfig,
    /// Firebase project settings
    pub firebase: FirebaseConfig,
    /// Gmail OAuth client settings
    pub gmail: GmailConfig,
    /// Cross-origin settings
    pub cors: CorsConfig,
    /// Upload limits
    pub upload: UploadConfig,
}

/// LLM provider configuration
#[derive(Clone)]
pub struct LlmConfig {
    /// Gemini API key; calls fail soft when absent
    pub gemini_api_key: Option<String>,
    /// Gemini model identifier
    pub gemini_model: String,
    /// Gemini REST base URL
    pub gemini_base_url: String,
    /// DeepSeek API key; calls fail soft when absent
    pub deepseek_api_key: Option<String>,
    /// DeepSeek REST base URL
    pub deepseek_base_url: String,
    /// Upper bound for one provider call
    pub timeout: Duration,
    /// Retries for transient provider errors
    pub max_retries: u32,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field(
                "deepseek_api_key",
                &self.deepseek_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("deepseek_base_url", &self.deepseek_base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Firebase project configuration
#[derive(Debug, Clone, Default)]
pub struct FirebaseConfig {
    /// Project id, from the service account or `FIREBASE_PROJECT_ID`
    pub project_id: Option<String>,
    /// Service account used for Firestore and Cloud Storage
    pub service_account: Option<ServiceAccountKey>,
    /// Cloud Storage bucket name
    pub storage_bucket: Option<String>,
    /// Firestore emulator `host:port`; requests to it are unauthenticated
    pub emulator_host: Option<String>,
}

impl FirebaseConfig {
    /// Whether Firestore and Cloud Storage can be reached
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.project_id.is_some() && (self.service_account.is_some() || self.emulator_host.is_some())
    }
}

/// Gmail OAuth client configuration
#[derive(Clone)]
pub struct GmailConfig {
    /// OAuth client id
    pub client_id: Option<String>,
    /// OAuth client secret
    pub client_secret: Option<String>,
    /// Web client origin used to build the OAuth redirect
    pub frontend_url: String,
    /// Gmail REST base URL
    pub api_base_url: String,
    /// Google OAuth token endpoint
    pub token_url: String,
}

impl GmailConfig {
    /// Redirect registered with the OAuth client
    #[must_use]
    pub fn redirect_uri(&self) -> String {
        format!(
            "{}/api/auth/callback/google",
            self.frontend_url.trim_end_matches('/')
        )
    }
}

impl std::fmt::Debug for GmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GmailConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .field("frontend_url", &self.frontend_url)
            .field("api_base_url", &self.api_base_url)
            .field("token_url", &self.token_url)
            .finish()
    }
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Comma-separated origins, or "*" for any
    pub allowed_origins: String,
}

/// Upload configuration
#[derive(Debug, Clone, Copy)]
pub struct UploadConfig {
    /// Largest accepted file in bytes
    pub max_file_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: ports::DEFAULT_HTTP_PORT,
            environment: "development".into(),
            llm: LlmConfig::default(),
            firebase: FirebaseConfig::default(),
            gmail: GmailConfig::default(),
            cors: CorsConfig::default(),
            upload: UploadConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: models::DEFAULT_GEMINI_MODEL.into(),
            gemini_base_url: endpoints::GEMINI_API_BASE.into(),
            deepseek_api_key: None,
            deepseek_base_url: endpoints::DEEPSEEK_API_BASE.into(),
            timeout: Duration::from_secs(limits::DEFAULT_PROVIDER_TIMEOUT_SECS),
            max_retries: limits::DEFAULT_PROVIDER_MAX_RETRIES,
        }
    }
}

impl Default for GmailConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            frontend_url: "http://localhost:3000".into(),
            api_base_url: endpoints::GMAIL_API_BASE.into(),
            token_url: endpoints::GOOGLE_TOKEN_URL.into(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: "*".into(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: limits::MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse or the Firebase
    /// service account JSON is malformed
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let http_port = env::var("HTTP_PORT")
            .or_else(|_| env::var("PORT"))
            .map_or(Ok(ports::DEFAULT_HTTP_PORT), |port| port.parse())
            .context("HTTP_PORT must be a valid port number")?;

        let config = Self {
            http_port,
            environment: env_var_or("ENVIRONMENT", "development"),
            llm: LlmConfig::from_env()?,
            firebase: FirebaseConfig::from_env()?,
            gmail: GmailConfig::from_env(),
            cors: CorsConfig {
                allowed_origins: env_var_or("CORS_ALLOWED_ORIGINS", "*"),
            },
            upload: UploadConfig {
                max_file_bytes: parse_env("MAX_UPLOAD_BYTES", limits::MAX_UPLOAD_BYTES)?,
            },
        };

        config.validate();
        Ok(config)
    }

    /// Warn about settings that leave features degraded
    fn validate(&self) {
        if self.llm.gemini_api_key.is_none() {
            warn!("GEMINI_API_KEY is not set; Gemini calls will fail");
        }
        if self.llm.deepseek_api_key.is_none() {
            warn!("DEEPSEEK_API_KEY is not set; DeepSeek calls will fail");
        }
        if !self.firebase.is_configured() {
            warn!("Firebase is not configured; chat history, files and sessions are kept in memory");
        }
        if self.gmail.client_id.is_none() || self.gmail.client_secret.is_none() {
            warn!("GOOGLE_CLIENT_ID or GOOGLE_CLIENT_SECRET missing; Gmail routes will fail");
        }
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Ridhi Server Configuration:\n\
             - HTTP Port: {}\n\
             - Environment: {}\n\
             - Gemini: {} (model {})\n\
             - DeepSeek: {}\n\
             - Provider Timeout: {}s, Retries: {}\n\
             - Firebase: {}\n\
             - Gmail OAuth: {}\n\
             - CORS Origins: {}\n\
             - Max Upload: {} bytes",
            self.http_port,
            self.environment,
            enabled(self.llm.gemini_api_key.is_some()),
            self.llm.gemini_model,
            enabled(self.llm.deepseek_api_key.is_some()),
            self.llm.timeout.as_secs(),
            self.llm.max_retries,
            if self.firebase.emulator_host.is_some() {
                "Emulator"
            } else {
                enabled(self.firebase.is_configured())
            },
            enabled(self.gmail.client_id.is_some()),
            self.cors.allowed_origins,
            self.upload.max_file_bytes,
        )
    }
}

impl LlmConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
            gemini_model: env_var_or("GEMINI_MODEL", models::DEFAULT_GEMINI_MODEL),
            gemini_base_url: env_var_or("GEMINI_API_BASE", endpoints::GEMINI_API_BASE),
            deepseek_api_key: non_empty_var("DEEPSEEK_API_KEY"),
            deepseek_base_url: env_var_or("DEEPSEEK_API_BASE", endpoints::DEEPSEEK_API_BASE),
            timeout: Duration::from_secs(parse_env(
                "PROVIDER_TIMEOUT_SECS",
                limits::DEFAULT_PROVIDER_TIMEOUT_SECS,
            )?),
            max_retries: parse_env("PROVIDER_MAX_RETRIES", limits::DEFAULT_PROVIDER_MAX_RETRIES)?,
        })
    }
}

impl FirebaseConfig {
    fn from_env() -> Result<Self> {
        let service_account = match non_empty_var("FIREBASE_SERVICE_ACCOUNT_JSON") {
            Some(json) => Some(
                ServiceAccountKey::from_json(&json)
                    .context("FIREBASE_SERVICE_ACCOUNT_JSON is not a valid service account")?,
            ),
            None => ServiceAccountKey::from_parts(
                non_empty_var("FIREBASE_PROJECT_ID"),
                non_empty_var("FIREBASE_CLIENT_EMAIL"),
                non_empty_var("FIREBASE_PRIVATE_KEY"),
            ),
        };

        let project_id = non_empty_var("FIREBASE_PROJECT_ID")
            .or_else(|| service_account.as_ref().map(|key| key.project_id.clone()));

        let storage_bucket = non_empty_var("FIREBASE_STORAGE_BUCKET")
            .or_else(|| project_id.as_ref().map(|id| format!("{id}.appspot.com")));

        Ok(Self {
            project_id,
            service_account,
            storage_bucket,
            emulator_host: non_empty_var("FIRESTORE_EMULATOR_HOST"),
        })
    }
}

impl GmailConfig {
    fn from_env() -> Self {
        Self {
            client_id: non_empty_var("GOOGLE_CLIENT_ID"),
            client_secret: non_empty_var("GOOGLE_CLIENT_SECRET"),
            frontend_url: env_var_or("FRONTEND_URL", "http://localhost:3000"),
            api_base_url: env_var_or("GMAIL_API_BASE", endpoints::GMAIL_API_BASE),
            token_url: env_var_or("GOOGLE_TOKEN_URL", endpoints::GOOGLE_TOKEN_URL),
        }
    }
}

const fn enabled(flag: bool) -> &'static str {
    if flag {
        "Enabled"
    } else {
        "Disabled"
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Get environment variable, treating empty values as unset
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse a numeric environment variable with a default
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    non_empty_var(key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {value}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_vars() {
        for key in [
            "HTTP_PORT",
            "PORT",
            "PROVIDER_TIMEOUT_SECS",
            "PROVIDER_MAX_RETRIES",
            "FIREBASE_SERVICE_ACCOUNT_JSON",
            "FIREBASE_PROJECT_ID",
            "FIREBASE_CLIENT_EMAIL",
            "FIREBASE_PRIVATE_KEY",
            "FIREBASE_STORAGE_BUCKET",
            "FIRESTORE_EMULATOR_HOST",
            "FRONTEND_URL",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_vars();
        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.http_port, ports::DEFAULT_HTTP_PORT);
        assert_eq!(config.llm.timeout, Duration::from_secs(30));
        assert_eq!(config.llm.max_retries, 1);
        assert!(!config.firebase.is_configured());
        assert_eq!(config.upload.max_file_bytes, 10 * 1024 * 1024);
    }

    #[test]
    #[serial]
    fn test_port_and_timeout_overrides() {
        clear_vars();
        env::set_var("PORT", "5050");
        env::set_var("PROVIDER_TIMEOUT_SECS", "5");
        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.http_port, 5050);
        assert_eq!(config.llm.timeout, Duration::from_secs(5));
        clear_vars();
    }

    #[test]
    #[serial]
    fn test_invalid_timeout_is_rejected() {
        clear_vars();
        env::set_var("PROVIDER_TIMEOUT_SECS", "soon");
        assert!(ServerConfig::from_env().is_err());
        clear_vars();
    }

    #[test]
    #[serial]
    fn test_emulator_counts_as_configured() {
        clear_vars();
        env::set_var("FIREBASE_PROJECT_ID", "ridhi-dev");
        env::set_var("FIRESTORE_EMULATOR_HOST", "localhost:8080");
        let config = ServerConfig::from_env().unwrap();
        assert!(config.firebase.is_configured());
        assert_eq!(
            config.firebase.storage_bucket.as_deref(),
            Some("ridhi-dev.appspot.com")
        );
        clear_vars();
    }

    #[test]
    #[serial]
    fn test_redirect_uri() {
        clear_vars();
        env::set_var("FRONTEND_URL", "https://ridhi.ai/");
        let config = ServerConfig::from_env().unwrap();
        assert_eq!(
            config.gmail.redirect_uri(),
            "https://ridhi.ai/api/auth/callback/google"
        );
        clear_vars();
    }
}
