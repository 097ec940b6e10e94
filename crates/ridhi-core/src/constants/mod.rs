// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Fixed prompts, user-facing messages, limits and external endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

//! Constants module
//!
//! The generation parameters and prompt templates here are fixed product
//! behavior; they are not tunable per request.

/// Fixed prompts and prompt templates
pub mod prompts {
    /// System instruction prepended to every DeepSeek request
    pub const RIDHI_SYSTEM_PROMPT: &str = "You are Ridhi, an intelligent AI assistant for students. Be helpful, concise, and educational.";

    /// Default content type for summaries
    pub const DEFAULT_SUMMARY_TYPE: &str = "general";

    /// Build the summarization prompt
    #[must_use]
    pub fn summarize(content: &str, content_type: &str) -> String {
        format!(
            "Summarize the following {content_type} content concisely. Focus on key points and main ideas:\n\n{content}"
        )
    }

    /// Build the question-answering prompt over a document
    #[must_use]
    pub fn extract_information(content: &str, query: &str) -> String {
        format!("Based on the following content, answer this question: {query}\n\nContent:\n{content}")
    }
}

/// Messages returned to clients
pub mod messages {
    /// Orchestrator reply when neither provider answered
    pub const BOTH_PROVIDERS_UNAVAILABLE: &str =
        "Both AI services are currently unavailable. Please try again later.";
    /// Orchestrator reply for unexpected failures
    pub const GENERIC_PROCESSING_ERROR: &str = "An error occurred while processing your request.";
    /// Gemini answered without any text part
    pub const NO_GEMINI_RESPONSE: &str = "No response from Gemini";
    /// DeepSeek answered without message content
    pub const NO_DEEPSEEK_RESPONSE: &str = "No response from DeepSeek";
    /// Upload reply when no summary was produced
    pub const NO_SUMMARY: &str = "No summary available";
    /// Liveness banner
    pub const SERVICE_BANNER: &str = "Ridhi.ai backend running";
    /// Reply to token verification when Firebase is not configured
    pub const FIREBASE_NOT_CONFIGURED: &str =
        "Firebase admin not configured on server. Set FIREBASE_SERVICE_ACCOUNT_JSON in backend env.";
}

/// Generation parameters and request limits
pub mod limits {
    /// Sampling temperature for both providers
    pub const TEMPERATURE: f32 = 0.7;
    /// Gemini top-k
    pub const GEMINI_TOP_K: u32 = 40;
    /// Gemini top-p
    pub const GEMINI_TOP_P: f32 = 0.95;
    /// Output token cap for both providers
    pub const MAX_OUTPUT_TOKENS: u32 = 2048;
    /// Default per-call provider timeout
    pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;
    /// Default number of retries for transient provider errors
    pub const DEFAULT_PROVIDER_MAX_RETRIES: u32 = 1;
    /// Base delay for exponential backoff between provider retries
    pub const PROVIDER_RETRY_BASE_DELAY_MS: u64 = 250;
    /// Maximum chat entries returned by a history read
    pub const HISTORY_LIMIT: usize = 100;
    /// Maximum upload size
    pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
    /// Characters of extracted text kept with file metadata
    pub const EXTRACTED_TEXT_CHARS: usize = 5000;
    /// Default Gmail page size
    pub const DEFAULT_MAIL_RESULTS: u32 = 10;
    /// Firestore rejects commits with more writes than this
    pub const FIRESTORE_MAX_BATCH_WRITES: usize = 500;
}

/// Document store collection names
pub mod collections {
    /// Per-user chat parent documents
    pub const CHATS: &str = "chats";
    /// Chat entries subcollection under `chats/{userId}`
    pub const MESSAGES: &str = "messages";
    /// Uploaded file metadata
    pub const FILES: &str = "files";
    /// Session key payloads keyed by owner
    pub const SESSIONS: &str = "sessions";
}

/// External service endpoints
pub mod endpoints {
    /// Gemini REST base URL
    pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
    /// DeepSeek REST base URL
    pub const DEEPSEEK_API_BASE: &str = "https://api.deepseek.com/v1";
    /// Firestore REST base URL
    pub const FIRESTORE_API_BASE: &str = "https://firestore.googleapis.com/v1";
    /// Cloud Storage JSON API base URL
    pub const STORAGE_API_BASE: &str = "https://storage.googleapis.com/storage/v1";
    /// Cloud Storage upload base URL
    pub const STORAGE_UPLOAD_BASE: &str = "https://storage.googleapis.com/upload/storage/v1";
    /// Public object URL prefix
    pub const STORAGE_PUBLIC_BASE: &str = "https://storage.googleapis.com";
    /// Google OAuth token endpoint
    pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
    /// Google OAuth consent endpoint
    pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
    /// Gmail REST base URL
    pub const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1";
    /// Certificates used to sign Firebase ID tokens
    pub const FIREBASE_CERTS_URL: &str =
        "https://www.googleapis.com/robot/v1/metadata/x509/securetoken@system.gserviceaccount.com";
    /// Issuer prefix of Firebase ID tokens
    pub const FIREBASE_ISSUER_PREFIX: &str = "https://securetoken.google.com/";
}

/// OAuth scopes
pub mod scopes {
    /// Gmail scopes requested on consent
    pub const GMAIL: [&str; 3] = [
        "https://www.googleapis.com/auth/gmail.readonly",
        "https://www.googleapis.com/auth/gmail.send",
        "https://www.googleapis.com/auth/gmail.compose",
    ];
    /// Scopes for the service account used against Firestore and Cloud Storage
    pub const FIREBASE_SERVICE: [&str; 2] = [
        "https://www.googleapis.com/auth/datastore",
        "https://www.googleapis.com/auth/devstorage.full_control",
    ];
}

/// Default model identifiers
pub mod models {
    /// Default Gemini model
    pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
    /// DeepSeek chat model
    pub const DEEPSEEK_MODEL: &str = "deepseek-chat";
}

/// Network ports
pub mod ports {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 4000;
}
