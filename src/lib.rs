// ABOUTME: Main library entry point for the Ridhi student assistant API
// ABOUTME: Dual-provider chat orchestration, weekly chat history, file summaries, Gmail and sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

#![recursion_limit = "256"]
#![deny(unsafe_code)]

//! # Ridhi Server
//!
//! HTTP backend for the Ridhi student assistant.
//!
//! ## Features
//!
//! - **Dual-provider chat**: Gemini and DeepSeek are queried concurrently and
//!   one answer is chosen by a keyword classifier
//! - **Weekly history**: chat exchanges are stored per user and grouped by a
//!   "Week N Month" label
//! - **Study material**: uploads go to blob storage; PDFs are extracted,
//!   summarized and can be queried
//! - **Gmail**: OAuth consent, code exchange, list, read and send
//! - **Sessions**: opaque per-owner key storage and Firebase ID token checks
//!
//! ## Architecture
//!
//! - **`llm`**: provider adapters behind the `LlmProvider` trait
//! - **`orchestrator`**: fan-out, classification and answer selection
//! - **`store`**, **`files`**, **`sessions`**: services over repository traits
//!   with Firestore and in-memory implementations
//! - **`firebase`**: Firestore REST, Cloud Storage and token verification
//! - **`routes`** / **`server`**: the axum HTTP surface
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ridhi_server::config::ServerConfig;
//! use ridhi_server::resources::ServerResources;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let port = config.http_port;
//!     let resources = Arc::new(ServerResources::from_config(config)?);
//!     ridhi_server::server::run(resources, port).await?;
//!     Ok(())
//! }
//! ```

/// Injectable wall clock
pub mod clock;

/// Environment-driven configuration
pub mod config;

/// Unified error types
pub mod errors;

/// Upload pipeline and file metadata
pub mod files;

/// Firestore, Cloud Storage and Firebase Auth clients
pub mod firebase;

/// Gmail OAuth and mailbox client
pub mod gmail;

/// LLM provider adapters
pub mod llm;

/// Structured logging setup
pub mod logging;

/// HTTP middleware (CORS, request ids, tracing)
pub mod middleware;

/// Dual-provider orchestration
pub mod orchestrator;

/// Shared server resources
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// Router assembly and serving
pub mod server;

/// Session key storage
pub mod sessions;

/// Week-partitioned chat history
pub mod store;

/// Shared helpers
pub mod utils;
