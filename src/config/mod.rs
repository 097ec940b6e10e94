// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Re-exports the environment-driven ServerConfig and its sub-configurations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

//! Configuration module for the Ridhi server
//!
//! All configuration comes from environment variables (optionally seeded from
//! a `.env` file by the binary). There are no configuration files.

/// Environment and server configuration
pub mod environment;

pub use environment::{
    CorsConfig, FirebaseConfig, GmailConfig, LlmConfig, ServerConfig, UploadConfig,
};
