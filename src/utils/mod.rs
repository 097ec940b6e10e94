// ABOUTME: Utility module collecting shared helpers
// ABOUTME: HTTP client construction used by every outbound integration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

/// Shared HTTP client utilities
pub mod http_client;
