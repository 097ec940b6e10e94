// ABOUTME: Uploaded file metadata record
// ABOUTME: Stored in the files collection with at most 5000 characters of extracted text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

use serde::{Deserialize, Serialize};

/// Stored fields of an uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    /// Owner
    pub user_id: String,
    /// Original client-side file name
    pub file_name: String,
    /// Public blob URL
    pub file_url: String,
    /// Object path inside the bucket
    #[serde(default)]
    pub storage_path: String,
    /// MIME type reported by the client
    pub file_type: String,
    /// Size in bytes
    pub file_size: u64,
    /// Free-form grouping, "general" by default
    pub category: String,
    /// Leading slice of the extracted text, empty for non-PDF uploads
    #[serde(default)]
    pub extracted_text: String,
    /// Provider summary of the extracted text, empty when unavailable
    #[serde(default)]
    pub summary: String,
    /// RFC 3339 upload instant
    pub uploaded_at: String,
}

/// File metadata together with its store-generated id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Store-generated identifier
    pub id: String,
    /// Stored fields, flattened into the JSON object
    #[serde(flatten)]
    pub metadata: FileMetadata,
}
