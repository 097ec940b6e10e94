// ABOUTME: Content extraction pipeline for uploaded study material
// ABOUTME: Upload to blob storage, PDF text extraction, provider summary, metadata persistence and Q&A
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

//! # Files
//!
//! An upload is written to the blob store under
//! `{userId}/{epochMillis}_{originalName}` and made public. PDFs are
//! additionally run through text extraction and summarized by provider A;
//! extraction or summary failures are logged and the upload still succeeds.
//! Only the first 5000 characters of extracted text are persisted.

mod blob;
mod extract;
mod repository;

pub use blob::{BlobStore, BlobUpload, InMemoryBlobStore, StoredBlob};
pub use extract::{PdfTextExtractor, StaticTextExtractor, TextExtractor, PDF_MIME_TYPE};
pub use repository::{FileRepository, FirestoreFileRepository, InMemoryFileRepository};

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use chrono::SecondsFormat;
use ridhi_core::constants::limits;
use ridhi_core::models::{FileMetadata, FileRecord};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::clock::Clock;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::orchestrator::Orchestrator;

/// Category used when the client sends none
pub const DEFAULT_CATEGORY: &str = "general";

/// An incoming file
#[derive(Debug, Clone)]
pub struct NewUpload {
    /// Owner
    pub user_id: String,
    /// Grouping; "general" when absent or blank
    pub category: Option<String>,
    /// Original client-side name
    pub file_name: String,
    /// MIME type reported by the client
    pub content_type: String,
    /// Content
    pub bytes: Bytes,
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    /// Metadata id
    pub file_id: String,
    /// Public URL
    pub file_url: String,
    /// Original name
    pub file_name: String,
    /// Summary, or "No summary available"
    pub summary: String,
    /// Whether any text was extracted
    pub has_text: bool,
}

/// Answer to a question about one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAnswer {
    /// The orchestrated answer text
    pub answer: String,
    /// Name of the file that was queried
    pub file_name: String,
}

/// Upload, list, query and delete operations on user files
#[derive(Clone)]
pub struct FileService {
    blobs: Arc<dyn BlobStore>,
    repository: Arc<dyn FileRepository>,
    extractor: Arc<dyn TextExtractor>,
    orchestrator: Orchestrator,
    clock: Arc<dyn Clock>,
    max_file_bytes: usize,
}

impl FileService {
    /// Assemble the pipeline
    #[must_use]
    pub fn new(
        blobs: Arc<dyn BlobStore>,
        repository: Arc<dyn FileRepository>,
        extractor: Arc<dyn TextExtractor>,
        orchestrator: Orchestrator,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            blobs,
            repository,
            extractor,
            orchestrator,
            clock,
            max_file_bytes: limits::MAX_UPLOAD_BYTES,
        }
    }

    /// Override the per-file size limit
    #[must_use]
    pub const fn with_max_file_bytes(mut self, max_file_bytes: usize) -> Self {
        self.max_file_bytes = max_file_bytes;
        self
    }

    /// Largest accepted file
    #[must_use]
    pub const fn max_file_bytes(&self) -> usize {
        self.max_file_bytes
    }

    /// Store a file, extract and summarize PDFs, persist metadata
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing owner or an oversized file,
    /// and a storage/database error if the blob or metadata write fails
    #[instrument(skip(self, upload), fields(user.id = %upload.user_id, file.size = upload.bytes.len()))]
    pub async fn upload(&self, upload: NewUpload) -> AppResult<UploadReceipt> {
        if upload.user_id.trim().is_empty() {
            return Err(AppError::missing_field("userId is required"));
        }
        if upload.bytes.len() > self.max_file_bytes {
            return Err(AppError::new(
                ErrorCode::ValueOutOfRange,
                format!("File exceeds the {} byte limit", self.max_file_bytes),
            ));
        }

        let category = upload
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned());
        let now = self.clock.now();
        let uploaded_at = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        let storage_path = format!(
            "{}/{}_{}",
            upload.user_id,
            now.timestamp_millis(),
            upload.file_name
        );
        let file_size = upload.bytes.len() as u64;

        self.blobs
            .put(BlobUpload {
                path: storage_path.clone(),
                bytes: upload.bytes.clone(),
                content_type: upload.content_type.clone(),
                metadata: HashMap::from([
                    ("userId".to_owned(), upload.user_id.clone()),
                    ("category".to_owned(), category.clone()),
                    ("uploadedAt".to_owned(), uploaded_at.clone()),
                ]),
            })
            .await?;
        self.blobs.make_public(&storage_path).await?;
        let file_url = self.blobs.public_url(&storage_path);

        let (extracted_text, summary) = if upload.content_type == PDF_MIME_TYPE {
            self.extract_and_summarize(upload.bytes, &category).await
        } else {
            (String::new(), String::new())
        };
        let has_text = !extracted_text.is_empty();

        let record = self
            .repository
            .insert(FileMetadata {
                user_id: upload.user_id,
                file_name: upload.file_name.clone(),
                file_url: file_url.clone(),
                storage_path,
                file_type: upload.content_type,
                file_size,
                category,
                extracted_text: extracted_text
                    .chars()
                    .take(limits::EXTRACTED_TEXT_CHARS)
                    .collect(),
                summary: summary.clone(),
                uploaded_at,
            })
            .await?;

        info!(file.id = %record.id, has_text, "File uploaded");

        Ok(UploadReceipt {
            file_id: record.id,
            file_url,
            file_name: upload.file_name,
            summary: if summary.is_empty() {
                ridhi_core::constants::messages::NO_SUMMARY.to_owned()
            } else {
                summary
            },
            has_text,
        })
    }

    /// Full extracted text and provider summary; failures degrade to empty strings
    async fn extract_and_summarize(&self, bytes: Bytes, category: &str) -> (String, String) {
        let text = match self.extractor.extract(bytes).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "PDF text extraction failed");
                return (String::new(), String::new());
            }
        };

        let summary = self.orchestrator.summarize(&text, Some(category)).await;
        if let Some(error) = summary.error() {
            warn!(error, "PDF summary unavailable");
        }
        (text, summary.into_text())
    }

    /// A user's files, newest first
    ///
    /// # Errors
    ///
    /// Returns a database error if the read fails
    pub async fn list(&self, user_id: &str, category: Option<&str>) -> AppResult<Vec<FileRecord>> {
        self.repository
            .list(user_id, category.filter(|c| !c.trim().is_empty()))
            .await
    }

    /// One file's metadata
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when there is no such file
    pub async fn get(&self, file_id: &str) -> AppResult<FileRecord> {
        self.repository
            .get(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File"))
    }

    /// Answer a question from a file's extracted text
    ///
    /// # Errors
    ///
    /// Returns a validation error for missing input or a file without text,
    /// and `ResourceNotFound` when there is no such file
    #[instrument(skip(self, question))]
    pub async fn query(&self, file_id: &str, question: &str) -> AppResult<FileAnswer> {
        if file_id.trim().is_empty() || question.trim().is_empty() {
            return Err(AppError::missing_field("fileId and query are required"));
        }

        let file = self.get(file_id).await?;
        if file.metadata.extracted_text.is_empty() {
            return Err(AppError::invalid_input(
                "No text content available in this file",
            ));
        }

        let response = self
            .orchestrator
            .extract_information(&file.metadata.extracted_text, question)
            .await;

        Ok(FileAnswer {
            answer: response.text,
            file_name: file.metadata.file_name,
        })
    }

    /// Delete the blob, then the metadata
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when there is no such file, or a storage /
    /// database error if a delete fails
    #[instrument(skip(self))]
    pub async fn delete(&self, file_id: &str) -> AppResult<()> {
        let file = self.get(file_id).await?;
        let path = blob_path(&file.metadata);

        match self.blobs.delete(&path).await {
            Ok(()) => {}
            // Metadata for an already-missing blob must still be removable
            Err(e) if e.code == ErrorCode::ResourceNotFound => {
                warn!(path = %path, "Blob already gone, removing metadata only");
            }
            Err(e) => return Err(e),
        }

        self.repository.delete(file_id).await?;
        info!(file.id = %file_id, "File deleted");
        Ok(())
    }
}

impl std::fmt::Debug for FileService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileService")
            .field("max_file_bytes", &self.max_file_bytes)
            .finish_non_exhaustive()
    }
}

/// Object path of a stored file; records written without `storagePath` fall back to the URL's last segment
fn blob_path(metadata: &FileMetadata) -> String {
    if !metadata.storage_path.is_empty() {
        return metadata.storage_path.clone();
    }
    let object = metadata.file_url.rsplit('/').next().unwrap_or_default();
    format!("{}/{object}", metadata.user_id)
}
