// ABOUTME: Blob store abstraction for uploaded files plus an in-memory implementation
// ABOUTME: Objects are written, made publicly readable, addressed by public URL and deleted by path
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::errors::{AppError, AppResult};

/// An object to write
#[derive(Debug, Clone)]
pub struct BlobUpload {
    /// Object path inside the bucket
    pub path: String,
    /// Content
    pub bytes: Bytes,
    /// MIME type
    pub content_type: String,
    /// Custom metadata stored with the object
    pub metadata: HashMap<String, String>,
}

/// Object storage for uploaded files
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write an object, replacing any existing one at the same path
    async fn put(&self, upload: BlobUpload) -> AppResult<()>;

    /// Allow anonymous reads of the object
    async fn make_public(&self, path: &str) -> AppResult<()>;

    /// Anonymous download URL
    fn public_url(&self, path: &str) -> String;

    /// Remove an object
    async fn delete(&self, path: &str) -> AppResult<()>;
}

/// A stored object
#[derive(Debug, Clone)]
pub struct StoredBlob {
    /// The upload as written
    pub upload: BlobUpload,
    /// Whether `make_public` was called
    pub public: bool,
}

/// Blob store held in process memory
#[derive(Debug)]
pub struct InMemoryBlobStore {
    bucket: String,
    objects: RwLock<HashMap<String, StoredBlob>>,
}

impl InMemoryBlobStore {
    /// Empty store pretending to be `bucket`
    #[must_use]
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Snapshot of one object
    pub async fn get(&self, path: &str) -> Option<StoredBlob> {
        self.objects.read().await.get(path).cloned()
    }

    /// Number of stored objects
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Whether nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, upload: BlobUpload) -> AppResult<()> {
        self.objects.write().await.insert(
            upload.path.clone(),
            StoredBlob {
                upload,
                public: false,
            },
        );
        Ok(())
    }

    async fn make_public(&self, path: &str) -> AppResult<()> {
        self.objects
            .write()
            .await
            .get_mut(path)
            .map(|blob| blob.public = true)
            .ok_or_else(|| AppError::not_found(format!("Blob {path}")))
    }

    fn public_url(&self, path: &str) -> String {
        format!("https://storage.googleapis.com/{}/{path}", self.bucket)
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        self.objects
            .write()
            .await
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Blob {path}")))
    }
}
