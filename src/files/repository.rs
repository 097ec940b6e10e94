// ABOUTME: File metadata persistence: trait, in-memory map and Firestore `files` collection
// ABOUTME: Listing filters by owner and optional category, newest upload first
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

use std::collections::HashMap;

use async_trait::async_trait;
use ridhi_core::constants::collections;
use ridhi_core::models::{FileMetadata, FileRecord};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppResult;
use crate::firebase::{Direction, FirestoreClient, Query};

/// Persistence for uploaded file metadata
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Store metadata under a generated id
    async fn insert(&self, metadata: FileMetadata) -> AppResult<FileRecord>;

    /// Fetch by id
    async fn get(&self, file_id: &str) -> AppResult<Option<FileRecord>>;

    /// A user's files, optionally one category, newest first
    async fn list(&self, user_id: &str, category: Option<&str>) -> AppResult<Vec<FileRecord>>;

    /// Remove by id
    async fn delete(&self, file_id: &str) -> AppResult<()>;
}

/// File metadata held in process memory
#[derive(Debug, Default)]
pub struct InMemoryFileRepository {
    files: RwLock<HashMap<String, FileMetadata>>,
}

impl InMemoryFileRepository {
    /// Empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileRepository for InMemoryFileRepository {
    async fn insert(&self, metadata: FileMetadata) -> AppResult<FileRecord> {
        let id = Uuid::new_v4().simple().to_string();
        self.files.write().await.insert(id.clone(), metadata.clone());
        Ok(FileRecord { id, metadata })
    }

    async fn get(&self, file_id: &str) -> AppResult<Option<FileRecord>> {
        Ok(self
            .files
            .read()
            .await
            .get(file_id)
            .map(|metadata| FileRecord {
                id: file_id.to_owned(),
                metadata: metadata.clone(),
            }))
    }

    async fn list(&self, user_id: &str, category: Option<&str>) -> AppResult<Vec<FileRecord>> {
        let files = self.files.read().await;
        let mut records: Vec<FileRecord> = files
            .iter()
            .filter(|(_, m)| m.user_id == user_id)
            .filter(|(_, m)| category.is_none_or(|c| m.category == c))
            .map(|(id, metadata)| FileRecord {
                id: id.clone(),
                metadata: metadata.clone(),
            })
            .collect();
        records.sort_by(|a, b| b.metadata.uploaded_at.cmp(&a.metadata.uploaded_at));
        Ok(records)
    }

    async fn delete(&self, file_id: &str) -> AppResult<()> {
        self.files.write().await.remove(file_id);
        Ok(())
    }
}

/// File metadata in the Firestore `files` collection
#[derive(Debug, Clone)]
pub struct FirestoreFileRepository {
    client: FirestoreClient,
}

impl FirestoreFileRepository {
    /// Repository over a Firestore client
    #[must_use]
    pub const fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    fn document_path(file_id: &str) -> String {
        format!("{}/{file_id}", collections::FILES)
    }
}

#[async_trait]
impl FileRepository for FirestoreFileRepository {
    async fn insert(&self, metadata: FileMetadata) -> AppResult<FileRecord> {
        let id = self
            .client
            .create_document(collections::FILES, &metadata)
            .await?;
        Ok(FileRecord { id, metadata })
    }

    async fn get(&self, file_id: &str) -> AppResult<Option<FileRecord>> {
        let Some(document) = self
            .client
            .get_document(&Self::document_path(file_id))
            .await?
        else {
            return Ok(None);
        };
        let id = document.id.clone();
        Ok(Some(FileRecord {
            id,
            metadata: document.into_model()?,
        }))
    }

    async fn list(&self, user_id: &str, category: Option<&str>) -> AppResult<Vec<FileRecord>> {
        let mut query = Query::collection(collections::FILES).where_eq("userId", user_id);
        if let Some(category) = category {
            query = query.where_eq("category", category);
        }
        let query = query.order_by("uploadedAt", Direction::Descending);

        self.client
            .run_query("", &query)
            .await?
            .into_iter()
            .map(|document| {
                let id = document.id.clone();
                document
                    .into_model::<FileMetadata>()
                    .map(|metadata| FileRecord { id, metadata })
            })
            .collect()
    }

    async fn delete(&self, file_id: &str) -> AppResult<()> {
        self.client
            .delete_document(&Self::document_path(file_id))
            .await
    }
}
