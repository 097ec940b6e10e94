// ABOUTME: Per-owner session key store replacing a process-global map
// ABOUTME: In-memory DashMap implementation and a Firestore sessions/{owner} implementation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use ridhi_core::constants::collections;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::errors::AppResult;
use crate::firebase::FirestoreClient;

/// Owner used when the client identifies itself with no email
pub const ANONYMOUS_OWNER: &str = "anon";

/// Resolve the owner key; blank or missing means anonymous
#[must_use]
pub fn owner_key(email: Option<&str>) -> &str {
    email
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .unwrap_or(ANONYMOUS_OWNER)
}

/// Opaque client key material stored per owner
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Replace the owner's keys
    async fn save_keys(&self, owner: &str, keys: Value) -> AppResult<()>;

    /// The owner's keys, if any were saved
    async fn get_keys(&self, owner: &str) -> AppResult<Option<Value>>;
}

/// Keys held in process memory
#[derive(Debug, Default, Clone)]
pub struct InMemorySessionStore {
    keys: Arc<DashMap<String, Value>>,
}

impl InMemorySessionStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn save_keys(&self, owner: &str, keys: Value) -> AppResult<()> {
        self.keys.insert(owner.to_owned(), keys);
        Ok(())
    }

    async fn get_keys(&self, owner: &str) -> AppResult<Option<Value>> {
        Ok(self.keys.get(owner).map(|entry| entry.value().clone()))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionDocument {
    keys: Value,
}

/// Keys in the Firestore `sessions` collection, one document per owner
#[derive(Debug, Clone)]
pub struct FirestoreSessionStore {
    client: FirestoreClient,
}

impl FirestoreSessionStore {
    /// Store over a Firestore client
    #[must_use]
    pub const fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    fn document_path(owner: &str) -> String {
        format!("{}/{owner}", collections::SESSIONS)
    }
}

#[async_trait]
impl SessionStore for FirestoreSessionStore {
    async fn save_keys(&self, owner: &str, keys: Value) -> AppResult<()> {
        self.client
            .set_document(&Self::document_path(owner), &SessionDocument { keys })
            .await?;
        debug!(owner, "Session keys saved");
        Ok(())
    }

    async fn get_keys(&self, owner: &str) -> AppResult<Option<Value>> {
        let Some(document) = self
            .client
            .get_document(&Self::document_path(owner))
            .await?
        else {
            return Ok(None);
        };
        let session: SessionDocument = document.into_model()?;
        Ok(Some(session.keys))
    }
}
