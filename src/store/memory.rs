// ABOUTME: In-memory chat repository for tests and unconfigured development runs
// ABOUTME: Per-user vectors behind a tokio RwLock with a sequence number breaking timestamp ties
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use ridhi_core::models::{ChatEntry, ChatRecord};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{distinct_labels, ChatRepository};
use crate::errors::AppResult;

struct StoredEntry {
    sequence: u64,
    entry: ChatEntry,
}

/// Chat history held in process memory
#[derive(Default)]
pub struct InMemoryChatRepository {
    users: RwLock<HashMap<String, Vec<StoredEntry>>>,
    sequence: AtomicU64,
}

impl InMemoryChatRepository {
    /// Empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first: later timestamp, then later insertion
fn newest_first(entries: &mut [&StoredEntry]) {
    entries.sort_by(|a, b| {
        b.entry
            .record
            .timestamp
            .cmp(&a.entry.record.timestamp)
            .then(b.sequence.cmp(&a.sequence))
    });
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn insert(&self, user_id: &str, record: ChatRecord) -> AppResult<ChatEntry> {
        let entry = ChatEntry {
            id: Uuid::new_v4().simple().to_string(),
            record,
        };
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);

        self.users
            .write()
            .await
            .entry(user_id.to_owned())
            .or_default()
            .push(StoredEntry {
                sequence,
                entry: entry.clone(),
            });
        Ok(entry)
    }

    async fn list(
        &self,
        user_id: &str,
        week_label: Option<&str>,
        limit: usize,
    ) -> AppResult<Vec<ChatEntry>> {
        let users = self.users.read().await;
        let Some(stored) = users.get(user_id) else {
            return Ok(Vec::new());
        };

        let mut matching: Vec<&StoredEntry> = stored
            .iter()
            .filter(|s| week_label.is_none_or(|week| s.entry.record.week_label == week))
            .collect();
        newest_first(&mut matching);

        Ok(matching
            .into_iter()
            .take(limit)
            .map(|s| s.entry.clone())
            .collect())
    }

    async fn week_labels(&self, user_id: &str) -> AppResult<Vec<String>> {
        let users = self.users.read().await;
        let Some(stored) = users.get(user_id) else {
            return Ok(Vec::new());
        };

        let mut all: Vec<&StoredEntry> = stored.iter().collect();
        newest_first(&mut all);
        Ok(distinct_labels(
            all.iter().map(|s| s.entry.record.week_label.as_str()),
        ))
    }

    async fn delete_where(&self, user_id: &str, week_label: Option<&str>) -> AppResult<usize> {
        let mut users = self.users.write().await;
        let Some(stored) = users.get_mut(user_id) else {
            return Ok(0);
        };

        let before = stored.len();
        match week_label {
            Some(week) => stored.retain(|s| s.entry.record.week_label != week),
            None => stored.clear(),
        }
        Ok(before - stored.len())
    }
}
