// ABOUTME: Conversation store with week-partitioned chat history per user
// ABOUTME: Week labels, the ChatRepository backend trait and the clock-driven ConversationStore
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

//! # Conversation Store
//!
//! Every exchange is filed under a partition key derived from its write date:
//! `"Week " + ceil(day_of_month / 7) + " " + month name`. The year is not part
//! of the label, so March 2024 and March 2025 entries share partitions.

mod firestore;
mod memory;

pub use firestore::FirestoreChatRepository;
pub use memory::InMemoryChatRepository;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, SecondsFormat};
use ridhi_core::constants::limits;
use ridhi_core::models::{AiSource, ChatEntry, ChatRecord};
use tracing::{debug, info, instrument};

use crate::clock::Clock;
use crate::errors::{AppError, AppResult};

/// Partition label for a calendar date, e.g. 2024-03-08 -> "Week 2 March"
#[must_use]
pub fn week_label(date: NaiveDate) -> String {
    format!("Week {} {}", date.day().div_ceil(7), date.format("%B"))
}

/// Persistence backend for chat entries
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Store a record and return it with its generated id
    async fn insert(&self, user_id: &str, record: ChatRecord) -> AppResult<ChatEntry>;

    /// Entries newest first, optionally restricted to one week, at most `limit`
    async fn list(
        &self,
        user_id: &str,
        week_label: Option<&str>,
        limit: usize,
    ) -> AppResult<Vec<ChatEntry>>;

    /// Distinct week labels, most recently written first
    async fn week_labels(&self, user_id: &str) -> AppResult<Vec<String>>;

    /// Atomically delete every entry of the user (or of one week); returns the count
    async fn delete_where(&self, user_id: &str, week_label: Option<&str>) -> AppResult<usize>;
}

/// Chat history operations over a repository and a clock
#[derive(Clone)]
pub struct ConversationStore {
    repository: Arc<dyn ChatRepository>,
    clock: Arc<dyn Clock>,
}

impl ConversationStore {
    /// Create a store
    #[must_use]
    pub fn new(repository: Arc<dyn ChatRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Record one exchange; timestamp and week label come from the clock
    ///
    /// # Errors
    ///
    /// Returns an error if `user_id` is empty or the backend write fails
    #[instrument(skip(self, user_message, ai_response), fields(user.id = %user_id))]
    pub async fn append(
        &self,
        user_id: &str,
        user_message: &str,
        ai_response: &str,
        sources: &[AiSource],
    ) -> AppResult<ChatEntry> {
        if user_id.trim().is_empty() {
            return Err(AppError::missing_field("userId is required"));
        }

        let now = self.clock.now();
        let record = ChatRecord {
            user_message: user_message.to_owned(),
            ai_response: ai_response.to_owned(),
            sources: sources.to_vec(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            week_label: week_label(now.date_naive()),
        };

        let entry = self.repository.insert(user_id, record).await?;
        debug!(entry.id = %entry.id, week = %entry.record.week_label, "Chat entry stored");
        Ok(entry)
    }

    /// Up to 100 entries, newest first, optionally for one week
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails
    pub async fn list(&self, user_id: &str, week: Option<&str>) -> AppResult<Vec<ChatEntry>> {
        self.repository
            .list(user_id, week_filter(week), limits::HISTORY_LIMIT)
            .await
    }

    /// Week labels that have entries
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails
    pub async fn list_week_labels(&self, user_id: &str) -> AppResult<Vec<String>> {
        self.repository.week_labels(user_id).await
    }

    /// Delete all of a user's history, or one week of it
    ///
    /// # Errors
    ///
    /// Returns an error if the backend delete fails; nothing is deleted in that case
    #[instrument(skip(self), fields(user.id = %user_id))]
    pub async fn clear(&self, user_id: &str, week: Option<&str>) -> AppResult<usize> {
        let deleted = self.repository.delete_where(user_id, week_filter(week)).await?;
        info!(deleted, "Chat history cleared");
        Ok(deleted)
    }
}

impl std::fmt::Debug for ConversationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationStore").finish_non_exhaustive()
    }
}

/// `?week=` with an empty value means no filter; anything else matches exactly
fn week_filter(week: Option<&str>) -> Option<&str> {
    week.filter(|w| !w.is_empty())
}

/// Distinct labels in first-seen order
pub(crate) fn distinct_labels<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for label in labels.filter(|label| !label.is_empty()) {
        if !seen.iter().any(|existing| existing == label) {
            seen.push(label.to_owned());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_label_boundaries() {
        assert_eq!(week_label(date(2024, 3, 1)), "Week 1 March");
        assert_eq!(week_label(date(2024, 3, 7)), "Week 1 March");
        assert_eq!(week_label(date(2024, 3, 8)), "Week 2 March");
        assert_eq!(week_label(date(2024, 3, 29)), "Week 5 March");
        assert_eq!(week_label(date(2024, 3, 31)), "Week 5 March");
        assert_eq!(week_label(date(2024, 2, 29)), "Week 5 February");
        assert_eq!(week_label(date(2024, 12, 14)), "Week 2 December");
    }

    #[test]
    fn test_week_label_ignores_year() {
        assert_eq!(week_label(date(2024, 3, 8)), week_label(date(2025, 3, 8)));
    }

    #[test]
    fn test_distinct_labels_keep_first_seen_order() {
        let labels = ["Week 2 March", "", "Week 2 March", "Week 1 March", "Week 2 March"];
        assert_eq!(
            distinct_labels(labels.into_iter()),
            ["Week 2 March", "Week 1 March"]
        );
    }

    #[test]
    fn test_only_empty_week_is_no_filter() {
        assert_eq!(week_filter(None), None);
        assert_eq!(week_filter(Some("")), None);
        assert_eq!(week_filter(Some(" ")), Some(" "));
        assert_eq!(week_filter(Some("Week 1 March")), Some("Week 1 March"));
    }
}
