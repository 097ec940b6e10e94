// ABOUTME: Google Firebase integration over REST: credentials, Firestore, Cloud Storage and Auth
// ABOUTME: Each client is a thin reqwest wrapper sharing one service account token source
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

pub mod auth;
pub mod credentials;
pub mod firestore;
pub mod storage;
pub mod value;

pub use auth::{FirebaseAuth, FirebaseClaims};
pub use credentials::{ServiceAccountKey, ServiceAccountTokenSource};
pub use firestore::{Direction, FirestoreAuth, FirestoreClient, Query};
pub use storage::CloudStorageBlobStore;
pub use value::Document;
