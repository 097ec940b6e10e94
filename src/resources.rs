// ABOUTME: Shared server resources handed to every route as Arc state
// ABOUTME: Production wiring picks Firestore/Cloud Storage or in-memory backends from the config
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ridhi.ai

//! # Server Resources
//!
//! Everything a handler needs is created once at startup and shared through
//! `Arc<ServerResources>`. [`ServerResourcesBuilder`] fills any collaborator
//! that was not supplied with its in-memory implementation, which is what the
//! integration tests rely on.

use std::sync::Arc;

use ridhi_core::constants::scopes;
use tracing::{info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::ServerConfig;
use crate::errors::AppResult;
use crate::files::{
    BlobStore, FileRepository, FileService, FirestoreFileRepository, InMemoryBlobStore,
    InMemoryFileRepository, PdfTextExtractor, TextExtractor,
};
use crate::firebase::{
    CloudStorageBlobStore, FirebaseAuth, FirestoreAuth, FirestoreClient,
    ServiceAccountTokenSource,
};
use crate::gmail::GmailClient;
use crate::orchestrator::Orchestrator;
use crate::sessions::{FirestoreSessionStore, InMemorySessionStore, SessionStore};
use crate::store::{
    ChatRepository, ConversationStore, FirestoreChatRepository, InMemoryChatRepository,
};

/// Bucket name reported by the in-memory blob store when none is configured
const LOCAL_BUCKET: &str = "local-bucket";

/// Shared, immutable collaborators for request handlers
pub struct ServerResources {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
    /// Dual-provider orchestrator
    pub orchestrator: Orchestrator,
    /// Chat history
    pub conversations: ConversationStore,
    /// Upload pipeline
    pub files: FileService,
    /// Gmail client
    pub gmail: GmailClient,
    /// Session key store
    pub sessions: Arc<dyn SessionStore>,
    /// Firebase ID token verifier
    pub firebase_auth: Arc<FirebaseAuth>,
}

impl ServerResources {
    /// Wire production backends according to the configuration
    ///
    /// # Errors
    ///
    /// Returns a config error if the orchestrator cannot be built
    pub fn from_config(config: ServerConfig) -> AppResult<Self> {
        let mut builder = ServerResourcesBuilder::new(config.clone());

        let tokens = config
            .firebase
            .service_account
            .clone()
            .map(|key| Arc::new(ServiceAccountTokenSource::new(key, scopes::FIREBASE_SERVICE)));

        let firestore = match (&config.firebase.project_id, &config.firebase.emulator_host, &tokens) {
            (Some(project_id), Some(host), _) => {
                info!(host = %host, "Using Firestore emulator");
                Some(FirestoreClient::emulator(host, project_id))
            }
            (Some(project_id), None, Some(tokens)) => Some(FirestoreClient::new(
                project_id,
                FirestoreAuth::ServiceAccount(Arc::clone(tokens)),
            )),
            _ => None,
        };

        if let Some(firestore) = firestore {
            builder = builder
                .with_chat_repository(Arc::new(FirestoreChatRepository::new(firestore.clone())))
                .with_file_repository(Arc::new(FirestoreFileRepository::new(firestore.clone())))
                .with_session_store(Arc::new(FirestoreSessionStore::new(firestore)));
        } else {
            warn!("Firebase is not configured; using in-memory stores");
        }

        match (tokens, &config.firebase.storage_bucket) {
            (Some(tokens), Some(bucket)) => {
                builder =
                    builder.with_blob_store(Arc::new(CloudStorageBlobStore::new(bucket, tokens)));
            }
            _ => warn!("Cloud Storage needs a service account; uploads are kept in memory"),
        }

        builder.build()
    }
}

impl std::fmt::Debug for ServerResources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerResources")
            .field("config", &self.config)
            .field("orchestrator", &self.orchestrator)
            .finish_non_exhaustive()
    }
}

/// Assembles [`ServerResources`], defaulting to in-memory collaborators
pub struct ServerResourcesBuilder {
    config: ServerConfig,
    orchestrator: Option<Orchestrator>,
    chat_repository: Option<Arc<dyn ChatRepository>>,
    file_repository: Option<Arc<dyn FileRepository>>,
    blob_store: Option<Arc<dyn BlobStore>>,
    extractor: Option<Arc<dyn TextExtractor>>,
    sessions: Option<Arc<dyn SessionStore>>,
    clock: Option<Arc<dyn Clock>>,
    firebase_auth: Option<FirebaseAuth>,
}

impl ServerResourcesBuilder {
    /// Start from a configuration
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            orchestrator: None,
            chat_repository: None,
            file_repository: None,
            blob_store: None,
            extractor: None,
            sessions: None,
            clock: None,
            firebase_auth: None,
        }
    }

    /// Use a prebuilt orchestrator instead of the configured providers
    #[must_use]
    pub fn with_orchestrator(mut self, orchestrator: Orchestrator) -> Self {
        self.orchestrator = Some(orchestrator);
        self
    }

    /// Chat history backend
    #[must_use]
    pub fn with_chat_repository(mut self, repository: Arc<dyn ChatRepository>) -> Self {
        self.chat_repository = Some(repository);
        self
    }

    /// File metadata backend
    #[must_use]
    pub fn with_file_repository(mut self, repository: Arc<dyn FileRepository>) -> Self {
        self.file_repository = Some(repository);
        self
    }

    /// Blob backend
    #[must_use]
    pub fn with_blob_store(mut self, blob_store: Arc<dyn BlobStore>) -> Self {
        self.blob_store = Some(blob_store);
        self
    }

    /// Text extraction backend
    #[must_use]
    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Session key backend
    #[must_use]
    pub fn with_session_store(mut self, sessions: Arc<dyn SessionStore>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    /// Clock for timestamps and week labels
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Token verifier
    #[must_use]
    pub fn with_firebase_auth(mut self, firebase_auth: FirebaseAuth) -> Self {
        self.firebase_auth = Some(firebase_auth);
        self
    }

    /// Build the resources
    ///
    /// # Errors
    ///
    /// Returns a config error if no orchestrator was given and one cannot be built
    pub fn build(self) -> AppResult<ServerResources> {
        let config = self.config;
        let orchestrator = match self.orchestrator {
            Some(orchestrator) => orchestrator,
            None => Orchestrator::from_config(&config.llm)?,
        };
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let chat_repository = self
            .chat_repository
            .unwrap_or_else(|| Arc::new(InMemoryChatRepository::new()));
        let file_repository = self
            .file_repository
            .unwrap_or_else(|| Arc::new(InMemoryFileRepository::new()));
        let blob_store = self.blob_store.unwrap_or_else(|| {
            let bucket = config
                .firebase
                .storage_bucket
                .clone()
                .unwrap_or_else(|| LOCAL_BUCKET.to_owned());
            Arc::new(InMemoryBlobStore::new(bucket))
        });
        let extractor = self
            .extractor
            .unwrap_or_else(|| Arc::new(PdfTextExtractor));
        let sessions = self
            .sessions
            .unwrap_or_else(|| Arc::new(InMemorySessionStore::new()));
        let firebase_auth = self
            .firebase_auth
            .unwrap_or_else(|| FirebaseAuth::new(config.firebase.project_id.clone()));

        let files = FileService::new(
            blob_store,
            file_repository,
            extractor,
            orchestrator.clone(),
            Arc::clone(&clock),
        )
        .with_max_file_bytes(config.upload.max_file_bytes);

        Ok(ServerResources {
            conversations: ConversationStore::new(chat_repository, clock),
            gmail: GmailClient::new(config.gmail.clone()),
            config: Arc::new(config),
            orchestrator,
            files,
            sessions,
            firebase_auth: Arc::new(firebase_auth),
        })
    }
}
