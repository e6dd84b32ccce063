// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a complete advice stack on a temp SQLite
//! database. The database survives [`TestHarness::restart`] so tests can
//! check what a second process would see.

use std::path::PathBuf;
use std::sync::Arc;

use nyaya_agent::{Advice, AdvicePipeline, ConversationSession};
use nyaya_config::NyayaConfig;
use nyaya_config::model::OutputFormat;
use nyaya_core::{ConversationStore, LearningStore, NyayaError};
use nyaya_learning::{LearningContext, PatternMatch};
use nyaya_storage::SqliteStore;
use tracing::debug;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    config: NyayaConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: NyayaConfig::default(),
        }
    }

    /// Start from a full configuration. The database path is always replaced.
    pub fn with_config(mut self, config: NyayaConfig) -> Self {
        self.config = config;
        self
    }

    /// Persist confidence offsets so they survive a restart.
    pub fn with_persisted_offsets(mut self) -> Self {
        self.config.learning.persist_offsets = true;
        self
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.config.conversation.max_turns = max_turns;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.config.advice.format = format;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(mut self) -> Result<TestHarness, NyayaError> {
        let temp_dir = tempfile::TempDir::new().map_err(NyayaError::storage)?;
        let db_path = temp_dir.path().join("nyaya-test.db");
        self.config.storage.database_path = db_path.to_string_lossy().to_string();

        let pipeline = Arc::new(AdvicePipeline::from_config(&self.config)?);
        let (store, learning) = open_stack(&self.config).await?;

        Ok(TestHarness {
            config: self.config,
            store,
            learning,
            pipeline,
            db_path,
            _temp_dir: temp_dir,
        })
    }
}

async fn open_stack(
    config: &NyayaConfig,
) -> Result<(Arc<SqliteStore>, Arc<LearningContext>), NyayaError> {
    let store = Arc::new(SqliteStore::open(config.storage.clone()).await?);
    let learning_store: Arc<dyn LearningStore> = store.clone();
    let learning = LearningContext::new(config, learning_store);
    let restored = learning.restore().await;
    debug!(restored, "test stack opened");
    Ok((store, Arc::new(learning)))
}

/// A complete test environment backed by a temp database.
pub struct TestHarness {
    pub config: NyayaConfig,
    /// SQLite store (temp DB, removed on drop).
    pub store: Arc<SqliteStore>,
    pub learning: Arc<LearningContext>,
    pub pipeline: Arc<AdvicePipeline>,
    db_path: PathBuf,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A harness with default configuration.
    pub async fn new() -> Result<Self, NyayaError> {
        Self::builder().build().await
    }

    pub fn db_path(&self) -> &PathBuf {
        &self.db_path
    }

    /// A new conversation that persists to the harness store.
    pub fn session(&self) -> ConversationSession {
        let store: Arc<dyn ConversationStore> = self.store.clone();
        ConversationSession::new(&self.config, self.pipeline.clone(), self.learning.clone())
            .with_store(store)
    }

    /// One-shot advice plus pattern observation, as `nyaya ask` does it.
    pub async fn ask(&self, query: &str) -> Result<(Advice, Option<PatternMatch>), NyayaError> {
        let advice = self.pipeline.advise(query, &self.learning).await?;
        let pattern = self
            .learning
            .observe_query(advice.domain(), &advice.query, advice.prediction.confidence)
            .await;
        Ok((advice, pattern))
    }

    /// Close the store and reopen it with a fresh learning context.
    pub async fn restart(&mut self) -> Result<(), NyayaError> {
        use nyaya_core::StoreAdapter;

        self.store.close().await?;
        let (store, learning) = open_stack(&self.config).await?;
        self.store = store;
        self.learning = learning;
        Ok(())
    }
}
