// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Opens the store, learning context, and pipeline shared by every command.

use std::sync::Arc;

use nyaya_agent::AdvicePipeline;
use nyaya_config::NyayaConfig;
use nyaya_core::{LearningStore, NyayaError, StoreAdapter};
use nyaya_learning::LearningContext;
use nyaya_storage::SqliteStore;
use tracing::{debug, warn};

pub struct Runtime {
    pub config: NyayaConfig,
    pub store: Arc<SqliteStore>,
    pub learning: LearningContext,
    pub pipeline: AdvicePipeline,
}

impl Runtime {
    pub async fn open(config: NyayaConfig) -> Result<Self, NyayaError> {
        let pipeline = AdvicePipeline::from_config(&config)?;
        let store = Arc::new(SqliteStore::open(config.storage.clone()).await?);
        let learning_store: Arc<dyn LearningStore> = store.clone();
        let learning = LearningContext::new(&config, learning_store);
        let restored = learning.restore().await;
        debug!(
            path = %config.storage.database_path,
            restored,
            "runtime opened"
        );
        Ok(Self {
            config,
            store,
            learning,
            pipeline,
        })
    }

    /// Checkpoint and close the database.
    pub async fn shutdown(self) {
        if let Err(e) = self.store.close().await {
            warn!(error = %e, "failed to close database");
        }
    }
}
