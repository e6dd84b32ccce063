// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the learning and conversation store traits.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use nyaya_config::model::StorageConfig;
use nyaya_core::types::{
    Conversation, DomainFeedbackSummary, ImprovementRecord, LegalDomain, QueryPattern, Turn,
};
use nyaya_core::{ConversationStore, HealthStatus, LearningStore, NyayaError, StoreAdapter};

use crate::database::Database;
use crate::queries;

/// SQLite-backed store.
///
/// The database is opened lazily by [`SqliteStore::initialize`]; every other
/// call fails until then.
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a store for the given configuration without opening it.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Create and initialize a store in one step.
    pub async fn open(config: StorageConfig) -> Result<Self, NyayaError> {
        let store = Self::new(config);
        store.initialize().await?;
        Ok(store)
    }

    /// Open the database and run migrations. Fails if called twice.
    pub async fn initialize(&self) -> Result<(), NyayaError> {
        let db = Database::open_with(&self.config).await?;
        self.db.set(db).map_err(|_| NyayaError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite store initialized");
        Ok(())
    }

    fn db(&self) -> Result<&Database, NyayaError> {
        self.db.get().ok_or_else(|| NyayaError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl StoreAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn health_check(&self) -> Result<HealthStatus, NyayaError> {
        let Ok(db) = self.db() else {
            return Ok(HealthStatus::Unhealthy("not initialized".to_string()));
        };
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn close(&self) -> Result<(), NyayaError> {
        if let Some(db) = self.db.get() {
            db.close().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl LearningStore for SqliteStore {
    async fn patterns_for_domain(
        &self,
        domain: LegalDomain,
    ) -> Result<Vec<QueryPattern>, NyayaError> {
        queries::patterns::patterns_for_domain(self.db()?, domain).await
    }

    async fn insert_pattern(&self, pattern: &QueryPattern) -> Result<(), NyayaError> {
        queries::patterns::insert_pattern(self.db()?, pattern).await
    }

    async fn record_pattern_match(
        &self,
        id: &str,
        confidence: f64,
    ) -> Result<QueryPattern, NyayaError> {
        queries::patterns::record_match(self.db()?, id, confidence).await
    }

    async fn get_pattern(&self, id: &str) -> Result<Option<QueryPattern>, NyayaError> {
        queries::patterns::get_pattern(self.db()?, id).await
    }

    async fn list_patterns(
        &self,
        domain: Option<LegalDomain>,
    ) -> Result<Vec<QueryPattern>, NyayaError> {
        queries::patterns::list_patterns(self.db()?, domain).await
    }

    async fn append_improvement(&self, record: &ImprovementRecord) -> Result<(), NyayaError> {
        queries::improvements::append(self.db()?, record).await
    }

    async fn recent_improvements(
        &self,
        limit: usize,
    ) -> Result<Vec<ImprovementRecord>, NyayaError> {
        queries::improvements::recent(self.db()?, limit).await
    }

    async fn feedback_summary(&self) -> Result<Vec<DomainFeedbackSummary>, NyayaError> {
        queries::improvements::summary(self.db()?).await
    }

    async fn load_offsets(&self) -> Result<Vec<(LegalDomain, f64)>, NyayaError> {
        queries::offsets::load(self.db()?).await
    }

    async fn save_offset(&self, domain: LegalDomain, offset: f64) -> Result<(), NyayaError> {
        queries::offsets::save(self.db()?, domain, offset).await
    }

    async fn load_boosts(&self) -> Result<Vec<(LegalDomain, f64)>, NyayaError> {
        queries::offsets::load_boosts(self.db()?).await
    }

    async fn save_boost(&self, domain: LegalDomain, boost: f64) -> Result<(), NyayaError> {
        queries::offsets::save_boost(self.db()?, domain, boost).await
    }
}

#[async_trait]
impl ConversationStore for SqliteStore {
    async fn create_conversation(&self, conversation: &Conversation) -> Result<(), NyayaError> {
        queries::conversations::create_conversation(self.db()?, conversation).await
    }

    async fn update_conversation(&self, conversation: &Conversation) -> Result<(), NyayaError> {
        queries::conversations::update_conversation(self.db()?, conversation).await
    }

    async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>, NyayaError> {
        queries::conversations::get_conversation(self.db()?, id).await
    }

    async fn insert_turn(&self, turn: &Turn) -> Result<(), NyayaError> {
        queries::conversations::insert_turn(self.db()?, turn).await
    }

    async fn get_turns(
        &self,
        conversation_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Turn>, NyayaError> {
        queries::conversations::get_turns(self.db()?, conversation_id, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn initialize_opens_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init_test.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(store.name(), "sqlite");
        store.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));

        store.initialize().await.unwrap();
        assert!(store.initialize().await.is_err());
    }

    #[tokio::test]
    async fn health_reflects_initialization() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("health.db");
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));

        assert!(matches!(
            store.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
        store.initialize().await.unwrap();
        assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn operations_fail_before_initialize() {
        let store = SqliteStore::new(make_config(":memory:"));
        assert!(store.list_patterns(None).await.is_err());
    }

    #[tokio::test]
    async fn learning_state_survives_reopen() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("persist.db");
        let path = db_path.to_str().unwrap();

        {
            let store = SqliteStore::open(make_config(path)).await.unwrap();
            store
                .insert_pattern(&QueryPattern {
                    id: "p1".to_string(),
                    domain: LegalDomain::ConsumerProtection,
                    keywords: vec!["refund".to_string(), "defective".to_string()],
                    match_count: 1,
                    avg_confidence: 0.7,
                    created_at: "2026-01-01T00:00:00.000Z".to_string(),
                    updated_at: "2026-01-01T00:00:00.000Z".to_string(),
                })
                .await
                .unwrap();
            store
                .save_offset(LegalDomain::ConsumerProtection, 0.08)
                .await
                .unwrap();
            store
                .save_boost(LegalDomain::ConsumerProtection, 0.05)
                .await
                .unwrap();
            store.close().await.unwrap();
        }

        let store = SqliteStore::open(make_config(path)).await.unwrap();
        let patterns = store.list_patterns(None).await.unwrap();
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].keywords, ["refund", "defective"]);
        assert_eq!(
            store.load_offsets().await.unwrap(),
            vec![(LegalDomain::ConsumerProtection, 0.08)]
        );
        assert_eq!(
            store.load_boosts().await.unwrap(),
            vec![(LegalDomain::ConsumerProtection, 0.05)]
        );
    }

    #[tokio::test]
    async fn usable_through_trait_objects() {
        let store = Arc::new(SqliteStore::open(make_config(":memory:")).await.unwrap());
        let learning: Arc<dyn LearningStore> = store.clone();
        let conversations: Arc<dyn ConversationStore> = store;

        assert!(learning.feedback_summary().await.unwrap().len() == 1);
        assert!(conversations.get_conversation("none").await.unwrap().is_none());
    }
}
