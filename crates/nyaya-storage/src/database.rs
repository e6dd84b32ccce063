// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use nyaya_config::model::StorageConfig;
use nyaya_core::NyayaError;
use tracing::debug;

use crate::migrations;

/// Map a tokio-rusqlite error onto the shared error type.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> NyayaError {
    NyayaError::Storage {
        source: Box::new(e),
    }
}

/// An open, migrated SQLite database.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path` in WAL mode and run migrations.
    pub async fn open(path: &str) -> Result<Self, NyayaError> {
        Self::open_with(&StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        })
        .await
    }

    /// Open the database described by `config`.
    ///
    /// Parent directories are created as needed. `":memory:"` opens a private
    /// in-memory database.
    pub async fn open_with(config: &StorageConfig) -> Result<Self, NyayaError> {
        let path = config.database_path.clone();
        if path != ":memory:" {
            if let Some(parent) = std::path::Path::new(&path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(NyayaError::storage)?;
                }
            }
        }

        let conn = tokio_rusqlite::Connection::open(&path)
            .await
            .map_err(|e| NyayaError::Storage {
                source: Box::new(e),
            })?;

        let wal_mode = config.wal_mode;
        conn.call(move |conn| -> Result<(), NyayaError> {
            let journal = if wal_mode { "WAL" } else { "DELETE" };
            conn.execute_batch(&format!(
                "PRAGMA journal_mode = {journal};
                 PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;"
            ))
            .map_err(NyayaError::storage)?;
            migrations::run_migrations(conn)
        })
        .await
        .map_err(|e| match e {
            tokio_rusqlite::Error::Error(inner) => inner,
            other => NyayaError::Storage {
                source: other.to_string().into(),
            },
        })?;

        debug!(path = %path, wal_mode, "database opened and migrated");
        Ok(Self { conn })
    }

    /// The single serialized connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL so the main database file is self-contained.
    pub async fn close(&self) -> Result<(), NyayaError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn table_names(db: &Database) -> Vec<String> {
        db.connection()
            .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
                let mut stmt =
                    conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                rows.collect()
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn open_creates_file_and_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("nyaya.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        assert!(path.exists());

        let tables = table_names(&db).await;
        for expected in [
            "conversations",
            "domain_boosts",
            "domain_offsets",
            "improvement_log",
            "query_patterns",
            "turns",
        ] {
            assert!(tables.iter().any(|t| t == expected), "missing {expected}");
        }
    }

    #[tokio::test]
    async fn reopening_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reopen.db");
        let path = path.to_str().unwrap();
        let db = Database::open(path).await.unwrap();
        db.close().await.unwrap();
        drop(db);
        let db = Database::open(path).await.unwrap();
        assert!(table_names(&db).await.contains(&"query_patterns".to_string()));
    }

    #[tokio::test]
    async fn wal_mode_is_applied() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wal.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        let mode = db
            .connection()
            .call(|conn| -> Result<String, rusqlite::Error> {
                conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))
            })
            .await
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[tokio::test]
    async fn in_memory_database_opens() {
        let db = Database::open(":memory:").await.unwrap();
        assert!(!table_names(&db).await.is_empty());
    }
}
