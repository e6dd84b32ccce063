// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query pattern CRUD operations.

use nyaya_core::types::{LegalDomain, QueryPattern};
use nyaya_core::{NyayaError, timestamp_now};
use rusqlite::types::Type;
use rusqlite::{OptionalExtension, Row, params};

use crate::database::{Database, map_tr_err};

const COLUMNS: &str = "id, domain, keywords, match_count, avg_confidence, created_at, updated_at";

fn row_to_pattern(row: &Row<'_>) -> Result<QueryPattern, rusqlite::Error> {
    let domain: String = row.get(1)?;
    let keywords: String = row.get(2)?;
    let keywords = serde_json::from_str(&keywords)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
    Ok(QueryPattern {
        id: row.get(0)?,
        domain: LegalDomain::from_str_value(&domain),
        keywords,
        match_count: row.get(3)?,
        avg_confidence: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Insert a new pattern.
pub async fn insert_pattern(db: &Database, pattern: &QueryPattern) -> Result<(), NyayaError> {
    let keywords = serde_json::to_string(&pattern.keywords).map_err(NyayaError::storage)?;
    let pattern = pattern.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO query_patterns
                 (id, domain, keywords, match_count, avg_confidence, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    pattern.id,
                    pattern.domain.as_str(),
                    keywords,
                    pattern.match_count,
                    pattern.avg_confidence,
                    pattern.created_at,
                    pattern.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a pattern by ID.
pub async fn get_pattern(db: &Database, id: &str) -> Result<Option<QueryPattern>, NyayaError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<QueryPattern>, rusqlite::Error> {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM query_patterns WHERE id = ?1"),
                params![id],
                row_to_pattern,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Patterns of one domain in creation order.
pub async fn patterns_for_domain(
    db: &Database,
    domain: LegalDomain,
) -> Result<Vec<QueryPattern>, NyayaError> {
    db.connection()
        .call(move |conn| -> Result<Vec<QueryPattern>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM query_patterns
                 WHERE domain = ?1 ORDER BY created_at ASC, rowid ASC"
            ))?;
            let rows = stmt.query_map(params![domain.as_str()], row_to_pattern)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// List patterns, optionally filtered by domain, most matched first.
pub async fn list_patterns(
    db: &Database,
    domain: Option<LegalDomain>,
) -> Result<Vec<QueryPattern>, NyayaError> {
    db.connection()
        .call(move |conn| -> Result<Vec<QueryPattern>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM query_patterns
                 WHERE ?1 IS NULL OR domain = ?1
                 ORDER BY match_count DESC, created_at ASC"
            ))?;
            let rows = stmt.query_map(params![domain.map(|d| d.as_str())], row_to_pattern)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Fold one more observation into a pattern's count and running average.
///
/// Keywords are left untouched. Fails with `NotFound` for an unknown ID.
pub async fn record_match(
    db: &Database,
    id: &str,
    confidence: f64,
) -> Result<QueryPattern, NyayaError> {
    let owned_id = id.to_string();
    let now = timestamp_now();
    let updated = db
        .connection()
        .call(move |conn| -> Result<Option<QueryPattern>, rusqlite::Error> {
            let tx = conn.transaction()?;
            let changed = tx.execute(
                "UPDATE query_patterns
                 SET avg_confidence = (avg_confidence * match_count + ?2) / (match_count + 1),
                     match_count = match_count + 1,
                     updated_at = ?3
                 WHERE id = ?1",
                params![owned_id, confidence, now],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            let pattern = tx.query_row(
                &format!("SELECT {COLUMNS} FROM query_patterns WHERE id = ?1"),
                params![owned_id],
                row_to_pattern,
            )?;
            tx.commit()?;
            Ok(Some(pattern))
        })
        .await
        .map_err(map_tr_err)?;

    updated.ok_or_else(|| NyayaError::NotFound {
        entity: "pattern",
        id: id.to_string(),
    })
}
