// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted per-domain confidence offsets and classifier boosts.

use nyaya_core::types::LegalDomain;
use nyaya_core::{NyayaError, timestamp_now};
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// All stored offsets. Rows naming an unknown domain are skipped.
pub async fn load(db: &Database) -> Result<Vec<(LegalDomain, f64)>, NyayaError> {
    load_table(db, "SELECT domain, offset_value FROM domain_offsets ORDER BY domain").await
}

/// Insert or replace the offset for `domain`.
pub async fn save(db: &Database, domain: LegalDomain, offset: f64) -> Result<(), NyayaError> {
    upsert(
        db,
        "INSERT INTO domain_offsets (domain, offset_value, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT (domain) DO UPDATE
         SET offset_value = excluded.offset_value, updated_at = excluded.updated_at",
        domain,
        offset,
    )
    .await
}

/// All stored classifier boosts.
pub async fn load_boosts(db: &Database) -> Result<Vec<(LegalDomain, f64)>, NyayaError> {
    load_table(db, "SELECT domain, boost FROM domain_boosts ORDER BY domain").await
}

/// Insert or replace the boost for `domain`.
pub async fn save_boost(db: &Database, domain: LegalDomain, boost: f64) -> Result<(), NyayaError> {
    upsert(
        db,
        "INSERT INTO domain_boosts (domain, boost, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT (domain) DO UPDATE
         SET boost = excluded.boost, updated_at = excluded.updated_at",
        domain,
        boost,
    )
    .await
}

async fn load_table(
    db: &Database,
    sql: &'static str,
) -> Result<Vec<(LegalDomain, f64)>, NyayaError> {
    let rows = db
        .connection()
        .call(move |conn| -> Result<Vec<(String, f64)>, rusqlite::Error> {
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)?;

    Ok(rows
        .into_iter()
        .filter_map(|(domain, value)| {
            let parsed = domain.parse::<LegalDomain>().ok();
            if parsed.is_none() {
                tracing::warn!(domain = %domain, "ignoring value for unknown domain");
            }
            parsed.map(|d| (d, value))
        })
        .collect())
}

async fn upsert(
    db: &Database,
    sql: &'static str,
    domain: LegalDomain,
    value: f64,
) -> Result<(), NyayaError> {
    let now = timestamp_now();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(sql, params![domain.as_str(), value, now])?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
