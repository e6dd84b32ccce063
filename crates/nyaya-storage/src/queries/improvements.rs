// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only improvement log and its aggregate views.

use nyaya_core::NyayaError;
use nyaya_core::types::{DomainFeedbackSummary, FeedbackType, ImprovementRecord, LegalDomain};
use rusqlite::{Row, params};

use crate::database::{Database, map_tr_err};

fn row_to_record(row: &Row<'_>) -> Result<ImprovementRecord, rusqlite::Error> {
    let domain: String = row.get(2)?;
    let feedback_type: String = row.get(5)?;
    Ok(ImprovementRecord {
        id: row.get(0)?,
        query: row.get(1)?,
        domain: LegalDomain::from_str_value(&domain),
        confidence_before: row.get(3)?,
        confidence_after: row.get(4)?,
        feedback_type: FeedbackType::from_str_value(&feedback_type),
        pattern_id: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Append one record to the log.
pub async fn append(db: &Database, record: &ImprovementRecord) -> Result<(), NyayaError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO improvement_log
                 (id, query, domain, confidence_before, confidence_after, feedback_type,
                  pattern_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    record.id,
                    record.query,
                    record.domain.as_str(),
                    record.confidence_before,
                    record.confidence_after,
                    record.feedback_type.as_str(),
                    record.pattern_id,
                    record.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// The newest `limit` records, newest first.
pub async fn recent(db: &Database, limit: usize) -> Result<Vec<ImprovementRecord>, NyayaError> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    db.connection()
        .call(move |conn| -> Result<Vec<ImprovementRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, query, domain, confidence_before, confidence_after, feedback_type,
                        pattern_id, created_at
                 FROM improvement_log
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], row_to_record)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

const SUMMARY_COLUMNS: &str = "COUNT(*),
    COALESCE(SUM(CASE WHEN feedback_type = 'positive' THEN 1 ELSE 0 END), 0),
    COALESCE(SUM(CASE WHEN feedback_type = 'negative' THEN 1 ELSE 0 END), 0),
    COALESCE(SUM(CASE WHEN feedback_type = 'clarification' THEN 1 ELSE 0 END), 0),
    COALESCE(SUM(CASE WHEN feedback_type = 'neutral' THEN 1 ELSE 0 END), 0),
    COALESCE(AVG(confidence_after - confidence_before), 0.0)";

fn row_to_summary(
    domain: Option<LegalDomain>,
    row: &Row<'_>,
    offset: usize,
) -> Result<DomainFeedbackSummary, rusqlite::Error> {
    Ok(DomainFeedbackSummary {
        domain,
        total: row.get(offset)?,
        positive: row.get(offset + 1)?,
        negative: row.get(offset + 2)?,
        clarification: row.get(offset + 3)?,
        neutral: row.get(offset + 4)?,
        avg_confidence_delta: row.get(offset + 5)?,
    })
}

/// Feedback counts per domain (alphabetical), followed by an overall row.
pub async fn summary(db: &Database) -> Result<Vec<DomainFeedbackSummary>, NyayaError> {
    db.connection()
        .call(|conn| -> Result<Vec<DomainFeedbackSummary>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT domain, {SUMMARY_COLUMNS} FROM improvement_log
                 GROUP BY domain ORDER BY domain"
            ))?;
            let rows = stmt.query_map([], |row| {
                let domain: String = row.get(0)?;
                row_to_summary(Some(LegalDomain::from_str_value(&domain)), row, 1)
            })?;
            let mut summaries = rows.collect::<Result<Vec<_>, _>>()?;

            let overall = conn.query_row(
                &format!("SELECT {SUMMARY_COLUMNS} FROM improvement_log"),
                [],
                |row| row_to_summary(None, row, 0),
            )?;
            summaries.push(overall);
            Ok(summaries)
        })
        .await
        .map_err(map_tr_err)
}
