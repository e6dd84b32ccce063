// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation and turn CRUD operations.

use nyaya_core::NyayaError;
use nyaya_core::types::{Conversation, LegalDomain, Turn};
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};

/// Create a new conversation.
pub async fn create_conversation(
    db: &Database,
    conversation: &Conversation,
) -> Result<(), NyayaError> {
    let c = conversation.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO conversations
                 (id, state, turn_count, satisfaction, learning_rate, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    c.id,
                    c.state,
                    c.turn_count,
                    c.satisfaction,
                    c.learning_rate,
                    c.created_at,
                    c.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Overwrite the mutable fields of an existing conversation.
pub async fn update_conversation(
    db: &Database,
    conversation: &Conversation,
) -> Result<(), NyayaError> {
    let c = conversation.clone();
    let changed = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "UPDATE conversations
                 SET state = ?2, turn_count = ?3, satisfaction = ?4, learning_rate = ?5,
                     updated_at = ?6
                 WHERE id = ?1",
                params![
                    c.id,
                    c.state,
                    c.turn_count,
                    c.satisfaction,
                    c.learning_rate,
                    c.updated_at,
                ],
            )
        })
        .await
        .map_err(map_tr_err)?;

    if changed == 0 {
        return Err(NyayaError::NotFound {
            entity: "conversation",
            id: conversation.id.clone(),
        });
    }
    Ok(())
}

/// Get a conversation by ID.
pub async fn get_conversation(
    db: &Database,
    id: &str,
) -> Result<Option<Conversation>, NyayaError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<Conversation>, rusqlite::Error> {
            conn.query_row(
                "SELECT id, state, turn_count, satisfaction, learning_rate, created_at, updated_at
                 FROM conversations WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Conversation {
                        id: row.get(0)?,
                        state: row.get(1)?,
                        turn_count: row.get(2)?,
                        satisfaction: row.get(3)?,
                        learning_rate: row.get(4)?,
                        created_at: row.get(5)?,
                        updated_at: row.get(6)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Append a turn; its sequence number follows the conversation's last turn.
pub async fn insert_turn(db: &Database, turn: &Turn) -> Result<(), NyayaError> {
    let t = turn.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO turns
                 (id, conversation_id, seq, kind, content, domain, confidence, pattern_id,
                  created_at)
                 VALUES (?1, ?2,
                         (SELECT COALESCE(MAX(seq), 0) + 1 FROM turns WHERE conversation_id = ?2),
                         ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    t.id,
                    t.conversation_id,
                    t.kind,
                    t.content,
                    t.domain.map(|d| d.as_str()),
                    t.confidence,
                    t.pattern_id,
                    t.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Turns of a conversation in order; with `limit`, only the most recent ones.
pub async fn get_turns(
    db: &Database,
    conversation_id: &str,
    limit: Option<i64>,
) -> Result<Vec<Turn>, NyayaError> {
    let conversation_id = conversation_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<Turn>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, conversation_id, kind, content, domain, confidence, pattern_id,
                        created_at
                 FROM (
                     SELECT * FROM turns WHERE conversation_id = ?1
                     ORDER BY seq DESC LIMIT ?2
                 )
                 ORDER BY seq ASC",
            )?;
            let rows = stmt.query_map(params![conversation_id, limit.unwrap_or(-1)], |row| {
                let domain: Option<String> = row.get(4)?;
                Ok(Turn {
                    id: row.get(0)?,
                    conversation_id: row.get(1)?,
                    kind: row.get(2)?,
                    content: row.get(3)?,
                    domain: domain.map(|d| LegalDomain::from_str_value(&d)),
                    confidence: row.get(5)?,
                    pattern_id: row.get(6)?,
                    created_at: row.get(7)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation(id: &str) -> Conversation {
        Conversation {
            id: id.to_string(),
            state: "idle".to_string(),
            turn_count: 0,
            satisfaction: 0.5,
            learning_rate: 1.0,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    fn turn(id: &str, conversation_id: &str, kind: &str, content: &str) -> Turn {
        Turn {
            id: id.to_string(),
            conversation_id: conversation_id.to_string(),
            kind: kind.to_string(),
            content: content.to_string(),
            domain: None,
            confidence: None,
            pattern_id: None,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn conversation_lifecycle() {
        let db = Database::open(":memory:").await.unwrap();
        create_conversation(&db, &conversation("c1")).await.unwrap();

        let mut c = get_conversation(&db, "c1").await.unwrap().unwrap();
        c.state = "escalated".to_string();
        c.turn_count = 4;
        c.satisfaction = 0.15;
        update_conversation(&db, &c).await.unwrap();

        let reloaded = get_conversation(&db, "c1").await.unwrap().unwrap();
        assert_eq!(reloaded, c);
        assert!(get_conversation(&db, "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn updating_unknown_conversation_fails() {
        let db = Database::open(":memory:").await.unwrap();
        let err = update_conversation(&db, &conversation("ghost")).await.unwrap_err();
        assert!(matches!(err, NyayaError::NotFound { entity: "conversation", .. }));
    }

    #[tokio::test]
    async fn turns_keep_insertion_order_and_limit_takes_latest() {
        let db = Database::open(":memory:").await.unwrap();
        create_conversation(&db, &conversation("c1")).await.unwrap();

        let mut query = turn("t1", "c1", "query", "my landlord kept the deposit");
        query.domain = Some(LegalDomain::TenantRights);
        query.confidence = Some(0.62);
        insert_turn(&db, &query).await.unwrap();
        insert_turn(&db, &turn("t2", "c1", "advice", "Send a legal notice")).await.unwrap();
        insert_turn(&db, &turn("t3", "c1", "feedback", "thanks")).await.unwrap();

        let all = get_turns(&db, "c1", None).await.unwrap();
        let ids: Vec<_> = all.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["t1", "t2", "t3"]);
        assert_eq!(all[0].domain, Some(LegalDomain::TenantRights));
        assert_eq!(all[0].confidence, Some(0.62));

        let last_two = get_turns(&db, "c1", Some(2)).await.unwrap();
        let ids: Vec<_> = last_two.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["t2", "t3"]);
    }

    #[tokio::test]
    async fn turn_for_missing_conversation_violates_foreign_key() {
        let db = Database::open(":memory:").await.unwrap();
        let result = insert_turn(&db, &turn("t1", "missing", "query", "hello")).await;
        assert!(result.is_err());
    }
}
