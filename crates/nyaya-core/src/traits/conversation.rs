// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store interface for multi-turn conversations.

use async_trait::async_trait;

use crate::error::NyayaError;
use crate::traits::adapter::StoreAdapter;
use crate::types::{Conversation, Turn};

/// Persistence for conversations and their turns.
#[async_trait]
pub trait ConversationStore: StoreAdapter {
    async fn create_conversation(&self, conversation: &Conversation) -> Result<(), NyayaError>;

    /// Overwrite state, counters, and `updated_at` of an existing conversation.
    async fn update_conversation(&self, conversation: &Conversation) -> Result<(), NyayaError>;

    async fn get_conversation(&self, id: &str) -> Result<Option<Conversation>, NyayaError>;

    async fn insert_turn(&self, turn: &Turn) -> Result<(), NyayaError>;

    /// Turns of a conversation in insertion order, optionally only the last `limit`.
    async fn get_turns(
        &self,
        conversation_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Turn>, NyayaError>;
}
