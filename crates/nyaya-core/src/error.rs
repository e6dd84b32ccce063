// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Nyaya legal assistant.

use thiserror::Error;

/// The primary error type shared by every Nyaya crate.
#[derive(Debug, Error)]
pub enum NyayaError {
    /// Configuration errors (invalid TOML, out-of-range values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, migrations).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The knowledge base could not be loaded or is inconsistent.
    #[error("knowledge base error: {0}")]
    Knowledge(String),

    /// The classifier could not be built or queried.
    #[error("classification error: {0}")]
    Classification(String),

    /// A conversation received input that its current state cannot accept.
    #[error("conversation error: {message}")]
    Conversation { message: String },

    /// A requested entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl NyayaError {
    /// Wrap any error as a storage error.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        NyayaError::Storage {
            source: Box::new(err),
        }
    }

    /// Build a conversation-state error.
    pub fn conversation(message: impl Into<String>) -> Self {
        NyayaError::Conversation {
            message: message.into(),
        }
    }
}
