// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store traits injected into the learning context and conversation sessions.
//!
//! All traits extend [`StoreAdapter`] and use `#[async_trait]` for
//! dynamic dispatch compatibility.

pub mod adapter;
pub mod conversation;
pub mod learning;

pub use adapter::StoreAdapter;
pub use conversation::ConversationStore;
pub use learning::LearningStore;
