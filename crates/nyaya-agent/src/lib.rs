// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Advice pipeline and conversation sessions for the Nyaya legal assistant.
//!
//! The [`AdvicePipeline`] classifies a query into a legal domain, selects
//! the matching knowledge-base template, fills it according to the
//! [`AdviceStrategy`], and renders it with an [`AdviceFormatter`].
//! [`ConversationSession`] layers a multi-turn state machine on top that
//! feeds user ratings back into the learning context.

pub mod bundle;
pub mod format;
pub mod pipeline;
pub mod session;
pub mod strategy;

pub use bundle::{AdviceBundle, PenalReference};
pub use format::{
    AdviceFormatter, JsonFormatter, MarkdownFormatter, PlainFormatter, formatter_for,
};
pub use pipeline::{Advice, AdvicePipeline};
pub use session::{ConversationSession, ConversationState, FeedbackReply, QueryReply};
pub use strategy::AdviceStrategy;
