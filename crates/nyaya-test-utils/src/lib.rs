// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Nyaya integration tests.
//!
//! [`TestHarness`] assembles the full stack (SQLite store on a temp
//! directory, learning context, advice pipeline) so tests can drive
//! queries and feedback without touching the user's database.

pub mod harness;

pub use harness::{TestHarness, TestHarnessBuilder};
