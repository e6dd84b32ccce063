// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait shared by every persistence backend.

use async_trait::async_trait;

use crate::error::NyayaError;
use crate::types::HealthStatus;

/// Identity, health, and lifecycle for a store implementation.
#[async_trait]
pub trait StoreAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this store (`sqlite`, `memory`).
    fn name(&self) -> &str;

    /// Performs a health check and returns the store's current status.
    async fn health_check(&self) -> Result<HealthStatus, NyayaError>;

    /// Flushes pending writes and releases held resources.
    async fn close(&self) -> Result<(), NyayaError>;
}
