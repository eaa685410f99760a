// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Application Layer
//!
//! Use-case services. Each lifecycle operation opens exactly one store
//! transaction, hands it to the linker, the tag synchronizer and the block
//! upsert, and commits only when every step succeeded.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Orchestrates domain planners over the store contracts

pub mod errors;
pub mod relationship_linker;
pub mod tag_sync;
pub mod block_manager;
pub mod agent;
pub mod lifecycle;
pub mod tool;
pub mod tool_manager;
pub mod source;
pub mod source_manager;
pub mod repository_factory;

use tracing::warn;

use crate::application::errors::ServiceResult;
use crate::domain::repository::StoreTransaction;

/// Commit `tx` when `result` is `Ok`, roll it back otherwise. A failed
/// rollback is logged and the original error returned.
pub(crate) async fn finish<T>(tx: Box<dyn StoreTransaction>, result: ServiceResult<T>) -> ServiceResult<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Rollback failed after error '{}': {}", err, rollback_err);
            }
            Err(err)
        }
    }
}
