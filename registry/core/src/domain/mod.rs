// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain Layer
//!
//! Aggregates, value objects and persistence contracts. Nothing in here
//! touches a database or a socket.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Agent, Tool, Source and Block models plus the pure
//!   relationship and tag planners

pub mod ids;
pub mod actor;
pub mod llm;
pub mod agent;
pub mod block;
pub mod tool;
pub mod source;
pub mod relationship;
pub mod tags;
pub mod system_prompt;
pub mod repository;
pub mod registry_config;

use chrono::{DateTime, SubsecRound, Utc};

/// Current time truncated to microseconds, the precision PostgreSQL stores.
/// Snapshots built from fresh rows then match what a later read returns.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_has_microsecond_precision() {
        for _ in 0..100 {
            assert_eq!(now().timestamp_subsec_nanos() % 1_000, 0);
        }
    }
}
