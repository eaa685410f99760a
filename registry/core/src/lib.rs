// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Agent Registry Core
//!
//! Persistence and relationship management for agents in a multi-tenant
//! registry: agents own many-to-many links to tools, sources and memory
//! blocks, plus a free-text tag set, all scoped to one organization.
//!
//! # Architecture
//!
//! - **Domain:** aggregates, pure link/tag planners, store contracts
//! - **Application:** lifecycle services, one transaction per operation
//! - **Infrastructure:** in-memory and PostgreSQL stores
//! - **Presentation:** Axum REST adapter

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
