// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Store Interfaces
//!
//! Persistence contract for the agent registry. The store hands out one
//! [`StoreTransaction`] per operation; every read and write of that
//! operation goes through the same handle, and only the caller that opened
//! it decides whether to commit.
//!
//! | Trait | Implementations |
//! |-------|----------------|
//! | `AgentStore` | `InMemoryAgentStore`, `PostgresAgentStore` |
//!
//! ## Transaction Contract
//!
//! - Changes are invisible to other transactions until [`StoreTransaction::commit`].
//! - Dropping a transaction without committing discards its changes.
//! - Unique constraints (agent name per organization, tool/source name per
//!   organization, one row per `(agent, target)` link, one row per
//!   `(agent, tag)`) are reported as [`RepositoryError::Conflict`].

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::agent::Agent;
use crate::domain::block::Block;
use crate::domain::ids::{AgentId, BlockId, OrganizationId, SourceId, ToolId};
use crate::domain::relationship::RelationshipKind;
use crate::domain::source::Source;
use crate::domain::tool::Tool;

/// Storage backend enum for pluggable persistence
#[derive(Debug, Clone)]
pub enum StorageBackend {
    InMemory,
    PostgreSQL(PostgresConfig),
}

#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub connection_string: String,
    pub max_connections: u32,
}

/// Position in the `(created_at, id)` ordering of agents. Serialized as an
/// opaque token for callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentCursor {
    pub created_at: DateTime<Utc>,
    pub id: AgentId,
}

impl AgentCursor {
    pub fn after(agent: &Agent) -> Self {
        Self { created_at: agent.created_at, id: agent.id }
    }

    pub fn encode(&self) -> String {
        // Serializing two plain fields cannot fail
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    pub fn decode(token: &str) -> Result<Self, RepositoryError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|e| RepositoryError::Serialization(format!("Invalid cursor: {}", e)))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Strict `(created_at, id)` ordering used for keyset pagination
    pub fn precedes(&self, agent: &Agent) -> bool {
        *self < Self::after(agent)
    }
}

/// Filter for listing agents.
#[derive(Debug, Clone, Default)]
pub struct AgentQuery {
    /// `None` lists across all organizations
    pub organization_id: Option<OrganizationId>,
    /// De-duplicated tag filter; empty means no filter
    pub tags: Vec<String>,
    /// `true`: agent must carry every tag; `false`: any one suffices
    pub match_all_tags: bool,
    pub after: Option<AgentCursor>,
    pub limit: usize,
}

/// Persistence entry point. Each call to [`AgentStore::begin`] opens an
/// independent transaction.
#[async_trait]
pub trait AgentStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, RepositoryError>;
}

/// Row-level primitives available inside one transaction.
#[async_trait]
pub trait StoreTransaction: Send {
    // ---- Agents ----------------------------------------------------------

    /// Insert a new agent row. `Conflict` if the name is taken in the organization.
    async fn insert_agent(&mut self, agent: &Agent) -> Result<(), RepositoryError>;

    /// Overwrite an existing agent row. `NotFound` if the row is gone.
    async fn update_agent(&mut self, agent: &Agent) -> Result<(), RepositoryError>;

    async fn find_agent_by_id(
        &mut self,
        id: AgentId,
        organization_id: OrganizationId,
    ) -> Result<Option<Agent>, RepositoryError>;

    async fn find_agent_by_name(
        &mut self,
        name: &str,
        organization_id: OrganizationId,
    ) -> Result<Option<Agent>, RepositoryError>;

    /// Agents ordered by `(created_at, id)` ascending
    async fn list_agents(&mut self, query: &AgentQuery) -> Result<Vec<Agent>, RepositoryError>;

    /// Hard delete. Link rows and tags go with the agent; targets are untouched.
    async fn delete_agent(&mut self, id: AgentId) -> Result<(), RepositoryError>;

    // ---- Relationships ---------------------------------------------------

    /// Subset of `ids` that exist as `kind` targets inside the organization
    async fn resolve_targets(
        &mut self,
        kind: RelationshipKind,
        ids: &[Uuid],
        organization_id: OrganizationId,
    ) -> Result<Vec<Uuid>, RepositoryError>;

    async fn linked_ids(&mut self, agent_id: AgentId, kind: RelationshipKind) -> Result<Vec<Uuid>, RepositoryError>;

    /// `Conflict` if any `(agent, target)` pair already exists
    async fn insert_links(
        &mut self,
        agent_id: AgentId,
        kind: RelationshipKind,
        ids: &[Uuid],
    ) -> Result<(), RepositoryError>;

    /// Missing pairs are ignored
    async fn delete_links(
        &mut self,
        agent_id: AgentId,
        kind: RelationshipKind,
        ids: &[Uuid],
    ) -> Result<(), RepositoryError>;

    // ---- Tags ------------------------------------------------------------

    async fn agent_tags(&mut self, agent_id: AgentId) -> Result<Vec<String>, RepositoryError>;

    async fn insert_tags(&mut self, agent_id: AgentId, tags: &[String]) -> Result<(), RepositoryError>;

    async fn delete_tags(&mut self, agent_id: AgentId, tags: &[String]) -> Result<(), RepositoryError>;

    // ---- Blocks ----------------------------------------------------------

    /// Insert or overwrite by id
    async fn save_block(&mut self, block: &Block) -> Result<(), RepositoryError>;

    async fn find_block(
        &mut self,
        id: BlockId,
        organization_id: OrganizationId,
    ) -> Result<Option<Block>, RepositoryError>;

    async fn blocks_by_ids(&mut self, ids: &[BlockId]) -> Result<Vec<Block>, RepositoryError>;

    // ---- Tools -----------------------------------------------------------

    /// `Conflict` if the name is taken in the organization
    async fn insert_tool(&mut self, tool: &Tool) -> Result<(), RepositoryError>;

    async fn update_tool(&mut self, tool: &Tool) -> Result<(), RepositoryError>;

    async fn find_tool_by_name(
        &mut self,
        name: &str,
        organization_id: OrganizationId,
    ) -> Result<Option<Tool>, RepositoryError>;

    async fn list_tools(&mut self, organization_id: OrganizationId) -> Result<Vec<Tool>, RepositoryError>;

    async fn tools_by_ids(&mut self, ids: &[ToolId]) -> Result<Vec<Tool>, RepositoryError>;

    /// Also removes every agent link to the tool
    async fn delete_tool(&mut self, id: ToolId) -> Result<(), RepositoryError>;

    // ---- Sources ---------------------------------------------------------

    /// `Conflict` if the name is taken in the organization
    async fn insert_source(&mut self, source: &Source) -> Result<(), RepositoryError>;

    async fn find_source(
        &mut self,
        id: SourceId,
        organization_id: OrganizationId,
    ) -> Result<Option<Source>, RepositoryError>;

    async fn list_sources(&mut self, organization_id: OrganizationId) -> Result<Vec<Source>, RepositoryError>;

    async fn sources_by_ids(&mut self, ids: &[SourceId]) -> Result<Vec<Source>, RepositoryError>;

    /// Also removes every agent link to the source
    async fn delete_source(&mut self, id: SourceId) -> Result<(), RepositoryError>;

    // ---- Scope -----------------------------------------------------------

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError>;
}

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound("Row not found".to_string()),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                RepositoryError::Conflict(db.message().to_string())
            }
            _ => RepositoryError::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Serialization(err.to_string())
    }
}
