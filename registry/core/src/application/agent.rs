// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::errors::ServiceResult;
use crate::domain::actor::Actor;
use crate::domain::agent::{AgentState, CreateAgent, UpdateAgent};
use crate::domain::ids::{AgentId, SourceId};
use crate::domain::source::Source;

/// Listing filter and page request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListAgentsQuery {
    /// Empty means no tag filter
    #[serde(default)]
    pub tags: Vec<String>,

    /// `true`: every tag must match; `false`: any one
    #[serde(default = "default_match_all_tags")]
    pub match_all_tags: bool,

    /// Opaque token returned as `next_cursor` by the previous page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

fn default_match_all_tags() -> bool {
    true
}

impl Default for ListAgentsQuery {
    fn default() -> Self {
        Self {
            tags: Vec::new(),
            match_all_tags: default_match_all_tags(),
            cursor: None,
            limit: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentPage {
    pub agents: Vec<AgentState>,
    /// `None` on the last page
    pub next_cursor: Option<String>,
}

#[async_trait]
pub trait AgentLifecycleService: Send + Sync {
    async fn create_agent(&self, create: CreateAgent, actor: &Actor) -> ServiceResult<AgentState>;

    async fn update_agent(&self, agent_id: AgentId, update: UpdateAgent, actor: &Actor) -> ServiceResult<AgentState>;

    async fn get_agent_by_id(&self, agent_id: AgentId, actor: &Actor) -> ServiceResult<AgentState>;

    async fn get_agent_by_name(&self, name: &str, actor: &Actor) -> ServiceResult<AgentState>;

    async fn list_agents(&self, actor: &Actor, query: ListAgentsQuery) -> ServiceResult<AgentPage>;

    /// Administrative listing with no organization filter
    async fn list_all_organizations(&self, query: ListAgentsQuery) -> ServiceResult<AgentPage>;

    /// Returns the snapshot taken just before removal
    async fn delete_agent(&self, agent_id: AgentId, actor: &Actor) -> ServiceResult<AgentState>;

    /// `Conflict` if the source is already attached
    async fn attach_source(&self, agent_id: AgentId, source_id: SourceId, actor: &Actor) -> ServiceResult<AgentState>;

    async fn list_attached_source_ids(&self, agent_id: AgentId, actor: &Actor) -> ServiceResult<Vec<SourceId>>;

    async fn list_attached_sources(&self, agent_id: AgentId, actor: &Actor) -> ServiceResult<Vec<Source>>;

    /// Detaching a source that is not attached is a no-op
    async fn detach_source(&self, agent_id: AgentId, source_id: SourceId, actor: &Actor) -> ServiceResult<AgentState>;
}
