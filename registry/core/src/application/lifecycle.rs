// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Agent Lifecycle Manager
//!
//! Standard implementation of [`AgentLifecycleService`]. Every public
//! operation opens one store transaction, runs its steps on that handle
//! and commits only if all of them succeeded; any error rolls the whole
//! operation back.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Create, update, read, list and delete agents and keep
//!   their tool, source, block and tag relationships coherent

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::application::agent::{AgentLifecycleService, AgentPage, ListAgentsQuery};
use crate::application::block_manager::create_or_update_block;
use crate::application::errors::{ServiceError, ServiceResult};
use crate::application::finish;
use crate::application::relationship_linker::link;
use crate::application::tag_sync::sync_tags;
use crate::domain::actor::Actor;
use crate::domain::agent::{Agent, AgentState, CreateAgent, UpdateAgent};
use crate::domain::ids::{AgentId, BlockId, OrganizationId, SourceId, ToolId};
use crate::domain::registry_config::PaginationConfig;
use crate::domain::relationship::{LinkMode, RelationshipKind};
use crate::domain::repository::{AgentCursor, AgentQuery, AgentStore, RepositoryError, StoreTransaction};
use crate::domain::source::Source;
use crate::domain::system_prompt::SystemPromptDeriver;

pub struct StandardAgentLifecycleService {
    store: Arc<dyn AgentStore>,
    prompts: SystemPromptDeriver,
    pagination: PaginationConfig,
}

impl StandardAgentLifecycleService {
    pub fn new(store: Arc<dyn AgentStore>) -> Self {
        Self {
            store,
            prompts: SystemPromptDeriver::default(),
            pagination: PaginationConfig::default(),
        }
    }

    pub fn with_prompt_deriver(mut self, prompts: SystemPromptDeriver) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    async fn require_agent(
        tx: &mut dyn StoreTransaction,
        agent_id: AgentId,
        organization_id: OrganizationId,
    ) -> ServiceResult<Agent> {
        tx.find_agent_by_id(agent_id, organization_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Agent", agent_id))
    }

    /// Materialize relationships into a snapshot
    async fn load_state(tx: &mut dyn StoreTransaction, agent: Agent) -> ServiceResult<AgentState> {
        let tool_ids: Vec<ToolId> = tx
            .linked_ids(agent.id, RelationshipKind::Tools)
            .await?
            .into_iter()
            .map(ToolId)
            .collect();
        let source_ids: Vec<SourceId> = tx
            .linked_ids(agent.id, RelationshipKind::Sources)
            .await?
            .into_iter()
            .map(SourceId)
            .collect();
        let block_ids: Vec<BlockId> = tx
            .linked_ids(agent.id, RelationshipKind::CoreMemory)
            .await?
            .into_iter()
            .map(BlockId)
            .collect();

        let tools = tx.tools_by_ids(&tool_ids).await?;
        let sources = tx.sources_by_ids(&source_ids).await?;
        let memory = tx.blocks_by_ids(&block_ids).await?;
        let tags = tx.agent_tags(agent.id).await?;

        Ok(AgentState::from_parts(agent, tools, sources, memory, tags))
    }

    async fn create_in(
        &self,
        tx: &mut dyn StoreTransaction,
        create: &CreateAgent,
        actor: &Actor,
    ) -> ServiceResult<AgentState> {
        let agent_type = create.parsed_agent_type()?;
        let system = self.prompts.derive(agent_type, create.system.as_deref())?;

        // Inline blocks are written first so they can be linked as core memory
        let mut block_ids = create.block_ids.clone().unwrap_or_default();
        for spec in &create.memory_blocks {
            let block = create_or_update_block(tx, spec, actor).await?;
            block_ids.push(block.id);
        }

        let agent = Agent::new(create, agent_type, system, actor);
        tx.insert_agent(&agent).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => ServiceError::Conflict(format!(
                "Agent name '{}' already exists in organization {}",
                agent.name, agent.organization_id
            )),
            other => other.into(),
        })?;

        let tool_ids = create.tool_ids.clone().unwrap_or_default();
        let source_ids = create.source_ids.clone().unwrap_or_default();
        link(tx, &agent, &tool_ids, LinkMode::Replace, false).await?;
        link(tx, &agent, &source_ids, LinkMode::Replace, false).await?;
        link(tx, &agent, &block_ids, LinkMode::Replace, false).await?;

        if let Some(tags) = &create.tags {
            sync_tags(tx, agent.id, tags, true).await?;
        }

        Self::load_state(tx, agent).await
    }

    async fn update_in(
        &self,
        tx: &mut dyn StoreTransaction,
        agent_id: AgentId,
        update: &UpdateAgent,
        actor: &Actor,
    ) -> ServiceResult<AgentState> {
        let mut agent = Self::require_agent(tx, agent_id, actor.organization_id).await?;

        agent.apply_scalar_update(update, actor);
        tx.update_agent(&agent).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => ServiceError::Conflict(format!(
                "Agent name '{}' already exists in organization {}",
                agent.name, agent.organization_id
            )),
            other => other.into(),
        })?;

        if let Some(tool_ids) = &update.tool_ids {
            link(tx, &agent, tool_ids, LinkMode::Replace, false).await?;
        }
        if let Some(source_ids) = &update.source_ids {
            link(tx, &agent, source_ids, LinkMode::Replace, false).await?;
        }
        if let Some(block_ids) = &update.block_ids {
            link(tx, &agent, block_ids, LinkMode::Replace, false).await?;
        }
        if let Some(tags) = &update.tags {
            sync_tags(tx, agent.id, tags, true).await?;
        }

        Self::load_state(tx, agent).await
    }

    async fn list_in(
        &self,
        tx: &mut dyn StoreTransaction,
        organization_id: Option<OrganizationId>,
        query: &ListAgentsQuery,
    ) -> ServiceResult<AgentPage> {
        let limit = self.pagination.clamp(query.limit);
        let after = match query.cursor.as_deref() {
            Some(token) => Some(
                AgentCursor::decode(token).map_err(|e| ServiceError::Validation(e.to_string()))?,
            ),
            None => None,
        };
        let tags: Vec<String> = query.tags.iter().cloned().collect::<BTreeSet<_>>().into_iter().collect();

        // One extra row tells us whether another page exists
        let mut rows = tx
            .list_agents(&AgentQuery {
                organization_id,
                tags,
                match_all_tags: query.match_all_tags,
                after,
                limit: limit.saturating_add(1),
            })
            .await?;

        let next_cursor = if rows.len() > limit {
            rows.truncate(limit);
            rows.last().map(|agent| AgentCursor::after(agent).encode())
        } else {
            None
        };

        let mut agents = Vec::with_capacity(rows.len());
        for agent in rows {
            agents.push(Self::load_state(tx, agent).await?);
        }

        Ok(AgentPage { agents, next_cursor })
    }

    async fn delete_in(
        &self,
        tx: &mut dyn StoreTransaction,
        agent_id: AgentId,
        actor: &Actor,
    ) -> ServiceResult<AgentState> {
        let agent = Self::require_agent(tx, agent_id, actor.organization_id).await?;
        let snapshot = Self::load_state(tx, agent).await?;
        tx.delete_agent(agent_id).await?;
        Ok(snapshot)
    }

    async fn attach_source_in(
        &self,
        tx: &mut dyn StoreTransaction,
        agent_id: AgentId,
        source_id: SourceId,
        actor: &Actor,
    ) -> ServiceResult<AgentState> {
        let agent = Self::require_agent(tx, agent_id, actor.organization_id).await?;
        link(tx, &agent, &[source_id], LinkMode::Extend, false).await?;
        Self::load_state(tx, agent).await
    }

    async fn detach_source_in(
        &self,
        tx: &mut dyn StoreTransaction,
        agent_id: AgentId,
        source_id: SourceId,
        actor: &Actor,
    ) -> ServiceResult<AgentState> {
        let agent = Self::require_agent(tx, agent_id, actor.organization_id).await?;
        tx.delete_links(agent.id, RelationshipKind::Sources, &[source_id.0]).await?;
        Self::load_state(tx, agent).await
    }
}

fn record_failure(operation: &'static str) {
    metrics::counter!("agent_registry_operation_errors_total", "operation" => operation).increment(1);
}

#[async_trait]
impl AgentLifecycleService for StandardAgentLifecycleService {
    async fn create_agent(&self, create: CreateAgent, actor: &Actor) -> ServiceResult<AgentState> {
        info!(
            "Creating agent '{}' (type: {}) in organization {}",
            create.name, create.agent_type, actor.organization_id
        );

        let mut tx = self.store.begin().await?;
        let result = self.create_in(tx.as_mut(), &create, actor).await;
        let state = finish(tx, result).await.inspect_err(|_| record_failure("create_agent"))?;

        metrics::counter!("agent_registry_agents_created_total").increment(1);
        info!("Agent '{}' created (id: {})", state.name, state.id);
        Ok(state)
    }

    async fn update_agent(&self, agent_id: AgentId, update: UpdateAgent, actor: &Actor) -> ServiceResult<AgentState> {
        info!("Updating agent {}", agent_id);

        let mut tx = self.store.begin().await?;
        let result = self.update_in(tx.as_mut(), agent_id, &update, actor).await;
        let state = finish(tx, result).await.inspect_err(|_| record_failure("update_agent"))?;

        metrics::counter!("agent_registry_agents_updated_total").increment(1);
        Ok(state)
    }

    async fn get_agent_by_id(&self, agent_id: AgentId, actor: &Actor) -> ServiceResult<AgentState> {
        let mut tx = self.store.begin().await?;
        let found = Self::require_agent(tx.as_mut(), agent_id, actor.organization_id).await;
        let result = match found {
            Ok(agent) => Self::load_state(tx.as_mut(), agent).await,
            Err(e) => Err(e),
        };
        finish(tx, result).await
    }

    async fn get_agent_by_name(&self, name: &str, actor: &Actor) -> ServiceResult<AgentState> {
        let mut tx = self.store.begin().await?;
        let found = tx.find_agent_by_name(name, actor.organization_id).await;
        let result = match found {
            Ok(Some(agent)) => Self::load_state(tx.as_mut(), agent).await,
            Ok(None) => Err(ServiceError::not_found("Agent", name)),
            Err(e) => Err(e.into()),
        };
        finish(tx, result).await
    }

    async fn list_agents(&self, actor: &Actor, query: ListAgentsQuery) -> ServiceResult<AgentPage> {
        debug!("Listing agents for organization {} ({:?})", actor.organization_id, query);

        let mut tx = self.store.begin().await?;
        let result = self.list_in(tx.as_mut(), Some(actor.organization_id), &query).await;
        finish(tx, result).await
    }

    async fn list_all_organizations(&self, query: ListAgentsQuery) -> ServiceResult<AgentPage> {
        info!("Listing agents across all organizations");

        let mut tx = self.store.begin().await?;
        let result = self.list_in(tx.as_mut(), None, &query).await;
        finish(tx, result).await
    }

    async fn delete_agent(&self, agent_id: AgentId, actor: &Actor) -> ServiceResult<AgentState> {
        info!("Deleting agent {}", agent_id);

        let mut tx = self.store.begin().await?;
        let result = self.delete_in(tx.as_mut(), agent_id, actor).await;
        let snapshot = finish(tx, result).await.inspect_err(|_| record_failure("delete_agent"))?;

        metrics::counter!("agent_registry_agents_deleted_total").increment(1);
        info!("Agent '{}' deleted (id: {})", snapshot.name, snapshot.id);
        Ok(snapshot)
    }

    async fn attach_source(&self, agent_id: AgentId, source_id: SourceId, actor: &Actor) -> ServiceResult<AgentState> {
        info!("Attaching source {} to agent {}", source_id, agent_id);

        let mut tx = self.store.begin().await?;
        let result = self.attach_source_in(tx.as_mut(), agent_id, source_id, actor).await;
        let state = finish(tx, result).await.inspect_err(|_| record_failure("attach_source"))?;

        metrics::counter!("agent_registry_sources_attached_total").increment(1);
        Ok(state)
    }

    async fn list_attached_source_ids(&self, agent_id: AgentId, actor: &Actor) -> ServiceResult<Vec<SourceId>> {
        let mut tx = self.store.begin().await?;
        let found = Self::require_agent(tx.as_mut(), agent_id, actor.organization_id).await;
        let result = match found {
            Ok(agent) => tx
                .linked_ids(agent.id, RelationshipKind::Sources)
                .await
                .map(|ids| ids.into_iter().map(SourceId).collect())
                .map_err(ServiceError::from),
            Err(e) => Err(e),
        };
        finish(tx, result).await
    }

    async fn list_attached_sources(&self, agent_id: AgentId, actor: &Actor) -> ServiceResult<Vec<Source>> {
        let mut tx = self.store.begin().await?;
        let found = Self::require_agent(tx.as_mut(), agent_id, actor.organization_id).await;
        let result = match found {
            Ok(agent) => Self::load_state(tx.as_mut(), agent).await.map(|state| state.sources),
            Err(e) => Err(e),
        };
        finish(tx, result).await
    }

    async fn detach_source(&self, agent_id: AgentId, source_id: SourceId, actor: &Actor) -> ServiceResult<AgentState> {
        info!("Detaching source {} from agent {}", source_id, agent_id);

        let mut tx = self.store.begin().await?;
        let result = self.detach_source_in(tx.as_mut(), agent_id, source_id, actor).await;
        let state = finish(tx, result).await.inspect_err(|_| record_failure("detach_source"))?;

        metrics::counter!("agent_registry_sources_detached_total").increment(1);
        Ok(state)
    }
}
