// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Store Implementations
//!
//! Infrastructure implementations of the [`AgentStore`] contract defined in
//! the domain layer.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Persist and retrieve agents, tools, sources, blocks and
//!   their link rows
//! - **Pattern:** Repository (DDD), Adapter (Hexagonal Architecture)
//!
//! # Available Implementations
//!
//! - **PostgresAgentStore** - `sqlx` transactions over the schema in
//!   `migrations/`
//! - **InMemoryAgentStore** - HashMap-backed store for tests and development
//!
//! The in-memory store serializes transactions: `begin` takes an owned lock
//! on the shared state and works on a private copy, which `commit` writes
//! back. Dropping the transaction releases the lock and discards the copy.

pub mod postgres;

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::domain::agent::Agent;
use crate::domain::block::Block;
use crate::domain::ids::{AgentId, BlockId, OrganizationId, SourceId, ToolId};
use crate::domain::relationship::RelationshipKind;
use crate::domain::repository::{AgentQuery, AgentStore, RepositoryError, StoreTransaction};
use crate::domain::source::Source;
use crate::domain::tool::Tool;

pub use postgres::PostgresAgentStore;

#[derive(Debug, Clone, Default)]
struct StoreState {
    agents: HashMap<AgentId, Agent>,
    tools: HashMap<ToolId, Tool>,
    sources: HashMap<SourceId, Source>,
    blocks: HashMap<BlockId, Block>,
    links: HashMap<(AgentId, RelationshipKind), Vec<Uuid>>,
    tags: HashMap<AgentId, BTreeSet<String>>,
}

impl StoreState {
    fn target_organization(&self, kind: RelationshipKind, id: Uuid) -> Option<OrganizationId> {
        match kind {
            RelationshipKind::Tools => self.tools.get(&ToolId(id)).map(|t| t.organization_id),
            RelationshipKind::Sources => self.sources.get(&SourceId(id)).map(|s| s.organization_id),
            RelationshipKind::CoreMemory => self.blocks.get(&BlockId(id)).map(|b| b.organization_id),
        }
    }

    fn unlink_target(&mut self, kind: RelationshipKind, id: Uuid) {
        for ((_, link_kind), ids) in self.links.iter_mut() {
            if *link_kind == kind {
                ids.retain(|linked| *linked != id);
            }
        }
    }

    fn require_agent(&self, id: AgentId) -> Result<(), RepositoryError> {
        if self.agents.contains_key(&id) {
            Ok(())
        } else {
            Err(RepositoryError::NotFound(format!("Agent {}", id)))
        }
    }
}

/// Thread-safe in-memory store for tests and single-process development
#[derive(Clone, Default)]
pub struct InMemoryAgentStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryAgentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgentStore for InMemoryAgentStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, RepositoryError> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(InMemoryTransaction { guard, working }))
    }
}

struct InMemoryTransaction {
    guard: OwnedMutexGuard<StoreState>,
    working: StoreState,
}

fn ordered_by_ids<K, V>(map: &HashMap<K, V>, ids: &[K]) -> Vec<V>
where
    K: std::hash::Hash + Eq,
    V: Clone,
{
    ids.iter().filter_map(|id| map.get(id).cloned()).collect()
}

#[async_trait]
impl StoreTransaction for InMemoryTransaction {
    async fn insert_agent(&mut self, agent: &Agent) -> Result<(), RepositoryError> {
        let state = &mut self.working;
        if state.agents.contains_key(&agent.id) {
            return Err(RepositoryError::Conflict(format!("Agent id {} already exists", agent.id)));
        }
        if state
            .agents
            .values()
            .any(|a| a.organization_id == agent.organization_id && a.name == agent.name)
        {
            return Err(RepositoryError::Conflict(format!("Agent name '{}' already exists", agent.name)));
        }
        state.agents.insert(agent.id, agent.clone());
        Ok(())
    }

    async fn update_agent(&mut self, agent: &Agent) -> Result<(), RepositoryError> {
        let state = &mut self.working;
        state.require_agent(agent.id)?;
        if state
            .agents
            .values()
            .any(|a| a.id != agent.id && a.organization_id == agent.organization_id && a.name == agent.name)
        {
            return Err(RepositoryError::Conflict(format!("Agent name '{}' already exists", agent.name)));
        }
        state.agents.insert(agent.id, agent.clone());
        Ok(())
    }

    async fn find_agent_by_id(
        &mut self,
        id: AgentId,
        organization_id: OrganizationId,
    ) -> Result<Option<Agent>, RepositoryError> {
        Ok(self
            .working
            .agents
            .get(&id)
            .filter(|a| a.organization_id == organization_id)
            .cloned())
    }

    async fn find_agent_by_name(
        &mut self,
        name: &str,
        organization_id: OrganizationId,
    ) -> Result<Option<Agent>, RepositoryError> {
        Ok(self
            .working
            .agents
            .values()
            .find(|a| a.organization_id == organization_id && a.name == name)
            .cloned())
    }

    async fn list_agents(&mut self, query: &AgentQuery) -> Result<Vec<Agent>, RepositoryError> {
        let state = &self.working;
        let empty = BTreeSet::new();

        let mut agents: Vec<&Agent> = state
            .agents
            .values()
            .filter(|a| query.organization_id.is_none_or(|org| a.organization_id == org))
            .filter(|a| query.after.is_none_or(|cursor| cursor.precedes(a)))
            .filter(|a| {
                if query.tags.is_empty() {
                    return true;
                }
                let tags = state.tags.get(&a.id).unwrap_or(&empty);
                if query.match_all_tags {
                    query.tags.iter().all(|t| tags.contains(t))
                } else {
                    query.tags.iter().any(|t| tags.contains(t))
                }
            })
            .collect();

        agents.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(agents.into_iter().take(query.limit).cloned().collect())
    }

    async fn delete_agent(&mut self, id: AgentId) -> Result<(), RepositoryError> {
        let state = &mut self.working;
        if state.agents.remove(&id).is_none() {
            return Err(RepositoryError::NotFound(format!("Agent {}", id)));
        }
        state.links.retain(|(agent_id, _), _| *agent_id != id);
        state.tags.remove(&id);
        Ok(())
    }

    async fn resolve_targets(
        &mut self,
        kind: RelationshipKind,
        ids: &[Uuid],
        organization_id: OrganizationId,
    ) -> Result<Vec<Uuid>, RepositoryError> {
        let state = &self.working;
        let mut seen = HashSet::with_capacity(ids.len());
        Ok(ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .filter(|id| state.target_organization(kind, *id) == Some(organization_id))
            .collect())
    }

    async fn linked_ids(&mut self, agent_id: AgentId, kind: RelationshipKind) -> Result<Vec<Uuid>, RepositoryError> {
        Ok(self.working.links.get(&(agent_id, kind)).cloned().unwrap_or_default())
    }

    async fn insert_links(
        &mut self,
        agent_id: AgentId,
        kind: RelationshipKind,
        ids: &[Uuid],
    ) -> Result<(), RepositoryError> {
        let state = &mut self.working;
        state.require_agent(agent_id)?;
        if let Some(missing) = ids.iter().find(|id| state.target_organization(kind, **id).is_none()) {
            return Err(RepositoryError::NotFound(format!("{} {}", kind.target_name(), missing)));
        }

        let linked = state.links.entry((agent_id, kind)).or_default();
        for id in ids {
            if linked.contains(id) {
                return Err(RepositoryError::Conflict(format!(
                    "{} {} is already linked to agent {}",
                    kind.target_name(),
                    id,
                    agent_id
                )));
            }
            linked.push(*id);
        }
        Ok(())
    }

    async fn delete_links(
        &mut self,
        agent_id: AgentId,
        kind: RelationshipKind,
        ids: &[Uuid],
    ) -> Result<(), RepositoryError> {
        if let Some(linked) = self.working.links.get_mut(&(agent_id, kind)) {
            linked.retain(|id| !ids.contains(id));
        }
        Ok(())
    }

    async fn agent_tags(&mut self, agent_id: AgentId) -> Result<Vec<String>, RepositoryError> {
        Ok(self
            .working
            .tags
            .get(&agent_id)
            .map(|tags| tags.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn insert_tags(&mut self, agent_id: AgentId, tags: &[String]) -> Result<(), RepositoryError> {
        let state = &mut self.working;
        state.require_agent(agent_id)?;
        let stored = state.tags.entry(agent_id).or_default();
        for tag in tags {
            if !stored.insert(tag.clone()) {
                return Err(RepositoryError::Conflict(format!("Tag '{}' already on agent {}", tag, agent_id)));
            }
        }
        Ok(())
    }

    async fn delete_tags(&mut self, agent_id: AgentId, tags: &[String]) -> Result<(), RepositoryError> {
        if let Some(stored) = self.working.tags.get_mut(&agent_id) {
            for tag in tags {
                stored.remove(tag);
            }
        }
        Ok(())
    }

    async fn save_block(&mut self, block: &Block) -> Result<(), RepositoryError> {
        if let Some(existing) = self.working.blocks.get(&block.id) {
            if existing.organization_id != block.organization_id {
                return Err(RepositoryError::Conflict(format!("Block id {} already exists", block.id)));
            }
        }
        self.working.blocks.insert(block.id, block.clone());
        Ok(())
    }

    async fn find_block(
        &mut self,
        id: BlockId,
        organization_id: OrganizationId,
    ) -> Result<Option<Block>, RepositoryError> {
        Ok(self
            .working
            .blocks
            .get(&id)
            .filter(|b| b.organization_id == organization_id)
            .cloned())
    }

    async fn blocks_by_ids(&mut self, ids: &[BlockId]) -> Result<Vec<Block>, RepositoryError> {
        Ok(ordered_by_ids(&self.working.blocks, ids))
    }

    async fn insert_tool(&mut self, tool: &Tool) -> Result<(), RepositoryError> {
        let state = &mut self.working;
        if state
            .tools
            .values()
            .any(|t| t.id == tool.id || (t.organization_id == tool.organization_id && t.name == tool.name))
        {
            return Err(RepositoryError::Conflict(format!("Tool '{}' already exists", tool.name)));
        }
        state.tools.insert(tool.id, tool.clone());
        Ok(())
    }

    async fn update_tool(&mut self, tool: &Tool) -> Result<(), RepositoryError> {
        let state = &mut self.working;
        if !state.tools.contains_key(&tool.id) {
            return Err(RepositoryError::NotFound(format!("Tool {}", tool.id)));
        }
        if state
            .tools
            .values()
            .any(|t| t.id != tool.id && t.organization_id == tool.organization_id && t.name == tool.name)
        {
            return Err(RepositoryError::Conflict(format!("Tool '{}' already exists", tool.name)));
        }
        state.tools.insert(tool.id, tool.clone());
        Ok(())
    }

    async fn find_tool_by_name(
        &mut self,
        name: &str,
        organization_id: OrganizationId,
    ) -> Result<Option<Tool>, RepositoryError> {
        Ok(self
            .working
            .tools
            .values()
            .find(|t| t.organization_id == organization_id && t.name == name)
            .cloned())
    }

    async fn list_tools(&mut self, organization_id: OrganizationId) -> Result<Vec<Tool>, RepositoryError> {
        let mut tools: Vec<Tool> = self
            .working
            .tools
            .values()
            .filter(|t| t.organization_id == organization_id)
            .cloned()
            .collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tools)
    }

    async fn tools_by_ids(&mut self, ids: &[ToolId]) -> Result<Vec<Tool>, RepositoryError> {
        Ok(ordered_by_ids(&self.working.tools, ids))
    }

    async fn delete_tool(&mut self, id: ToolId) -> Result<(), RepositoryError> {
        let state = &mut self.working;
        if state.tools.remove(&id).is_none() {
            return Err(RepositoryError::NotFound(format!("Tool {}", id)));
        }
        state.unlink_target(RelationshipKind::Tools, id.0);
        Ok(())
    }

    async fn insert_source(&mut self, source: &Source) -> Result<(), RepositoryError> {
        let state = &mut self.working;
        if state
            .sources
            .values()
            .any(|s| s.id == source.id || (s.organization_id == source.organization_id && s.name == source.name))
        {
            return Err(RepositoryError::Conflict(format!("Source '{}' already exists", source.name)));
        }
        state.sources.insert(source.id, source.clone());
        Ok(())
    }

    async fn find_source(
        &mut self,
        id: SourceId,
        organization_id: OrganizationId,
    ) -> Result<Option<Source>, RepositoryError> {
        Ok(self
            .working
            .sources
            .get(&id)
            .filter(|s| s.organization_id == organization_id)
            .cloned())
    }

    async fn list_sources(&mut self, organization_id: OrganizationId) -> Result<Vec<Source>, RepositoryError> {
        let mut sources: Vec<Source> = self
            .working
            .sources
            .values()
            .filter(|s| s.organization_id == organization_id)
            .cloned()
            .collect();
        sources.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sources)
    }

    async fn sources_by_ids(&mut self, ids: &[SourceId]) -> Result<Vec<Source>, RepositoryError> {
        Ok(ordered_by_ids(&self.working.sources, ids))
    }

    async fn delete_source(&mut self, id: SourceId) -> Result<(), RepositoryError> {
        let state = &mut self.working;
        if state.sources.remove(&id).is_none() {
            return Err(RepositoryError::NotFound(format!("Source {}", id)));
        }
        state.unlink_target(RelationshipKind::Sources, id.0);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let InMemoryTransaction { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
        Ok(())
    }
}
