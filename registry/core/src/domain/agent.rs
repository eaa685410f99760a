// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::actor::Actor;
use crate::domain::block::{Block, CreateBlock};
use crate::domain::ids::{AgentId, BlockId, OrganizationId, SourceId, ToolId, UserId};
use crate::domain::llm::{EmbeddingConfig, LlmConfig};
use crate::domain::source::Source;
use crate::domain::tool::Tool;

// ============================================================================
// Value Objects
// ============================================================================

/// Agent variant. Selects the default system prompt and the runtime loop
/// the agent is executed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    #[default]
    MemgptAgent,
    SplitThreadAgent,
    O1Agent,
    OfflineMemoryAgent,
    ChatOnlyAgent,
}

impl AgentType {
    pub const ALL: [AgentType; 5] = [
        AgentType::MemgptAgent,
        AgentType::SplitThreadAgent,
        AgentType::O1Agent,
        AgentType::OfflineMemoryAgent,
        AgentType::ChatOnlyAgent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::MemgptAgent => "memgpt_agent",
            AgentType::SplitThreadAgent => "split_thread_agent",
            AgentType::O1Agent => "o1_agent",
            AgentType::OfflineMemoryAgent => "offline_memory_agent",
            AgentType::ChatOnlyAgent => "chat_only_agent",
        }
    }
}

impl std::fmt::Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown agent type: '{0}'")]
pub struct UnknownAgentType(pub String);

impl FromStr for AgentType {
    type Err = UnknownAgentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownAgentType(s.to_string()))
    }
}

/// Constraint on when a tool may be invoked.
///
/// Rules are stored as given; they are not checked against the set of
/// tools actually attached to the agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ToolRule {
    /// Tool must be the first call of a step chain
    #[serde(rename = "InitToolRule")]
    Init { tool_name: String },

    /// Calling this tool ends the step chain
    #[serde(rename = "TerminalToolRule")]
    Terminal { tool_name: String },

    /// After this tool only `children` may be called
    #[serde(rename = "ChildToolRule")]
    Child { tool_name: String, children: Vec<String> },

    /// Next tool is chosen from the output of this one
    #[serde(rename = "ConditionalToolRule")]
    Conditional {
        tool_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_child: Option<String>,
        #[serde(default)]
        child_output_mapping: HashMap<String, String>,
        #[serde(default)]
        require_output_mapping: bool,
    },
}

// ============================================================================
// Aggregate
// ============================================================================

/// Agent row as persisted. Relationships live in their own link rows and are
/// materialized into [`AgentState`] on read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Agent {
    pub id: AgentId,
    pub organization_id: OrganizationId,
    pub name: String,
    pub system: String,
    pub agent_type: AgentType,
    pub llm_config: LlmConfig,
    pub embedding_config: EmbeddingConfig,
    pub description: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub tool_rules: Vec<ToolRule>,
    pub message_ids: Vec<String>,
    pub created_by_id: Option<UserId>,
    pub last_updated_by_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Agent {
    /// Build a new agent row owned by the actor's organization. `system`
    /// must already be derived.
    pub fn new(create: &CreateAgent, agent_type: AgentType, system: String, actor: &Actor) -> Self {
        let now = crate::domain::now();
        Self {
            id: AgentId::new(),
            organization_id: actor.organization_id,
            name: create.name.clone(),
            system,
            agent_type,
            llm_config: create.llm_config.clone(),
            embedding_config: create.embedding_config.clone(),
            description: create.description.clone(),
            metadata: create.metadata.clone(),
            tool_rules: create.tool_rules.clone().unwrap_or_default(),
            message_ids: Vec::new(),
            created_by_id: Some(actor.user_id),
            last_updated_by_id: Some(actor.user_id),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every scalar field present in `update`. Absent fields are
    /// left alone; present ones replace the stored value wholesale.
    pub fn apply_scalar_update(&mut self, update: &UpdateAgent, actor: &Actor) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(system) = &update.system {
            self.system = system.clone();
        }
        if let Some(llm_config) = &update.llm_config {
            self.llm_config = llm_config.clone();
        }
        if let Some(embedding_config) = &update.embedding_config {
            self.embedding_config = embedding_config.clone();
        }
        if let Some(message_ids) = &update.message_ids {
            self.message_ids = message_ids.clone();
        }
        if let Some(tool_rules) = &update.tool_rules {
            self.tool_rules = tool_rules.clone();
        }
        if let Some(description) = &update.description {
            self.description = Some(description.clone());
        }
        if let Some(metadata) = &update.metadata {
            self.metadata = Some(metadata.clone());
        }
        self.last_updated_by_id = Some(actor.user_id);
        self.updated_at = crate::domain::now();
    }
}

/// Fully materialized, read-only view of an agent returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentState {
    pub id: AgentId,
    pub organization_id: OrganizationId,
    pub name: String,
    pub system: String,
    pub agent_type: AgentType,
    pub llm_config: LlmConfig,
    pub embedding_config: EmbeddingConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub tool_rules: Vec<ToolRule>,
    pub message_ids: Vec<String>,
    pub tools: Vec<Tool>,
    pub sources: Vec<Source>,
    /// Core-memory blocks
    pub memory: Vec<Block>,
    /// Sorted, de-duplicated
    pub tags: Vec<String>,
    pub created_by_id: Option<UserId>,
    pub last_updated_by_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AgentState {
    pub fn from_parts(
        agent: Agent,
        tools: Vec<Tool>,
        sources: Vec<Source>,
        memory: Vec<Block>,
        mut tags: Vec<String>,
    ) -> Self {
        tags.sort();
        tags.dedup();
        Self {
            id: agent.id,
            organization_id: agent.organization_id,
            name: agent.name,
            system: agent.system,
            agent_type: agent.agent_type,
            llm_config: agent.llm_config,
            embedding_config: agent.embedding_config,
            description: agent.description,
            metadata: agent.metadata,
            tool_rules: agent.tool_rules,
            message_ids: agent.message_ids,
            tools,
            sources,
            memory,
            tags,
            created_by_id: agent.created_by_id,
            last_updated_by_id: agent.last_updated_by_id,
            created_at: agent.created_at,
            updated_at: agent.updated_at,
        }
    }

    pub fn tool_ids(&self) -> Vec<ToolId> {
        self.tools.iter().map(|t| t.id).collect()
    }

    pub fn source_ids(&self) -> Vec<SourceId> {
        self.sources.iter().map(|s| s.id).collect()
    }

    pub fn block_ids(&self) -> Vec<BlockId> {
        self.memory.iter().map(|b| b.id).collect()
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Request to create an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAgent {
    pub name: String,

    /// Agent type name; parsed when the agent is created
    #[serde(default = "default_agent_type")]
    pub agent_type: String,

    /// Derived from `agent_type` when absent or empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    pub llm_config: LlmConfig,
    pub embedding_config: EmbeddingConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_ids: Option<Vec<ToolId>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ids: Option<Vec<SourceId>>,

    /// Existing blocks to attach as core memory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_ids: Option<Vec<BlockId>>,

    /// Blocks created (or upserted) as part of the same transaction
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub memory_blocks: Vec<CreateBlock>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_rules: Option<Vec<ToolRule>>,
}

impl CreateAgent {
    pub fn new(
        name: impl Into<String>,
        agent_type: AgentType,
        llm_config: LlmConfig,
        embedding_config: EmbeddingConfig,
    ) -> Self {
        Self {
            name: name.into(),
            agent_type: agent_type.as_str().to_string(),
            system: None,
            llm_config,
            embedding_config,
            tool_ids: None,
            source_ids: None,
            block_ids: None,
            memory_blocks: Vec::new(),
            tags: None,
            description: None,
            metadata: None,
            tool_rules: None,
        }
    }

    pub fn parsed_agent_type(&self) -> Result<AgentType, UnknownAgentType> {
        self.agent_type.parse()
    }
}

fn default_agent_type() -> String {
    AgentType::default().as_str().to_string()
}

/// Sparse update. `None` leaves a field untouched; `Some` replaces it. For
/// relationship fields `Some(vec![])` detaches everything of that kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAgent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_config: Option<LlmConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_config: Option<EmbeddingConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_rules: Option<Vec<ToolRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_ids: Option<Vec<ToolId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ids: Option<Vec<SourceId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_ids: Option<Vec<BlockId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}
