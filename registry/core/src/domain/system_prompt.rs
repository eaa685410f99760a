// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # System Prompt Derivation
//!
//! Picks the system prompt for a new agent. A caller-supplied prompt is used
//! verbatim; otherwise the canonical template registered for the agent's
//! type is returned.
//!
//! | Agent type | Template |
//! |------------|----------|
//! | `memgpt_agent` | `memgpt_chat` |
//! | `split_thread_agent` | `memgpt_chat` |
//! | `o1_agent` | `memgpt_modified_o1` |
//! | `offline_memory_agent` | `memgpt_offline_memory` |
//! | `chat_only_agent` | `memgpt_convo_only` |

use std::collections::HashMap;
use thiserror::Error;

use crate::domain::agent::AgentType;

pub const MEMGPT_CHAT: &str = include_str!("../../prompts/system/memgpt_chat.txt");
pub const MEMGPT_MODIFIED_O1: &str = include_str!("../../prompts/system/memgpt_modified_o1.txt");
pub const MEMGPT_OFFLINE_MEMORY: &str = include_str!("../../prompts/system/memgpt_offline_memory.txt");
pub const MEMGPT_CONVO_ONLY: &str = include_str!("../../prompts/system/memgpt_convo_only.txt");

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SystemPromptError {
    #[error("No default system prompt registered for agent type '{0}'")]
    NoDefault(AgentType),
}

/// Template name the canonical prompt for `agent_type` is stored under.
pub fn template_name(agent_type: AgentType) -> &'static str {
    match agent_type {
        AgentType::MemgptAgent | AgentType::SplitThreadAgent => "memgpt_chat",
        AgentType::O1Agent => "memgpt_modified_o1",
        AgentType::OfflineMemoryAgent => "memgpt_offline_memory",
        AgentType::ChatOnlyAgent => "memgpt_convo_only",
    }
}

/// Registry of system prompt templates keyed by template name.
#[derive(Debug, Clone)]
pub struct SystemPromptDeriver {
    templates: HashMap<&'static str, String>,
}

impl SystemPromptDeriver {
    /// Deriver with no templates registered
    pub fn empty() -> Self {
        Self { templates: HashMap::new() }
    }

    pub fn register(mut self, template: &'static str, text: impl Into<String>) -> Self {
        self.templates.insert(template, text.into());
        self
    }

    /// Return `supplied` when non-empty, else the default for `agent_type`.
    pub fn derive(&self, agent_type: AgentType, supplied: Option<&str>) -> Result<String, SystemPromptError> {
        if let Some(system) = supplied.filter(|s| !s.is_empty()) {
            return Ok(system.to_string());
        }
        self.templates
            .get(template_name(agent_type))
            .cloned()
            .ok_or(SystemPromptError::NoDefault(agent_type))
    }
}

impl Default for SystemPromptDeriver {
    fn default() -> Self {
        Self::empty()
            .register("memgpt_chat", MEMGPT_CHAT)
            .register("memgpt_modified_o1", MEMGPT_MODIFIED_O1)
            .register("memgpt_offline_memory", MEMGPT_OFFLINE_MEMORY)
            .register("memgpt_convo_only", MEMGPT_CONVO_ONLY)
    }
}
