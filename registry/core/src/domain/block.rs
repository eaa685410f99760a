// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::actor::Actor;
use crate::domain::ids::{BlockId, OrganizationId, UserId};

/// Default character budget for a core-memory block
pub const DEFAULT_BLOCK_LIMIT: usize = 2000;

/// A chunk of persistent context ("core memory") attachable to agents.
/// Blocks are owned by the organization, not by any single agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Block {
    pub id: BlockId,
    pub organization_id: OrganizationId,
    /// Section label, e.g. "human" or "persona"
    pub label: String,
    pub value: String,
    pub limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub created_by_id: Option<UserId>,
    pub last_updated_by_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("Block '{label}' value is {len} characters, exceeds limit of {limit}")]
    LimitExceeded { label: String, len: usize, limit: usize },

    #[error("Block label cannot be empty")]
    EmptyLabel,
}

impl Block {
    pub fn new(create: &CreateBlock, actor: &Actor) -> Result<Self, BlockError> {
        let now = crate::domain::now();
        let block = Self {
            id: create.id.unwrap_or_default(),
            organization_id: actor.organization_id,
            label: create.label.clone(),
            value: create.value.clone(),
            limit: create.limit.unwrap_or(DEFAULT_BLOCK_LIMIT),
            description: create.description.clone(),
            metadata: create.metadata.clone(),
            created_by_id: Some(actor.user_id),
            last_updated_by_id: Some(actor.user_id),
            created_at: now,
            updated_at: now,
        };
        block.validate()?;
        Ok(block)
    }

    /// Overwrite this block with the contents of `create`, keeping identity
    /// and creation audit fields.
    pub fn overwrite(&mut self, create: &CreateBlock, actor: &Actor) -> Result<(), BlockError> {
        self.label = create.label.clone();
        self.value = create.value.clone();
        if let Some(limit) = create.limit {
            self.limit = limit;
        }
        if create.description.is_some() {
            self.description = create.description.clone();
        }
        if create.metadata.is_some() {
            self.metadata = create.metadata.clone();
        }
        self.last_updated_by_id = Some(actor.user_id);
        self.updated_at = crate::domain::now();
        self.validate()
    }

    pub fn validate(&self) -> Result<(), BlockError> {
        if self.label.trim().is_empty() {
            return Err(BlockError::EmptyLabel);
        }
        let len = self.value.chars().count();
        if len > self.limit {
            return Err(BlockError::LimitExceeded {
                label: self.label.clone(),
                len,
                limit: self.limit,
            });
        }
        Ok(())
    }
}

/// Block creation spec. When `id` names an existing block in the actor's
/// organization the block is overwritten instead of inserted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BlockId>,
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl CreateBlock {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: None,
            label: label.into(),
            value: value.into(),
            limit: None,
            description: None,
            metadata: None,
        }
    }
}
