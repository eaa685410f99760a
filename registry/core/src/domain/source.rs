// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::actor::Actor;
use crate::domain::ids::{OrganizationId, SourceId, UserId};
use crate::domain::llm::EmbeddingConfig;

/// A named external knowledge corpus agents can be attached to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Source {
    pub id: SourceId,
    pub organization_id: OrganizationId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_config: Option<EmbeddingConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub created_by_id: Option<UserId>,
    pub last_updated_by_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateSource {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_config: Option<EmbeddingConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl CreateSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            embedding_config: None,
            metadata: None,
        }
    }
}

impl Source {
    pub fn new(create: &CreateSource, actor: &Actor) -> Self {
        let now = crate::domain::now();
        Self {
            id: SourceId::new(),
            organization_id: actor.organization_id,
            name: create.name.clone(),
            description: create.description.clone(),
            embedding_config: create.embedding_config.clone(),
            metadata: create.metadata.clone(),
            created_by_id: Some(actor.user_id),
            last_updated_by_id: Some(actor.user_id),
            created_at: now,
            updated_at: now,
        }
    }
}
