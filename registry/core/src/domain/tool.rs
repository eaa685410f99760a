// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::actor::Actor;
use crate::domain::ids::{OrganizationId, ToolId, UserId};

/// An invocable capability that agents can be linked to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    pub id: ToolId,
    pub organization_id: OrganizationId,
    /// Unique within the organization
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Language of `source_code` (e.g. "python")
    pub source_type: String,
    pub source_code: String,
    /// OpenAI-style function schema
    pub json_schema: serde_json::Value,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_by_id: Option<UserId>,
    pub last_updated_by_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("Tool name missing: provide `name` or a `name` field in json_schema")]
    MissingName,
}

/// Tool creation request. The name falls back to `json_schema.name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateTool {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_source_type")]
    pub source_type: String,
    pub source_code: String,
    pub json_schema: serde_json::Value,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateTool {
    pub fn resolved_name(&self) -> Result<String, ToolError> {
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return Ok(name.to_string());
        }
        self.json_schema
            .get("name")
            .and_then(|v| v.as_str())
            .filter(|n| !n.trim().is_empty())
            .map(str::to_string)
            .ok_or(ToolError::MissingName)
    }
}

impl Tool {
    pub fn new(create: &CreateTool, actor: &Actor) -> Result<Self, ToolError> {
        let now = crate::domain::now();
        Ok(Self {
            id: ToolId::new(),
            organization_id: actor.organization_id,
            name: create.resolved_name()?,
            description: create.description.clone(),
            source_type: create.source_type.clone(),
            source_code: create.source_code.clone(),
            json_schema: create.json_schema.clone(),
            tags: create.tags.clone(),
            created_by_id: Some(actor.user_id),
            last_updated_by_id: Some(actor.user_id),
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the definition in place (the `exists_ok` path).
    pub fn overwrite(&mut self, create: &CreateTool, actor: &Actor) {
        self.description = create.description.clone();
        self.source_type = create.source_type.clone();
        self.source_code = create.source_code.clone();
        self.json_schema = create.json_schema.clone();
        self.tags = create.tags.clone();
        self.last_updated_by_id = Some(actor.user_id);
        self.updated_at = crate::domain::now();
    }
}

fn default_source_type() -> String {
    "python".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_name_from_json_schema() {
        let create = CreateTool {
            name: None,
            description: None,
            source_type: "python".to_string(),
            source_code: "def web_search(query): ...".to_string(),
            json_schema: json!({"name": "web_search", "parameters": {}}),
            tags: vec![],
        };
        assert_eq!(create.resolved_name().unwrap(), "web_search");
    }

    #[test]
    fn test_explicit_name_wins() {
        let create = CreateTool {
            name: Some("search".to_string()),
            description: None,
            source_type: "python".to_string(),
            source_code: String::new(),
            json_schema: json!({"name": "web_search"}),
            tags: vec![],
        };
        assert_eq!(create.resolved_name().unwrap(), "search");
    }

    #[test]
    fn test_missing_name_rejected() {
        let create = CreateTool {
            name: None,
            description: None,
            source_type: "python".to_string(),
            source_code: String::new(),
            json_schema: json!({}),
            tags: vec![],
        };
        assert_eq!(create.resolved_name().unwrap_err(), ToolError::MissingName);
    }
}
