// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Tool Manager
//!
//! Organization-scoped CRUD for tools. Names are unique per organization;
//! `create_tool` with `exists_ok` acts as an upsert by name.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Standard implementation of [`ToolService`]

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::application::errors::{ServiceError, ServiceResult};
use crate::application::finish;
use crate::application::tool::ToolService;
use crate::domain::actor::Actor;
use crate::domain::repository::{AgentStore, RepositoryError, StoreTransaction};
use crate::domain::tool::{CreateTool, Tool};

pub struct StandardToolService {
    store: Arc<dyn AgentStore>,
}

impl StandardToolService {
    pub fn new(store: Arc<dyn AgentStore>) -> Self {
        Self { store }
    }

    async fn create_in(
        tx: &mut dyn StoreTransaction,
        create: &CreateTool,
        exists_ok: bool,
        actor: &Actor,
    ) -> ServiceResult<Tool> {
        let name = create.resolved_name()?;

        let existing = tx.find_tool_by_name(&name, actor.organization_id).await?;
        if let Some(mut existing) = existing {
            if !exists_ok {
                return Err(ServiceError::Conflict(format!(
                    "Tool '{}' already exists in organization {}",
                    name, actor.organization_id
                )));
            }
            info!("Tool '{}' exists, overwriting (id: {})", name, existing.id);
            existing.overwrite(create, actor);
            tx.update_tool(&existing).await?;
            return Ok(existing);
        }

        let tool = Tool::new(create, actor)?;
        tx.insert_tool(&tool).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => ServiceError::Conflict(format!(
                "Tool '{}' already exists in organization {}",
                tool.name, actor.organization_id
            )),
            other => other.into(),
        })?;
        Ok(tool)
    }

    async fn require_tool(tx: &mut dyn StoreTransaction, name: &str, actor: &Actor) -> ServiceResult<Tool> {
        tx.find_tool_by_name(name, actor.organization_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Tool", name))
    }
}

#[async_trait]
impl ToolService for StandardToolService {
    async fn create_tool(&self, create: CreateTool, exists_ok: bool, actor: &Actor) -> ServiceResult<Tool> {
        let mut tx = self.store.begin().await?;
        let result = Self::create_in(tx.as_mut(), &create, exists_ok, actor).await;
        let tool = finish(tx, result).await?;

        info!("Tool '{}' saved (id: {})", tool.name, tool.id);
        Ok(tool)
    }

    async fn get_tool_by_name(&self, name: &str, actor: &Actor) -> ServiceResult<Tool> {
        let mut tx = self.store.begin().await?;
        let result = Self::require_tool(tx.as_mut(), name, actor).await;
        finish(tx, result).await
    }

    async fn list_tools(&self, actor: &Actor) -> ServiceResult<Vec<Tool>> {
        let mut tx = self.store.begin().await?;
        let result = tx.list_tools(actor.organization_id).await.map_err(ServiceError::from);
        finish(tx, result).await
    }

    async fn delete_tool_by_name(&self, name: &str, actor: &Actor) -> ServiceResult<Tool> {
        info!("Deleting tool '{}'", name);

        let mut tx = self.store.begin().await?;
        let found = Self::require_tool(tx.as_mut(), name, actor).await;
        let result = match found {
            Ok(tool) => tx.delete_tool(tool.id).await.map(|_| tool).map_err(ServiceError::from),
            Err(e) => Err(e),
        };
        finish(tx, result).await
    }
}
