// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use async_trait::async_trait;

use crate::application::errors::ServiceResult;
use crate::domain::actor::Actor;
use crate::domain::tool::{CreateTool, Tool};

#[async_trait]
pub trait ToolService: Send + Sync {
    /// With `exists_ok` a tool of the same name in the organization is
    /// overwritten and returned; without it the call fails with `Conflict`.
    async fn create_tool(&self, create: CreateTool, exists_ok: bool, actor: &Actor) -> ServiceResult<Tool>;

    async fn get_tool_by_name(&self, name: &str, actor: &Actor) -> ServiceResult<Tool>;

    async fn list_tools(&self, actor: &Actor) -> ServiceResult<Vec<Tool>>;

    /// Removes the tool and every agent link to it
    async fn delete_tool_by_name(&self, name: &str, actor: &Actor) -> ServiceResult<Tool>;
}
