// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiResult, AppState, AuthenticatedActor, JsonBody};
use crate::domain::tool::{CreateTool, Tool};

pub(super) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/tools", post(create_tool).get(list_tools))
        .route("/v1/tools/{tool_name}", get(get_tool).delete(delete_tool))
}

/// Tool body plus `update`, which overwrites an existing tool of the same name
#[derive(Debug, Deserialize)]
struct CreateToolRequest {
    #[serde(flatten)]
    tool: CreateTool,
    #[serde(default)]
    update: bool,
}

async fn create_tool(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    JsonBody(request): JsonBody<CreateToolRequest>,
) -> ApiResult<(StatusCode, Json<Tool>)> {
    let tool = state.tool_service.create_tool(request.tool, request.update, &actor).await?;
    Ok((StatusCode::CREATED, Json(tool)))
}

async fn list_tools(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
) -> ApiResult<Json<Vec<Tool>>> {
    Ok(Json(state.tool_service.list_tools(&actor).await?))
}

async fn get_tool(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path(tool_name): Path<String>,
) -> ApiResult<Json<Tool>> {
    Ok(Json(state.tool_service.get_tool_by_name(&tool_name, &actor).await?))
}

async fn delete_tool(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path(tool_name): Path<String>,
) -> ApiResult<Json<Tool>> {
    Ok(Json(state.tool_service.delete_tool_by_name(&tool_name, &actor).await?))
}
