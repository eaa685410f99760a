// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::{ApiResult, AppState, AuthenticatedActor, JsonBody};
use crate::application::agent::{AgentPage, ListAgentsQuery};
use crate::domain::agent::{AgentState, CreateAgent, UpdateAgent};
use crate::domain::ids::{AgentId, SourceId};
use crate::domain::source::Source;

pub(super) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/agents", post(create_agent).get(list_agents))
        .route("/v1/agents/by-name/{name}", get(get_agent_by_name))
        .route(
            "/v1/agents/{agent_id}",
            get(get_agent).patch(update_agent).delete(delete_agent),
        )
        .route("/v1/agents/{agent_id}/sources", get(list_agent_sources))
        .route(
            "/v1/agents/{agent_id}/sources/{source_id}",
            post(attach_source).delete(detach_source),
        )
}

/// `?tags=a,b&match_all_tags=false&cursor=..&limit=..`
#[derive(Debug, Deserialize)]
struct ListAgentsParams {
    tags: Option<String>,
    match_all_tags: Option<bool>,
    cursor: Option<String>,
    limit: Option<usize>,
}

impl From<ListAgentsParams> for ListAgentsQuery {
    fn from(params: ListAgentsParams) -> Self {
        let defaults = ListAgentsQuery::default();
        ListAgentsQuery {
            tags: params
                .tags
                .map(|tags| {
                    tags.split(',')
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            match_all_tags: params.match_all_tags.unwrap_or(defaults.match_all_tags),
            cursor: params.cursor.filter(|c| !c.is_empty()),
            limit: params.limit,
        }
    }
}

async fn create_agent(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    JsonBody(create): JsonBody<CreateAgent>,
) -> ApiResult<(StatusCode, Json<AgentState>)> {
    let agent = state.agent_service.create_agent(create, &actor).await?;
    Ok((StatusCode::CREATED, Json(agent)))
}

async fn list_agents(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Query(params): Query<ListAgentsParams>,
) -> ApiResult<Json<AgentPage>> {
    let page = state.agent_service.list_agents(&actor, params.into()).await?;
    Ok(Json(page))
}

async fn get_agent(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path(agent_id): Path<Uuid>,
) -> ApiResult<Json<AgentState>> {
    let agent = state.agent_service.get_agent_by_id(AgentId(agent_id), &actor).await?;
    Ok(Json(agent))
}

async fn get_agent_by_name(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path(name): Path<String>,
) -> ApiResult<Json<AgentState>> {
    let agent = state.agent_service.get_agent_by_name(&name, &actor).await?;
    Ok(Json(agent))
}

async fn update_agent(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path(agent_id): Path<Uuid>,
    JsonBody(update): JsonBody<UpdateAgent>,
) -> ApiResult<Json<AgentState>> {
    let agent = state.agent_service.update_agent(AgentId(agent_id), update, &actor).await?;
    Ok(Json(agent))
}

async fn delete_agent(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path(agent_id): Path<Uuid>,
) -> ApiResult<Json<AgentState>> {
    let agent = state.agent_service.delete_agent(AgentId(agent_id), &actor).await?;
    Ok(Json(agent))
}

async fn list_agent_sources(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path(agent_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Source>>> {
    let sources = state.agent_service.list_attached_sources(AgentId(agent_id), &actor).await?;
    Ok(Json(sources))
}

async fn attach_source(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path((agent_id, source_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<AgentState>> {
    let agent = state
        .agent_service
        .attach_source(AgentId(agent_id), SourceId(source_id), &actor)
        .await?;
    Ok(Json(agent))
}

async fn detach_source(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path((agent_id, source_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<AgentState>> {
    let agent = state
        .agent_service
        .detach_source(AgentId(agent_id), SourceId(source_id), &actor)
        .await?;
    Ok(Json(agent))
}
