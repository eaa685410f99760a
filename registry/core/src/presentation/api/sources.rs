// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use uuid::Uuid;

use super::{ApiResult, AppState, AuthenticatedActor, JsonBody};
use crate::domain::ids::SourceId;
use crate::domain::source::{CreateSource, Source};

pub(super) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/sources", post(create_source).get(list_sources))
        .route("/v1/sources/{source_id}", get(get_source).delete(delete_source))
}

async fn create_source(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    JsonBody(create): JsonBody<CreateSource>,
) -> ApiResult<(StatusCode, Json<Source>)> {
    let source = state.source_service.create_source(create, &actor).await?;
    Ok((StatusCode::CREATED, Json(source)))
}

async fn list_sources(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
) -> ApiResult<Json<Vec<Source>>> {
    Ok(Json(state.source_service.list_sources(&actor).await?))
}

async fn get_source(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path(source_id): Path<Uuid>,
) -> ApiResult<Json<Source>> {
    Ok(Json(state.source_service.get_source(SourceId(source_id), &actor).await?))
}

async fn delete_source(
    State(state): State<Arc<AppState>>,
    AuthenticatedActor(actor): AuthenticatedActor,
    Path(source_id): Path<Uuid>,
) -> ApiResult<Json<Source>> {
    Ok(Json(state.source_service.delete_source(SourceId(source_id), &actor).await?))
}
