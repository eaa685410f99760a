// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # REST API
//!
//! Axum adapter over the application services. Handlers translate HTTP
//! requests into service calls and [`ServiceError`] kinds into status codes.
//!
//! The caller's identity travels in two headers, `x-user-id` and
//! `x-organization-id`; a missing or malformed value is rejected with 401
//! before any handler runs.
//!
//! | Error kind | Status |
//! |------------|--------|
//! | `NotFound` | 404 |
//! | `Conflict` | 409 |
//! | `Configuration`, `Validation` | 422 |
//! | `Unauthorized` | 401 |
//! | anything else | 500 |
//!
//! Request bodies go through [`JsonBody`], so a malformed body is reported
//! as a 422 with the same `{"error": "..."}` shape.

mod agents;
mod sources;
mod tools;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::error;
use uuid::Uuid;

use crate::application::agent::AgentLifecycleService;
use crate::application::errors::ServiceError;
use crate::application::source::SourceService;
use crate::application::tool::ToolService;
use crate::domain::actor::Actor;
use crate::domain::ids::{OrganizationId, UserId};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const ORGANIZATION_ID_HEADER: &str = "x-organization-id";

pub struct AppState {
    pub agent_service: Arc<dyn AgentLifecycleService>,
    pub tool_service: Arc<dyn ToolService>,
    pub source_service: Arc<dyn SourceService>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        agent_service: Arc<dyn AgentLifecycleService>,
        tool_service: Arc<dyn ToolService>,
        source_service: Arc<dyn SourceService>,
    ) -> Self {
        Self {
            agent_service,
            tool_service,
            source_service,
            start_time: Instant::now(),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(agents::routes())
        .merge(tools::routes())
        .merge(sources::routes())
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "uptime_seconds": state.start_time.elapsed().as_secs(),
    }))
}

/// Error response wrapper rendering `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Configuration(_) | ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Actor resolved from the identity headers
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedActor(pub Actor);

fn header_uuid(parts: &Parts, name: &str) -> Result<Uuid, ApiError> {
    let value = parts
        .headers
        .get(name)
        .ok_or_else(|| ApiError(ServiceError::Unauthorized(format!("Missing {} header", name))))?;
    value
        .to_str()
        .ok()
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .ok_or_else(|| ApiError(ServiceError::Unauthorized(format!("Invalid {} header", name))))
}

impl<S> FromRequestParts<S> for AuthenticatedActor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header_uuid(parts, USER_ID_HEADER)?;
        let organization_id = header_uuid(parts, ORGANIZATION_ID_HEADER)?;
        Ok(AuthenticatedActor(Actor::new(UserId(user_id), OrganizationId(organization_id))))
    }
}

/// JSON request body whose rejection renders through [`ApiError`]
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let extracted = Json::<T>::from_request(req, state).await;
        match extracted {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(ApiError(ServiceError::Validation(rejection.body_text()))),
        }
    }
}
