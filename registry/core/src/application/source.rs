// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use async_trait::async_trait;

use crate::application::errors::ServiceResult;
use crate::domain::actor::Actor;
use crate::domain::ids::SourceId;
use crate::domain::source::{CreateSource, Source};

#[async_trait]
pub trait SourceService: Send + Sync {
    /// `Conflict` if the name is taken in the organization
    async fn create_source(&self, create: CreateSource, actor: &Actor) -> ServiceResult<Source>;

    async fn get_source(&self, source_id: SourceId, actor: &Actor) -> ServiceResult<Source>;

    async fn list_sources(&self, actor: &Actor) -> ServiceResult<Vec<Source>>;

    /// Removes the source and every agent link to it
    async fn delete_source(&self, source_id: SourceId, actor: &Actor) -> ServiceResult<Source>;
}
