// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::application::errors::{ServiceError, ServiceResult};
use crate::application::finish;
use crate::application::source::SourceService;
use crate::domain::actor::Actor;
use crate::domain::ids::SourceId;
use crate::domain::repository::{AgentStore, RepositoryError, StoreTransaction};
use crate::domain::source::{CreateSource, Source};

pub struct StandardSourceService {
    store: Arc<dyn AgentStore>,
}

impl StandardSourceService {
    pub fn new(store: Arc<dyn AgentStore>) -> Self {
        Self { store }
    }

    async fn require_source(tx: &mut dyn StoreTransaction, source_id: SourceId, actor: &Actor) -> ServiceResult<Source> {
        tx.find_source(source_id, actor.organization_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Source", source_id))
    }
}

#[async_trait]
impl SourceService for StandardSourceService {
    async fn create_source(&self, create: CreateSource, actor: &Actor) -> ServiceResult<Source> {
        if create.name.trim().is_empty() {
            return Err(ServiceError::Validation("Source name cannot be empty".to_string()));
        }

        let source = Source::new(&create, actor);
        let mut tx = self.store.begin().await?;
        let result = tx.insert_source(&source).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => ServiceError::Conflict(format!(
                "Source '{}' already exists in organization {}",
                source.name, actor.organization_id
            )),
            other => other.into(),
        });
        finish(tx, result).await?;

        info!("Source '{}' created (id: {})", source.name, source.id);
        Ok(source)
    }

    async fn get_source(&self, source_id: SourceId, actor: &Actor) -> ServiceResult<Source> {
        let mut tx = self.store.begin().await?;
        let result = Self::require_source(tx.as_mut(), source_id, actor).await;
        finish(tx, result).await
    }

    async fn list_sources(&self, actor: &Actor) -> ServiceResult<Vec<Source>> {
        let mut tx = self.store.begin().await?;
        let result = tx.list_sources(actor.organization_id).await.map_err(ServiceError::from);
        finish(tx, result).await
    }

    async fn delete_source(&self, source_id: SourceId, actor: &Actor) -> ServiceResult<Source> {
        info!("Deleting source {}", source_id);

        let mut tx = self.store.begin().await?;
        let found = Self::require_source(tx.as_mut(), source_id, actor).await;
        let result = match found {
            Ok(source) => tx.delete_source(source.id).await.map(|_| source).map_err(ServiceError::from),
            Err(e) => Err(e),
        };
        finish(tx, result).await
    }
}
