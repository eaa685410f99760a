// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Store Factory - Application Layer
//!
//! Creates the concrete [`AgentStore`] selected by the configured
//! [`StorageBackend`]. Keeps the domain layer free of infrastructure types.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Wire a storage backend into the services

use std::sync::Arc;
use tracing::info;

use crate::domain::repository::{AgentStore, RepositoryError, StorageBackend};
use crate::infrastructure::db::Database;
use crate::infrastructure::repositories::postgres::PostgresAgentStore;
use crate::infrastructure::repositories::InMemoryAgentStore;

/// Creates an AgentStore implementation based on the configured backend.
/// For PostgreSQL the pool is connected and, when `run_migrations` is set,
/// the bundled schema migrations are applied.
pub async fn create_agent_store(
    backend: &StorageBackend,
    run_migrations: bool,
) -> Result<Arc<dyn AgentStore>, RepositoryError> {
    match backend {
        StorageBackend::InMemory => {
            info!("Using in-memory agent store");
            Ok(Arc::new(InMemoryAgentStore::new()))
        }
        StorageBackend::PostgreSQL(config) => {
            info!("Connecting to PostgreSQL (max_connections: {})", config.max_connections);
            let db = Database::new(&config.connection_string, config.max_connections).await?;
            if run_migrations {
                db.run_migrations().await?;
            }
            Ok(Arc::new(PostgresAgentStore::new(db.get_pool().clone())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::actor::Actor;
    use crate::domain::ids::{OrganizationId, UserId};
    use crate::domain::source::{CreateSource, Source};

    #[tokio::test]
    async fn test_in_memory_backend() {
        let store = create_agent_store(&StorageBackend::InMemory, true).await.unwrap();
        let actor = Actor::new(UserId::new(), OrganizationId::new());

        let mut tx = store.begin().await.unwrap();
        tx.insert_source(&Source::new(&CreateSource::new("docs"), &actor)).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.list_sources(actor.organization_id).await.unwrap().len(), 1);
    }
}
