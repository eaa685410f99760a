// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Relationship Linker
//!
//! Attaches or replaces an agent's tools, sources or core-memory blocks
//! inside the caller's transaction. Targets are resolved against the
//! owner's organization, the pure [`plan_links`] planner decides the
//! inserts and deletes, and the plan is applied on the same handle.
//! The linker never commits.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Resolve, plan and apply many-to-many link changes

use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

use crate::application::errors::{ServiceError, ServiceResult};
use crate::domain::agent::Agent;
use crate::domain::relationship::{join_ids, missing_targets, plan_links, LinkMode, LinkPlan, LinkTarget};
use crate::domain::repository::StoreTransaction;

/// Link `targets` to `owner` according to `mode`.
///
/// With `allow_partial == false` any ID that does not resolve in the owner's
/// organization fails the call with `NotFound` naming every missing ID, and
/// nothing is written. With `allow_partial == true` such IDs are skipped.
pub async fn link<T: LinkTarget>(
    tx: &mut dyn StoreTransaction,
    owner: &Agent,
    targets: &[T],
    mode: LinkMode,
    allow_partial: bool,
) -> ServiceResult<LinkPlan> {
    let kind = T::KIND;
    let requested: Vec<Uuid> = targets.iter().map(|t| t.as_uuid()).collect();

    let resolved = if requested.is_empty() {
        Vec::new()
    } else {
        tx.resolve_targets(kind, &requested, owner.organization_id).await?
    };

    let missing = missing_targets(&requested, &resolved);
    if !missing.is_empty() && !allow_partial {
        return Err(ServiceError::NotFound(format!(
            "{} not found in organization {}: {}",
            kind.target_name(),
            owner.organization_id,
            join_ids(&missing)
        )));
    }

    // Keep the caller's ordering for the targets that did resolve
    let resolved_set: HashSet<Uuid> = resolved.into_iter().collect();
    let ordered: Vec<Uuid> = requested.into_iter().filter(|id| resolved_set.contains(id)).collect();

    let current = tx.linked_ids(owner.id, kind).await?;
    let plan = plan_links(&current, &ordered, mode)?;
    if plan.is_empty() {
        debug!(agent_id = %owner.id, relationship = %kind, "Links already up to date");
        return Ok(plan);
    }

    if !plan.deletes.is_empty() {
        tx.delete_links(owner.id, kind, &plan.deletes).await?;
    }
    if !plan.inserts.is_empty() {
        tx.insert_links(owner.id, kind, &plan.inserts).await?;
    }

    debug!(
        agent_id = %owner.id,
        relationship = %kind,
        inserted = plan.inserts.len(),
        deleted = plan.deletes.len(),
        skipped = missing.len(),
        "Applied link plan"
    );

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::actor::Actor;
    use crate::domain::agent::{AgentType, CreateAgent};
    use crate::domain::ids::{OrganizationId, ToolId, UserId};
    use crate::domain::llm::{EmbeddingConfig, LlmConfig};
    use crate::domain::repository::AgentStore;
    use crate::domain::tool::{CreateTool, Tool};
    use crate::infrastructure::repositories::InMemoryAgentStore;
    use serde_json::json;

    fn tool(name: &str, actor: &Actor) -> Tool {
        Tool::new(
            &CreateTool {
                name: Some(name.to_string()),
                description: None,
                source_type: "python".to_string(),
                source_code: String::new(),
                json_schema: json!({}),
                tags: vec![],
            },
            actor,
        )
        .unwrap()
    }

    async fn seeded(actor: &Actor) -> (InMemoryAgentStore, Agent, Vec<ToolId>) {
        let store = InMemoryAgentStore::new();
        let mut tx = store.begin().await.unwrap();
        let agent = Agent::new(
            &CreateAgent::new(
                "linker",
                AgentType::MemgptAgent,
                LlmConfig::new("gpt-4o-mini", "openai", 8192),
                EmbeddingConfig::new("text-embedding-3-small", "openai", 1536),
            ),
            AgentType::MemgptAgent,
            "system".to_string(),
            actor,
        );
        tx.insert_agent(&agent).await.unwrap();
        let mut ids = Vec::new();
        for name in ["a", "b", "c"] {
            let t = tool(name, actor);
            ids.push(t.id);
            tx.insert_tool(&t).await.unwrap();
        }
        tx.commit().await.unwrap();
        (store, agent, ids)
    }

    #[tokio::test]
    async fn test_missing_target_names_every_id() {
        let actor = Actor::new(UserId::new(), OrganizationId::new());
        let (store, agent, ids) = seeded(&actor).await;
        let ghost_a = ToolId::new();
        let ghost_b = ToolId::new();

        let mut tx = store.begin().await.unwrap();
        let err = link(tx.as_mut(), &agent, &[ids[0], ghost_a, ghost_b], LinkMode::Replace, false)
            .await
            .unwrap_err();
        match err {
            ServiceError::NotFound(msg) => {
                assert!(msg.contains(&ghost_a.to_string()));
                assert!(msg.contains(&ghost_b.to_string()));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(tx.linked_ids(agent.id, ToolId::KIND).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_partial_link_skips_missing() {
        let actor = Actor::new(UserId::new(), OrganizationId::new());
        let (store, agent, ids) = seeded(&actor).await;

        let mut tx = store.begin().await.unwrap();
        let plan = link(tx.as_mut(), &agent, &[ToolId::new(), ids[1]], LinkMode::Extend, true)
            .await
            .unwrap();
        assert_eq!(plan.inserts, vec![ids[1].0]);
    }

    #[tokio::test]
    async fn test_replace_then_extend_conflict() {
        let actor = Actor::new(UserId::new(), OrganizationId::new());
        let (store, agent, ids) = seeded(&actor).await;

        let mut tx = store.begin().await.unwrap();
        link(tx.as_mut(), &agent, &[ids[0], ids[1]], LinkMode::Replace, false).await.unwrap();
        let plan = link(tx.as_mut(), &agent, &[ids[1], ids[2]], LinkMode::Replace, false).await.unwrap();
        assert_eq!(plan.deletes, vec![ids[0].0]);
        assert_eq!(plan.inserts, vec![ids[2].0]);

        let err = link(tx.as_mut(), &agent, &[ids[2]], LinkMode::Extend, false).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_other_organization_targets_do_not_resolve() {
        let actor = Actor::new(UserId::new(), OrganizationId::new());
        let (store, agent, _) = seeded(&actor).await;
        let outsider = Actor::new(UserId::new(), OrganizationId::new());
        let foreign = tool("foreign", &outsider);

        let mut tx = store.begin().await.unwrap();
        tx.insert_tool(&foreign).await.unwrap();
        let err = link(tx.as_mut(), &agent, &[foreign.id], LinkMode::Extend, false).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_relinking_same_targets_is_a_no_op() {
        let actor = Actor::new(UserId::new(), OrganizationId::new());
        let (store, agent, ids) = seeded(&actor).await;

        let mut tx = store.begin().await.unwrap();
        link(tx.as_mut(), &agent, &[ids[0], ids[1]], LinkMode::Replace, false).await.unwrap();
        let plan = link(tx.as_mut(), &agent, &[ids[1], ids[0]], LinkMode::Replace, false).await.unwrap();
        assert!(plan.is_empty());

        let mut linked = tx.linked_ids(agent.id, ToolId::KIND).await.unwrap();
        linked.sort();
        let mut expected = vec![ids[0].0, ids[1].0];
        expected.sort();
        assert_eq!(linked, expected);
    }
}
