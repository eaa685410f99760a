// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Tag Synchronizer
//!
//! Reconciles an agent's tag set inside the caller's transaction using the
//! pure [`plan_tags`] planner.

use tracing::debug;

use crate::application::errors::ServiceResult;
use crate::domain::ids::AgentId;
use crate::domain::repository::StoreTransaction;
use crate::domain::tags::{plan_tags, TagPlan};

/// `replace == true` makes the stored set exactly `tags`; otherwise missing
/// tags are only added.
pub async fn sync_tags(
    tx: &mut dyn StoreTransaction,
    agent_id: AgentId,
    tags: &[String],
    replace: bool,
) -> ServiceResult<TagPlan> {
    let current = tx.agent_tags(agent_id).await?;
    let plan = plan_tags(&current, tags, replace);
    if plan.is_empty() {
        debug!(%agent_id, "Tags already up to date");
        return Ok(plan);
    }

    if !plan.remove.is_empty() {
        tx.delete_tags(agent_id, &plan.remove).await?;
    }
    if !plan.add.is_empty() {
        tx.insert_tags(agent_id, &plan.add).await?;
    }

    debug!(%agent_id, added = plan.add.len(), removed = plan.remove.len(), "Synchronized tags");
    Ok(plan)
}
