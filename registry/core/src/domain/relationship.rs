// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Agent Relationship Planning
//!
//! Pure planner for the agent's many-to-many links (tools, sources, core
//! memory). Given the current link set, the resolved targets and a
//! [`LinkMode`], [`plan_links`] returns the explicit inserts and deletes a
//! transaction must apply. No storage is touched here, so replace/extend
//! semantics can be tested without a database.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::ids::{BlockId, SourceId, ToolId};

/// The three many-to-many relationship kinds an agent owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Tools,
    Sources,
    CoreMemory,
}

impl RelationshipKind {
    /// Human-readable target entity name, used in error messages
    pub fn target_name(&self) -> &'static str {
        match self {
            RelationshipKind::Tools => "Tool",
            RelationshipKind::Sources => "Source",
            RelationshipKind::CoreMemory => "Block",
        }
    }

    pub fn target_table(&self) -> &'static str {
        match self {
            RelationshipKind::Tools => "tools",
            RelationshipKind::Sources => "sources",
            RelationshipKind::CoreMemory => "blocks",
        }
    }

    pub fn link_table(&self) -> &'static str {
        match self {
            RelationshipKind::Tools => "tools_agents",
            RelationshipKind::Sources => "sources_agents",
            RelationshipKind::CoreMemory => "blocks_agents",
        }
    }

    pub fn link_column(&self) -> &'static str {
        match self {
            RelationshipKind::Tools => "tool_id",
            RelationshipKind::Sources => "source_id",
            RelationshipKind::CoreMemory => "block_id",
        }
    }
}

impl std::fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationshipKind::Tools => f.write_str("tools"),
            RelationshipKind::Sources => f.write_str("sources"),
            RelationshipKind::CoreMemory => f.write_str("core_memory"),
        }
    }
}

/// Typed handle for an entity that can sit on the far side of an agent link.
pub trait LinkTarget: Copy + Send + Sync {
    const KIND: RelationshipKind;

    fn as_uuid(&self) -> Uuid;
}

impl LinkTarget for ToolId {
    const KIND: RelationshipKind = RelationshipKind::Tools;

    fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl LinkTarget for SourceId {
    const KIND: RelationshipKind = RelationshipKind::Sources;

    fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl LinkTarget for BlockId {
    const KIND: RelationshipKind = RelationshipKind::CoreMemory;

    fn as_uuid(&self) -> Uuid {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkMode {
    /// The link set becomes exactly the requested targets
    Replace,
    /// Requested targets are added; an existing pair is a conflict
    Extend,
}

/// Explicit changes to apply to one relationship set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPlan {
    pub inserts: Vec<Uuid>,
    pub deletes: Vec<Uuid>,
}

impl LinkPlan {
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.deletes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("already linked: {}", join_ids(.0))]
    AlreadyLinked(Vec<Uuid>),
}

/// Compute the inserts and deletes that take `current` to the state
/// requested by `resolved` under `mode`. Duplicates in `resolved` collapse;
/// output order follows input order.
pub fn plan_links(current: &[Uuid], resolved: &[Uuid], mode: LinkMode) -> Result<LinkPlan, LinkError> {
    let current_set: HashSet<Uuid> = current.iter().copied().collect();
    let desired = dedup_preserving_order(resolved);

    match mode {
        LinkMode::Replace => {
            let desired_set: HashSet<Uuid> = desired.iter().copied().collect();
            let deletes = dedup_preserving_order(current)
                .into_iter()
                .filter(|id| !desired_set.contains(id))
                .collect();
            let inserts = desired
                .into_iter()
                .filter(|id| !current_set.contains(id))
                .collect();
            Ok(LinkPlan { inserts, deletes })
        }
        LinkMode::Extend => {
            let duplicates: Vec<Uuid> = desired
                .iter()
                .copied()
                .filter(|id| current_set.contains(id))
                .collect();
            if !duplicates.is_empty() {
                return Err(LinkError::AlreadyLinked(duplicates));
            }
            Ok(LinkPlan { inserts: desired, deletes: Vec::new() })
        }
    }
}

/// IDs in `requested` that did not resolve.
pub fn missing_targets(requested: &[Uuid], resolved: &[Uuid]) -> Vec<Uuid> {
    let resolved: HashSet<Uuid> = resolved.iter().copied().collect();
    dedup_preserving_order(requested)
        .into_iter()
        .filter(|id| !resolved.contains(id))
        .collect()
}

pub(crate) fn join_ids(ids: &[Uuid]) -> String {
    ids.iter().map(Uuid::to_string).collect::<Vec<_>>().join(", ")
}

fn dedup_preserving_order(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
