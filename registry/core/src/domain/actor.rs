// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use serde::{Deserialize, Serialize};
use crate::domain::ids::{OrganizationId, UserId};

/// Authenticated principal performing an operation.
///
/// Every service call takes an `Actor`; its organization is the scope all
/// reads and writes are filtered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub organization_id: OrganizationId,
}

impl Actor {
    pub fn new(user_id: UserId, organization_id: OrganizationId) -> Self {
        Self { user_id, organization_id }
    }
}
