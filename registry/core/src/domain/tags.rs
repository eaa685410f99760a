// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::collections::BTreeSet;

/// Tags to add and remove for one agent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPlan {
    pub add: Vec<String>,
    pub remove: Vec<String>,
}

impl TagPlan {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

/// Reconcile the current tag set with `requested`.
///
/// Comparison is exact and case-sensitive. With `replace` the result set is
/// exactly the de-duplicated request; without it tags are only added.
pub fn plan_tags(current: &[String], requested: &[String], replace: bool) -> TagPlan {
    let current: BTreeSet<&str> = current.iter().map(String::as_str).collect();
    let requested: BTreeSet<&str> = requested.iter().map(String::as_str).collect();

    let add = requested
        .difference(&current)
        .map(|t| t.to_string())
        .collect();
    let remove = if replace {
        current.difference(&requested).map(|t| t.to_string()).collect()
    } else {
        Vec::new()
    };

    TagPlan { add, remove }
}
