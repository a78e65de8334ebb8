//! Member snapshot model.
//!
//! # Invariants
//! - `roles` is the full set of roles held at fetch time.
//! - `joined_at = None` means the platform did not report a join date.

use crate::model::ids::{RoleId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Read-only view of one guild member, fetched per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSnapshot {
    pub user_id: UserId,
    /// Name used in log lines only.
    pub name: String,
    pub joined_at: Option<DateTime<Utc>>,
    pub roles: BTreeSet<RoleId>,
}

impl MemberSnapshot {
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
            joined_at: None,
            roles: BTreeSet::new(),
        }
    }

    pub fn joined(mut self, joined_at: DateTime<Utc>) -> Self {
        self.joined_at = Some(joined_at);
        self
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = RoleId>) -> Self {
        self.roles.extend(roles);
        self
    }

    pub fn holds(&self, role: RoleId) -> bool {
        self.roles.contains(&role)
    }
}
