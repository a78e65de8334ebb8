//! Join-date based grant planning.

use crate::model::ids::RoleId;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeSet;

/// Members who joined strictly before this instant qualify for the legacy role.
pub fn default_join_cutoff() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 12, 12, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// The two roles the policy manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetRoles {
    pub legacy: RoleId,
    pub current: RoleId,
}

/// Ordered set of roles to grant; legacy first when both are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantPlan {
    grants: Vec<RoleId>,
}

impl GrantPlan {
    pub fn roles(&self) -> &[RoleId] {
        &self.grants
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn contains(&self, role: RoleId) -> bool {
        self.grants.contains(&role)
    }

    /// Returns the role set a member would hold once every grant succeeded.
    pub fn applied_to(&self, held: &BTreeSet<RoleId>) -> BTreeSet<RoleId> {
        let mut after = held.clone();
        after.extend(self.grants.iter().copied());
        after
    }

    fn push_unless_held(&mut self, role: RoleId, held: &BTreeSet<RoleId>) {
        if !held.contains(&role) && !self.grants.contains(&role) {
            self.grants.push(role);
        }
    }
}

/// Plans role grants for one member.
///
/// - Legacy role: only when `joined_at` is known and strictly before `cutoff`.
/// - Current role: always, when not held.
///
/// An unknown join date skips the legacy check without failing.
pub fn plan_grants(
    joined_at: Option<DateTime<Utc>>,
    held: &BTreeSet<RoleId>,
    targets: TargetRoles,
    cutoff: DateTime<Utc>,
) -> GrantPlan {
    let mut plan = GrantPlan::default();
    if joined_at.is_some_and(|joined| joined < cutoff) {
        plan.push_unless_held(targets.legacy, held);
    }
    plan.push_unless_held(targets.current, held);
    plan
}

#[cfg(test)]
mod tests {
    use super::{default_join_cutoff, plan_grants, TargetRoles};
    use crate::model::ids::RoleId;
    use chrono::{Duration, TimeZone, Utc};
    use std::collections::BTreeSet;

    const TARGETS: TargetRoles = TargetRoles {
        legacy: RoleId(2024),
        current: RoleId(2025),
    };

    #[test]
    fn default_cutoff_is_december_twelfth_utc() {
        let expected = Utc.with_ymd_and_hms(2024, 12, 12, 0, 0, 0).unwrap();
        assert_eq!(default_join_cutoff(), expected);
    }

    #[test]
    fn joining_exactly_at_cutoff_is_not_legacy() {
        let cutoff = default_join_cutoff();
        let plan = plan_grants(Some(cutoff), &BTreeSet::new(), TARGETS, cutoff);
        assert_eq!(plan.roles(), &[RoleId(2025)]);

        let plan = plan_grants(
            Some(cutoff - Duration::seconds(1)),
            &BTreeSet::new(),
            TARGETS,
            cutoff,
        );
        assert_eq!(plan.roles(), &[RoleId(2024), RoleId(2025)]);
    }

    #[test]
    fn identical_target_roles_are_planned_once() {
        let same = TargetRoles {
            legacy: RoleId(7),
            current: RoleId(7),
        };
        let cutoff = default_join_cutoff();
        let plan = plan_grants(
            Some(cutoff - Duration::days(1)),
            &BTreeSet::new(),
            same,
            cutoff,
        );
        assert_eq!(plan.roles(), &[RoleId(7)]);
    }
}
