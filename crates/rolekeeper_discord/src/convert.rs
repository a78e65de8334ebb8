//! Platform model to core snapshot conversion.

use chrono::{DateTime, Utc};
use rolekeeper_core::{GuildId, MemberSnapshot, RoleId, UserId};
use serenity::all::{
    GuildId as PlatformGuildId, Member, RoleId as PlatformRoleId, Timestamp,
    UserId as PlatformUserId,
};

pub fn member_snapshot(member: &Member) -> MemberSnapshot {
    MemberSnapshot {
        user_id: UserId(member.user.id.get()),
        name: member.user.name.clone(),
        joined_at: member.joined_at.and_then(|joined| to_utc(&joined)),
        roles: member.roles.iter().map(|role| RoleId(role.get())).collect(),
    }
}

/// Converts a platform timestamp; `None` when out of chrono's range.
pub fn to_utc(timestamp: &Timestamp) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(timestamp.unix_timestamp(), 0)
}

// Core ids are validated non-zero at config load; platform ids are non-zero by construction.
pub fn platform_guild(id: GuildId) -> PlatformGuildId {
    PlatformGuildId::new(id.get())
}

pub fn platform_user(id: UserId) -> PlatformUserId {
    PlatformUserId::new(id.get())
}

pub fn platform_role(id: RoleId) -> PlatformRoleId {
    PlatformRoleId::new(id.get())
}

#[cfg(test)]
mod tests {
    use super::{platform_role, to_utc};
    use chrono::{TimeZone, Utc};
    use rolekeeper_core::RoleId;
    use serenity::all::Timestamp;

    #[test]
    fn timestamp_converts_to_utc_instant() {
        let expected = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let timestamp =
            Timestamp::from_unix_timestamp(expected.timestamp()).expect("valid timestamp");
        assert_eq!(to_utc(&timestamp), Some(expected));
    }

    #[test]
    fn role_id_keeps_snowflake_value() {
        assert_eq!(platform_role(RoleId(1234)).get(), 1234);
    }
}
