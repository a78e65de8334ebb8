use chrono::{TimeZone, Utc};
use rolekeeper_core::{MemberSnapshot, RoleId, UserId};

#[test]
fn snapshot_builder_collects_roles_and_join_date() {
    let joined = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let member = MemberSnapshot::new(UserId(7), "ada")
        .joined(joined)
        .with_roles([RoleId(1), RoleId(2), RoleId(1)]);

    assert_eq!(member.joined_at, Some(joined));
    assert_eq!(member.roles.len(), 2);
    assert!(member.holds(RoleId(2)));
    assert!(!member.holds(RoleId(3)));
}

#[test]
fn snapshot_serializes_ids_as_plain_numbers() {
    let member = MemberSnapshot::new(UserId(7), "ada").with_roles([RoleId(9)]);

    let json = serde_json::to_value(&member).unwrap();
    assert_eq!(json["user_id"], 7);
    assert_eq!(json["roles"], serde_json::json!([9]));
    assert!(json["joined_at"].is_null());
}
