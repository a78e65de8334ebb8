use chrono::{TimeZone, Utc};
use rolekeeper_core::config::{
    ENV_ADMIN_CONTACT_ID, ENV_BOT_TOKEN, ENV_CURRENT_ROLE_ID, ENV_GUILD_ID, ENV_JOIN_CUTOFF,
    ENV_LEGACY_ROLE_ID, ENV_LOG_DIR, ENV_LOG_LEVEL,
};
use rolekeeper_core::{default_join_cutoff, BotConfig, ConfigError, GuildId, RoleId, UserId};
use std::collections::HashMap;
use std::path::PathBuf;

fn base_env() -> HashMap<&'static str, String> {
    HashMap::from([
        (ENV_LEGACY_ROLE_ID, "111".to_string()),
        (ENV_CURRENT_ROLE_ID, "222".to_string()),
        (ENV_GUILD_ID, "333".to_string()),
        (ENV_ADMIN_CONTACT_ID, "444".to_string()),
        (ENV_BOT_TOKEN, "secret-token".to_string()),
    ])
}

fn load(env: &HashMap<&'static str, String>) -> Result<BotConfig, ConfigError> {
    BotConfig::from_lookup(|key| env.get(key).cloned())
}

#[test]
fn loads_required_values_with_defaults() {
    let config = load(&base_env()).expect("complete env should load");

    assert_eq!(config.targets.legacy, RoleId(111));
    assert_eq!(config.targets.current, RoleId(222));
    assert_eq!(config.guild_id, GuildId(333));
    assert_eq!(config.admin_contact, UserId(444));
    assert_eq!(config.token(), "secret-token");
    assert_eq!(config.join_cutoff, default_join_cutoff());
    assert_eq!(config.log_dir, PathBuf::from("logs"));
}

#[test]
fn each_missing_required_variable_is_reported() {
    for key in [
        ENV_LEGACY_ROLE_ID,
        ENV_CURRENT_ROLE_ID,
        ENV_GUILD_ID,
        ENV_ADMIN_CONTACT_ID,
        ENV_BOT_TOKEN,
    ] {
        let mut env = base_env();
        env.remove(key);
        assert_eq!(load(&env).expect_err("missing key must fail"), ConfigError::Missing(key));

        let mut env = base_env();
        env.insert(key, "   ".to_string());
        assert_eq!(load(&env).expect_err("blank key must fail"), ConfigError::Missing(key));
    }
}

#[test]
fn non_numeric_id_is_rejected() {
    let mut env = base_env();
    env.insert(ENV_GUILD_ID, "my-guild".to_string());

    let err = load(&env).expect_err("non-numeric id must fail");
    assert_eq!(
        err,
        ConfigError::InvalidId {
            key: ENV_GUILD_ID,
            value: "my-guild".to_string(),
        }
    );
    assert!(err.to_string().contains(ENV_GUILD_ID));
}

#[test]
fn optional_overrides_are_applied() {
    let mut env = base_env();
    env.insert(ENV_JOIN_CUTOFF, "2025-06-01T12:00:00+02:00".to_string());
    env.insert(ENV_LOG_DIR, "/var/log/rolekeeper".to_string());
    env.insert(ENV_LOG_LEVEL, "WARNING".to_string());

    let config = load(&env).expect("overrides should load");
    assert_eq!(
        config.join_cutoff,
        Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap()
    );
    assert_eq!(config.log_dir, PathBuf::from("/var/log/rolekeeper"));
    assert_eq!(config.log_level, "warn");
}

#[test]
fn malformed_overrides_are_rejected() {
    let mut env = base_env();
    env.insert(ENV_JOIN_CUTOFF, "2024-12-12".to_string());
    assert!(matches!(load(&env), Err(ConfigError::InvalidCutoff(_))));

    let mut env = base_env();
    env.insert(ENV_LOG_LEVEL, "chatty".to_string());
    assert!(matches!(load(&env), Err(ConfigError::InvalidLogLevel(_))));
}

#[test]
fn debug_output_redacts_token() {
    let config = load(&base_env()).expect("complete env should load");
    let debug = format!("{config:?}");
    assert!(!debug.contains("secret-token"));
    assert!(debug.contains("<redacted>"));
}

#[test]
fn zero_id_is_rejected() {
    let mut env = base_env();
    env.insert(ENV_LEGACY_ROLE_ID, "0".to_string());
    assert!(matches!(
        load(&env),
        Err(ConfigError::InvalidId {
            key: ENV_LEGACY_ROLE_ID,
            ..
        })
    ));
}
