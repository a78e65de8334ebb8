//! Process configuration loaded once at startup.
//!
//! # Responsibility
//! - Read required ids and the auth token from the environment.
//! - Fail fast with a typed error before any platform connection is made.
//!
//! # Invariants
//! - `BotConfig` is immutable after construction and shared by `Arc`.
//! - The auth token never appears in `Debug` output.

use crate::logging::{default_log_level, normalize_level};
use crate::model::ids::{GuildId, RoleId, UserId};
use crate::policy::reconcile::{default_join_cutoff, TargetRoles};
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;

pub const ENV_LEGACY_ROLE_ID: &str = "LEGACY_ROLE_ID";
pub const ENV_CURRENT_ROLE_ID: &str = "CURRENT_ROLE_ID";
pub const ENV_GUILD_ID: &str = "GUILD_ID";
pub const ENV_ADMIN_CONTACT_ID: &str = "ADMIN_CONTACT_ID";
pub const ENV_BOT_TOKEN: &str = "BOT_TOKEN";
pub const ENV_JOIN_CUTOFF: &str = "JOIN_CUTOFF";
pub const ENV_LOG_DIR: &str = "LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

const DEFAULT_LOG_DIR: &str = "logs";

/// Startup configuration errors. All of them are fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    InvalidId { key: &'static str, value: String },
    InvalidCutoff(String),
    InvalidLogLevel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "missing environment variable: {key}"),
            Self::InvalidId { key, value } => {
                write!(f, "environment variable {key} is not a numeric id: `{value}`")
            }
            Self::InvalidCutoff(value) => write!(
                f,
                "environment variable {ENV_JOIN_CUTOFF} is not an RFC 3339 instant: `{value}`"
            ),
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ConfigError {}

/// Immutable bot configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct BotConfig {
    pub guild_id: GuildId,
    pub targets: TargetRoles,
    /// Mentioned in every user-facing error reply.
    pub admin_contact: UserId,
    pub join_cutoff: DateTime<Utc>,
    pub log_dir: PathBuf,
    pub log_level: &'static str,
    token: String,
}

impl BotConfig {
    /// Builds a config from explicit values, using defaults for optional fields.
    pub fn new(
        guild_id: GuildId,
        targets: TargetRoles,
        admin_contact: UserId,
        token: impl Into<String>,
    ) -> Self {
        Self {
            guild_id,
            targets,
            admin_contact,
            join_cutoff: default_join_cutoff(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            log_level: default_log_level(),
            token: token.into(),
        }
    }

    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    /// - `Missing` when a required variable is absent or blank.
    /// - `InvalidId` when an id variable is not a non-zero unsigned integer.
    /// - `InvalidCutoff` / `InvalidLogLevel` for malformed optional overrides.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let legacy: RoleId = required_id(&lookup, ENV_LEGACY_ROLE_ID)?;
        let current: RoleId = required_id(&lookup, ENV_CURRENT_ROLE_ID)?;
        let guild_id: GuildId = required_id(&lookup, ENV_GUILD_ID)?;
        let admin_contact: UserId = required_id(&lookup, ENV_ADMIN_CONTACT_ID)?;
        let token = required(&lookup, ENV_BOT_TOKEN)?;

        let mut config = Self::new(guild_id, TargetRoles { legacy, current }, admin_contact, token);

        if let Some(raw) = optional(&lookup, ENV_JOIN_CUTOFF) {
            config.join_cutoff = DateTime::parse_from_rfc3339(&raw)
                .map(|instant| instant.with_timezone(&Utc))
                .map_err(|_| ConfigError::InvalidCutoff(raw))?;
        }
        if let Some(raw) = optional(&lookup, ENV_LOG_DIR) {
            config.log_dir = PathBuf::from(raw);
        }
        if let Some(raw) = optional(&lookup, ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&raw).map_err(ConfigError::InvalidLogLevel)?;
        }

        Ok(config)
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl Debug for BotConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("guild_id", &self.guild_id)
            .field("targets", &self.targets)
            .field("admin_contact", &self.admin_contact)
            .field("join_cutoff", &self.join_cutoff)
            .field("log_dir", &self.log_dir)
            .field("log_level", &self.log_level)
            .field("token", &"<redacted>")
            .finish()
    }
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or(ConfigError::Missing(key))
}

// Snowflakes are non-zero on the platform side.
fn required_id<F, T>(lookup: &F, key: &'static str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: From<u64>,
{
    let raw = required(lookup, key)?;
    match raw.parse::<u64>() {
        Ok(id) if id != 0 => Ok(T::from(id)),
        _ => Err(ConfigError::InvalidId { key, value: raw }),
    }
}
