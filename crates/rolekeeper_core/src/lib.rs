//! Core domain logic for rolekeeper.
//! This crate is the single source of truth for role-assignment invariants.

pub mod command;
pub mod config;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod policy;
pub mod service;

pub use command::registry::{
    CommandAccess, CommandKind, CommandRegistry, CommandSpec, ReplyMode, UPDATE_ALL_COMMAND,
    UPDATE_COMMAND,
};
pub use command::reply::{CommandReply, ReplyOutcome};
pub use config::{BotConfig, ConfigError};
pub use gateway::{GatewayError, GatewayResult, GuildGateway};
pub use logging::{default_log_level, init_session_logging, logging_status};
pub use model::ids::{GuildId, RoleId, UserId};
pub use model::member::MemberSnapshot;
pub use policy::reconcile::{default_join_cutoff, plan_grants, GrantPlan, TargetRoles};
pub use service::role_service::{
    CommandInvocation, GrantOutcome, JoinOutcome, RoleService, RoleServiceError, SweepReport,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
