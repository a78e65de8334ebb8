//! Guild gateway contract.
//!
//! # Responsibility
//! - Define the only path by which core reads guild state or mutates roles.
//! - Keep platform client types out of core signatures.
//!
//! # Invariants
//! - A gateway is bound to exactly one guild.
//! - Every call is one suspension point; implementations do not retry.

use crate::model::ids::{GuildId, RoleId, UserId};
use crate::model::member::MemberSnapshot;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Platform call failure, with the detail kept for logs only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    Request {
        operation: &'static str,
        detail: String,
    },
}

impl GatewayError {
    pub fn request(operation: &'static str, detail: impl Into<String>) -> Self {
        Self::Request {
            operation,
            detail: detail.into(),
        }
    }
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Request { operation, detail } => write!(f, "{operation} failed: {detail}"),
        }
    }
}

impl Error for GatewayError {}

/// Read/mutate access to one guild.
#[async_trait]
pub trait GuildGateway: Send + Sync {
    fn guild_id(&self) -> GuildId;

    /// Returns whether `role` exists in the guild.
    async fn role_exists(&self, role: RoleId) -> GatewayResult<bool>;

    /// Fetches one member; `Ok(None)` when the user is not a guild member.
    async fn member(&self, user: UserId) -> GatewayResult<Option<MemberSnapshot>>;

    /// Fetches every guild member, in platform order.
    async fn members(&self) -> GatewayResult<Vec<MemberSnapshot>>;

    async fn grant_role(&self, user: UserId, role: RoleId) -> GatewayResult<()>;
}
