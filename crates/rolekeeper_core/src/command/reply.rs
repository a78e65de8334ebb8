//! User-facing reply texts.
//!
//! # Invariants
//! - Error replies never carry failure detail; detail goes to the log.

use crate::model::ids::UserId;

pub const ROLES_UPDATED: &str = "Roles updated!";
pub const GUILD_ONLY: &str = "This command can only be used in a server.";

/// Reply produced by a command handler for the adapter to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    pub content: String,
    pub ephemeral: bool,
    pub outcome: ReplyOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    Success,
    Error,
}

impl CommandReply {
    pub fn roles_updated() -> Self {
        Self::success(ROLES_UPDATED, true)
    }

    pub fn sweep_complete(count: usize) -> Self {
        Self::success(format!("Updated {count} members roles."), false)
    }

    pub fn guild_only() -> Self {
        Self {
            content: GUILD_ONLY.to_string(),
            ephemeral: true,
            outcome: ReplyOutcome::Error,
        }
    }

    /// Generic failure reply pointing the user at `admin_contact`.
    pub fn generic_error(admin_contact: UserId) -> Self {
        Self {
            content: format!(
                "There was a problem executing that command. Please ask {} for assistance.",
                admin_contact.mention()
            ),
            ephemeral: true,
            outcome: ReplyOutcome::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.outcome == ReplyOutcome::Error
    }

    fn success(content: impl Into<String>, ephemeral: bool) -> Self {
        Self {
            content: content.into(),
            ephemeral,
            outcome: ReplyOutcome::Success,
        }
    }
}
