//! Role use-case service.
//!
//! # Responsibility
//! - Run the member-join, `update` and `update-all` flows over a gateway.
//! - Translate failure kinds into the single generic reply.
//!
//! # Invariants
//! - Grants are applied one at a time, members strictly in order.
//! - A failed grant is logged and never retried; it does not abort a flow.
//! - `update` rejects an unknown join date; the sweep skips the legacy check.
//! - No mutation is attempted before both target roles are resolved.

use crate::command::registry::{CommandAccess, CommandKind, CommandSpec};
use crate::command::reply::CommandReply;
use crate::config::BotConfig;
use crate::gateway::{GatewayError, GuildGateway};
use crate::model::ids::{GuildId, RoleId, UserId};
use crate::model::member::MemberSnapshot;
use crate::policy::reconcile::{plan_grants, GrantPlan};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Failure kinds of a command flow. Only ever logged, never shown to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleServiceError {
    /// A configured role does not exist in the guild.
    RoleMissing(RoleId),
    /// The invoker is not a member of the guild.
    MemberUnresolved(UserId),
    /// The platform reported no join date for the invoker.
    JoinDateUnknown(UserId),
    /// An administrator command was run without administrator rights.
    NotAdministrator(UserId),
    /// The command came from a guild other than the configured one.
    WrongGuild(GuildId),
    /// At least one planned grant failed; the others were still attempted.
    GrantsFailed { user: UserId, failed: usize },
    Gateway(GatewayError),
}

impl Display for RoleServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RoleMissing(role) => write!(f, "guild has no role with id {role}"),
            Self::MemberUnresolved(user) => write!(f, "could not determine member data for {user}"),
            Self::JoinDateUnknown(user) => write!(f, "could not determine join date for {user}"),
            Self::NotAdministrator(user) => write!(f, "user {user} is not an administrator"),
            Self::WrongGuild(guild) => write!(f, "guild {guild} is not managed by this bot"),
            Self::GrantsFailed { user, failed } => {
                write!(f, "{failed} role grant(s) failed for {user}")
            }
            Self::Gateway(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RoleServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Gateway(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GatewayError> for RoleServiceError {
    fn from(value: GatewayError) -> Self {
        Self::Gateway(value)
    }
}

/// One slash-command call as seen by core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub command: String,
    /// `None` when invoked outside a guild.
    pub guild_id: Option<GuildId>,
    pub invoker: UserId,
    pub invoker_name: String,
    pub invoker_is_admin: bool,
}

/// Result of handling a member-join event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    Granted(RoleId),
    AlreadyHeld(RoleId),
    RoleMissing(RoleId),
    GrantFailed(GatewayError),
    LookupFailed(GatewayError),
    OtherGuild(GuildId),
}

/// Per-member grant results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantOutcome {
    pub granted: Vec<RoleId>,
    pub failed: Vec<(RoleId, GatewayError)>,
}

impl GrantOutcome {
    pub fn any_granted(&self) -> bool {
        !self.granted.is_empty()
    }
}

/// Aggregate of one `update-all` sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub scanned: usize,
    /// Members who received at least one grant.
    pub updated: usize,
    pub failed_grants: usize,
}

/// Use-case service for one guild.
pub struct RoleService<G: GuildGateway> {
    config: Arc<BotConfig>,
    gateway: G,
}

impl<G: GuildGateway> RoleService<G> {
    pub fn new(config: Arc<BotConfig>, gateway: G) -> Self {
        Self { config, gateway }
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Grants the current role to a newly joined member.
    ///
    /// There is no interaction to reply to, so every failure is log-only.
    pub async fn on_member_join(&self, guild_id: GuildId, member: &MemberSnapshot) -> JoinOutcome {
        if guild_id != self.config.guild_id {
            info!(
                "event=member_join module=service status=ignored guild={} user={}",
                guild_id, member.name
            );
            return JoinOutcome::OtherGuild(guild_id);
        }

        let current = self.config.targets.current;
        match self.gateway.role_exists(current).await {
            Ok(true) => {}
            Ok(false) => {
                error!(
                    "event=member_join module=service status=error reason=role_missing guild={} role={}",
                    guild_id, current
                );
                return JoinOutcome::RoleMissing(current);
            }
            Err(err) => {
                error!(
                    "event=member_join module=service status=error reason=role_lookup guild={} role={} error={}",
                    guild_id, current, err
                );
                return JoinOutcome::LookupFailed(err);
            }
        }

        if member.holds(current) {
            info!(
                "event=member_join module=service status=noop user={} role={}",
                member.name, current
            );
            return JoinOutcome::AlreadyHeld(current);
        }

        match self.gateway.grant_role(member.user_id, current).await {
            Ok(()) => {
                info!(
                    "event=member_join module=service status=ok user={} role={} guild={}",
                    member.name, current, guild_id
                );
                JoinOutcome::Granted(current)
            }
            Err(err) => {
                error!(
                    "event=member_join module=service status=error reason=grant user={} role={} error={}",
                    member.name, current, err
                );
                JoinOutcome::GrantFailed(err)
            }
        }
    }

    /// Runs one registered command and returns the reply to deliver.
    pub async fn dispatch(&self, spec: &CommandSpec, invocation: &CommandInvocation) -> CommandReply {
        info!(
            "event=command module=service status=start command={} user={}",
            spec.name, invocation.invoker_name
        );

        let Some(guild_id) = invocation.guild_id else {
            warn!(
                "event=command module=service status=rejected reason=no_guild command={} user={}",
                spec.name, invocation.invoker_name
            );
            return CommandReply::guild_only();
        };

        let result = match self.authorize(spec, invocation, guild_id) {
            Err(err) => Err(err),
            Ok(()) => match spec.kind {
                CommandKind::UpdateSelf => self
                    .update_member(invocation.invoker)
                    .await
                    .map(|_| CommandReply::roles_updated()),
                CommandKind::UpdateAll => self
                    .update_all_members()
                    .await
                    .map(|report| CommandReply::sweep_complete(report.updated)),
            },
        };

        match result {
            Ok(reply) => {
                info!(
                    "event=command module=service status=ok command={} user={}",
                    spec.name, invocation.invoker_name
                );
                reply
            }
            Err(err) => {
                error!(
                    "event=command module=service status=error command={} user={} error={}",
                    spec.name, invocation.invoker_name, err
                );
                CommandReply::generic_error(self.config.admin_contact)
            }
        }
    }

    /// Reconciles the invoking member.
    ///
    /// # Errors
    /// - `RoleMissing` when either target role is absent; nothing is granted.
    /// - `MemberUnresolved` / `JoinDateUnknown` when member state is incomplete.
    /// - `GrantsFailed` when any grant failed after all were attempted.
    pub async fn update_member(&self, user: UserId) -> Result<GrantOutcome, RoleServiceError> {
        self.resolve_target_roles().await?;

        let member = self
            .gateway
            .member(user)
            .await?
            .ok_or(RoleServiceError::MemberUnresolved(user))?;
        let joined_at = member
            .joined_at
            .ok_or(RoleServiceError::JoinDateUnknown(user))?;

        let plan = plan_grants(
            Some(joined_at),
            &member.roles,
            self.config.targets,
            self.config.join_cutoff,
        );
        let outcome = self.apply_plan(&member, &plan).await;
        if outcome.failed.is_empty() {
            Ok(outcome)
        } else {
            Err(RoleServiceError::GrantsFailed {
                user,
                failed: outcome.failed.len(),
            })
        }
    }

    /// Reconciles every guild member in order.
    ///
    /// # Errors
    /// - `RoleMissing` when either target role is absent.
    /// - `Gateway` when the member list cannot be fetched; the sweep aborts.
    pub async fn update_all_members(&self) -> Result<SweepReport, RoleServiceError> {
        self.resolve_target_roles().await?;

        let members = self.gateway.members().await?;
        let mut report = SweepReport::default();
        for member in &members {
            report.scanned += 1;
            let plan = plan_grants(
                member.joined_at,
                &member.roles,
                self.config.targets,
                self.config.join_cutoff,
            );
            if plan.is_empty() {
                continue;
            }
            let outcome = self.apply_plan(member, &plan).await;
            report.failed_grants += outcome.failed.len();
            if outcome.any_granted() {
                report.updated += 1;
            }
        }

        info!(
            "event=sweep module=service status=ok scanned={} updated={} failed_grants={}",
            report.scanned, report.updated, report.failed_grants
        );
        Ok(report)
    }

    async fn resolve_target_roles(&self) -> Result<(), RoleServiceError> {
        let targets = self.config.targets;
        for role in [targets.legacy, targets.current] {
            if !self.gateway.role_exists(role).await? {
                return Err(RoleServiceError::RoleMissing(role));
            }
        }
        Ok(())
    }

    fn authorize(
        &self,
        spec: &CommandSpec,
        invocation: &CommandInvocation,
        guild_id: GuildId,
    ) -> Result<(), RoleServiceError> {
        if guild_id != self.config.guild_id {
            return Err(RoleServiceError::WrongGuild(guild_id));
        }
        if spec.access == CommandAccess::Administrator && !invocation.invoker_is_admin {
            return Err(RoleServiceError::NotAdministrator(invocation.invoker));
        }
        Ok(())
    }

    async fn apply_plan(&self, member: &MemberSnapshot, plan: &GrantPlan) -> GrantOutcome {
        let mut outcome = GrantOutcome::default();
        for &role in plan.roles() {
            let label = self.role_label(role);
            match self.gateway.grant_role(member.user_id, role).await {
                Ok(()) => {
                    info!(
                        "event=grant module=service status=ok user={} role={} kind={}",
                        member.name, role, label
                    );
                    outcome.granted.push(role);
                }
                Err(err) => {
                    error!(
                        "event=grant module=service status=error user={} role={} kind={} error={}",
                        member.name, role, label, err
                    );
                    outcome.failed.push((role, err));
                }
            }
        }
        outcome
    }

    fn role_label(&self, role: RoleId) -> &'static str {
        if role == self.config.targets.legacy {
            "legacy"
        } else {
            "current"
        }
    }
}
