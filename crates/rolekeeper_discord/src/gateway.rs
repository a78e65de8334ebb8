//! `GuildGateway` over the serenity HTTP client.

use crate::convert::{member_snapshot, platform_guild, platform_role, platform_user};
use async_trait::async_trait;
use log::debug;
use rolekeeper_core::{GatewayError, GatewayResult, GuildGateway, GuildId, MemberSnapshot, RoleId, UserId};
use serenity::all::{Http, UserId as PlatformUserId};
use std::sync::Arc;

/// Platform maximum for one member-list page.
const MEMBER_PAGE_SIZE: u64 = 1000;
const GRANT_AUDIT_REASON: &str = "rolekeeper join-date reconciliation";

/// Gateway bound to one guild, sharing the client's HTTP handle.
#[derive(Clone)]
pub struct SerenityGuild {
    http: Arc<Http>,
    guild_id: GuildId,
}

impl SerenityGuild {
    pub fn new(http: Arc<Http>, guild_id: GuildId) -> Self {
        Self { http, guild_id }
    }
}

#[async_trait]
impl GuildGateway for SerenityGuild {
    fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    async fn role_exists(&self, role: RoleId) -> GatewayResult<bool> {
        let roles = platform_guild(self.guild_id)
            .roles(&self.http)
            .await
            .map_err(|err| GatewayError::request("get_guild_roles", err.to_string()))?;
        Ok(roles.contains_key(&platform_role(role)))
    }

    async fn member(&self, user: UserId) -> GatewayResult<Option<MemberSnapshot>> {
        match self
            .http
            .get_member(platform_guild(self.guild_id), platform_user(user))
            .await
        {
            Ok(member) => Ok(Some(member_snapshot(&member))),
            Err(err) if is_not_found(&err) => Ok(None),
            Err(err) => Err(GatewayError::request("get_member", err.to_string())),
        }
    }

    async fn members(&self) -> GatewayResult<Vec<MemberSnapshot>> {
        let guild = platform_guild(self.guild_id);
        let mut snapshots = Vec::new();
        let mut after: Option<PlatformUserId> = None;
        loop {
            let page = guild
                .members(&self.http, Some(MEMBER_PAGE_SIZE), after)
                .await
                .map_err(|err| GatewayError::request("list_members", err.to_string()))?;
            let page_len = page.len();
            after = page.last().map(|member| member.user.id);
            snapshots.extend(page.iter().map(member_snapshot));
            debug!(
                "event=list_members module=discord status=page size={} total={}",
                page_len,
                snapshots.len()
            );
            if (page_len as u64) < MEMBER_PAGE_SIZE {
                break;
            }
        }
        Ok(snapshots)
    }

    async fn grant_role(&self, user: UserId, role: RoleId) -> GatewayResult<()> {
        self.http
            .add_member_role(
                platform_guild(self.guild_id),
                platform_user(user),
                platform_role(role),
                Some(GRANT_AUDIT_REASON),
            )
            .await
            .map_err(|err| GatewayError::request("add_member_role", err.to_string()))
    }
}

fn is_not_found(err: &serenity::Error) -> bool {
    match err {
        serenity::Error::Http(http_err) => http_err
            .status_code()
            .is_some_and(|status| status.as_u16() == 404),
        _ => false,
    }
}
