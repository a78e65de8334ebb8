//! Serenity event handler.
//!
//! # Responsibility
//! - Register slash commands when the session becomes ready.
//! - Route member joins and command interactions into `RoleService`.
//! - Deliver replies as immediate, ephemeral or deferred followup messages.

use crate::commands::create_commands;
use crate::convert::{member_snapshot, platform_guild};
use crate::gateway::SerenityGuild;
use async_trait::async_trait;
use log::{error, info, warn};
use rolekeeper_core::{
    core_version, BotConfig, CommandInvocation, CommandRegistry, CommandReply, GuildId,
    ReplyMode, RoleService, UserId,
};
use serenity::all::{
    CommandInteraction, Context, CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, EventHandler, Interaction, Member, Ready,
};
use std::sync::Arc;

pub struct RoleHandler {
    config: Arc<BotConfig>,
    registry: Arc<CommandRegistry>,
}

impl RoleHandler {
    pub fn new(config: Arc<BotConfig>, registry: Arc<CommandRegistry>) -> Self {
        Self { config, registry }
    }

    fn service(&self, ctx: &Context) -> RoleService<SerenityGuild> {
        RoleService::new(
            self.config.clone(),
            SerenityGuild::new(ctx.http.clone(), self.config.guild_id),
        )
    }

    async fn handle_command(&self, ctx: &Context, command: &CommandInteraction) {
        let Some(spec) = self.registry.get(&command.data.name) else {
            warn!(
                "event=command module=discord status=ignored reason=unknown command={}",
                command.data.name
            );
            return;
        };

        let deferred = spec.reply == ReplyMode::Deferred;
        if deferred {
            if let Err(err) = command.defer(ctx).await {
                error!(
                    "event=defer module=discord status=error command={} error={}",
                    spec.name, err
                );
                return;
            }
        }

        let reply = self.service(ctx).dispatch(spec, &invocation(command)).await;
        deliver(ctx, command, &reply, deferred).await;
    }
}

#[async_trait]
impl EventHandler for RoleHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("event=bot_start module=discord status=start version={}", core_version());
        let commands = create_commands(&self.registry);
        match platform_guild(self.config.guild_id)
            .set_commands(&ctx.http, commands)
            .await
        {
            Ok(registered) => info!(
                "event=commands_sync module=discord status=ok guild={} count={}",
                self.config.guild_id,
                registered.len()
            ),
            Err(err) => error!(
                "event=commands_sync module=discord status=error guild={} error={}",
                self.config.guild_id, err
            ),
        }
        info!(
            "event=bot_start module=discord status=ok user={}",
            ready.user.name
        );
    }

    async fn guild_member_addition(&self, ctx: Context, new_member: Member) {
        let guild_id = GuildId(new_member.guild_id.get());
        let snapshot = member_snapshot(&new_member);
        self.service(&ctx).on_member_join(guild_id, &snapshot).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            self.handle_command(&ctx, &command).await;
        }
    }
}

fn invocation(command: &CommandInteraction) -> CommandInvocation {
    let invoker_is_admin = command
        .member
        .as_ref()
        .and_then(|member| member.permissions)
        .is_some_and(|permissions| permissions.administrator());
    CommandInvocation {
        command: command.data.name.clone(),
        guild_id: command.guild_id.map(|id| GuildId(id.get())),
        invoker: UserId(command.user.id.get()),
        invoker_name: command.user.name.clone(),
        invoker_is_admin,
    }
}

async fn deliver(ctx: &Context, command: &CommandInteraction, reply: &CommandReply, deferred: bool) {
    let result = if deferred {
        command
            .create_followup(
                ctx,
                CreateInteractionResponseFollowup::new()
                    .content(reply.content.as_str())
                    .ephemeral(reply.ephemeral),
            )
            .await
            .map(|_| ())
    } else {
        command
            .create_response(
                ctx,
                CreateInteractionResponse::Message(
                    CreateInteractionResponseMessage::new()
                        .content(reply.content.as_str())
                        .ephemeral(reply.ephemeral),
                ),
            )
            .await
    };

    if let Err(err) = result {
        error!(
            "event=reply module=discord status=error command={} error={}",
            command.data.name, err
        );
    }
}
