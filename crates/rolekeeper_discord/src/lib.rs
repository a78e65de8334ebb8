//! Discord adapter for rolekeeper.
//!
//! # Responsibility
//! - Bind `rolekeeper_core` flows to the serenity client.
//! - Own every platform type; core never sees serenity models.
//!
//! # Invariants
//! - All platform calls go through `SerenityGuild`.
//! - Handlers never panic; delivery failures are logged and dropped.

pub mod commands;
pub mod convert;
pub mod gateway;
pub mod handler;

pub use gateway::SerenityGuild;
pub use handler::RoleHandler;

use rolekeeper_core::{BotConfig, CommandRegistry};
use serenity::all::{Client, GatewayIntents};
use std::sync::Arc;

/// Gateway intents the bot needs: guild metadata plus member join events.
pub fn required_intents() -> GatewayIntents {
    GatewayIntents::GUILDS | GatewayIntents::GUILD_MEMBERS
}

/// Connects to the platform and runs until the gateway session ends.
///
/// # Errors
/// - Returns the client error when login or the gateway connection fails.
pub async fn run(config: Arc<BotConfig>) -> Result<(), serenity::Error> {
    let handler = RoleHandler::new(config.clone(), Arc::new(CommandRegistry::standard()));
    let mut client = Client::builder(config.token(), required_intents())
        .event_handler(handler)
        .await?;
    client.start().await
}
