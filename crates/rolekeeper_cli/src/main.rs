//! Bot process entry point.
//!
//! # Responsibility
//! - Load configuration before anything else and exit on failure.
//! - Start session logging, then hand control to the Discord client.

use log::{error, info};
use rolekeeper_core::{init_session_logging, BotConfig};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match BotConfig::from_env() {
        Ok(config) => Arc::new(config),
        Err(err) => {
            eprintln!("rolekeeper: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_session_logging(config.log_level, &config.log_dir) {
        eprintln!("rolekeeper: {err}");
        return ExitCode::FAILURE;
    }

    info!(
        "event=app_start module=cli status=ok guild={} cutoff={}",
        config.guild_id,
        config.join_cutoff.to_rfc3339()
    );

    match rolekeeper_discord::run(config).await {
        Ok(()) => {
            info!("event=app_stop module=cli status=ok");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=app_stop module=cli status=error error={err}");
            ExitCode::FAILURE
        }
    }
}
