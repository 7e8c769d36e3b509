//! Math Bot
//!
//! Registers a small calculator and a mood command, then replays
//! interaction payloads from stdin through an in-memory session and prints
//! every reply as JSON.
//!
//! # Usage
//!
//! ```bash
//! echo '{"id":"1","type":2,"data":{"name":"math","options":[{"name":"add","type":1,"options":[
//!   {"name":"num1","type":4,"value":2},{"name":"num2","type":4,"value":3}]}]}}' \
//!   | cargo run --package math-bot
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use slashmux::prelude::*;
use slashmux::runtime::{ConfigLoader, run_until};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Configuration file (defaults to searching for slashmux.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Application id reported by the local session
    #[arg(long, default_value = "local")]
    application_id: String,

    /// Print the published command definitions before replaying
    #[arg(long)]
    print_commands: bool,
}

// ============================================================================
// Handlers
// ============================================================================

async fn reply(session: &SessionRef, interaction: &Interaction, content: String) {
    if let Err(e) = session
        .respond(interaction, InteractionResponse::message(content))
        .await
    {
        error!("Failed to send reply: {e}");
    }
}

/// Shared body of the four arithmetic sub-commands.
async fn arithmetic(
    session: SessionRef,
    interaction: Arc<Interaction>,
    op: fn(i64, i64) -> Option<i64>,
) {
    let operand = |name| command_option(&interaction, name).and_then(|o| o.int_value());
    let content = match (operand("num1"), operand("num2")) {
        (Some(a), Some(b)) => match op(a, b) {
            Some(result) => result.to_string(),
            None => "That result can't be computed.".to_string(),
        },
        _ => "Both numbers are required.".to_string(),
    };
    reply(&session, &interaction, content).await;
}

async fn hi(session: SessionRef, interaction: Arc<Interaction>) {
    let content = match command_option(&interaction, "happy").and_then(|o| o.string_value()) {
        Some("happy") => "Glad to hear it!",
        Some("sad") => "Sorry to hear that.",
        _ => "Hi!",
    };
    reply(&session, &interaction, content.to_string()).await;
}

fn build_mux(session: SessionRef, scope: CommandScope) -> Result<Mux> {
    let mut mux = Mux::new(session).with_scope(scope);
    mux.use_middleware(logger());

    mux.handle_fn("/math add num1:integer num2:integer", |s, i| {
        arithmetic(s, i, i64::checked_add)
    })?
    .handle_fn("/math subtract num1:integer num2:integer", |s, i| {
        arithmetic(s, i, i64::checked_sub)
    })?
    .handle_fn("/math multiply num1:integer num2:integer", |s, i| {
        arithmetic(s, i, i64::checked_mul)
    })?
    .handle_fn("/math divide num1:integer num2:integer", |s, i| {
        arithmetic(s, i, i64::checked_div)
    })?
    .handle_fn("/hi happy:string<happy,sad>", hi)?;

    Ok(mux)
}

// ============================================================================
// Replay
// ============================================================================

/// Delivers one interaction per stdin line until EOF.
async fn replay(session: Arc<LocalSession>, scope: CommandScope, print_commands: bool) {
    if print_commands {
        let commands = session.published(&scope).unwrap_or_default();
        match serde_json::to_string_pretty(&commands) {
            Ok(json) => println!("{json}"),
            Err(e) => error!("Failed to encode commands: {e}"),
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read stdin: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let interaction: Interaction = match serde_json::from_str(&line) {
            Ok(interaction) => interaction,
            Err(e) => {
                warn!("Skipping malformed interaction: {e}");
                continue;
            }
        };
        if let Err(e) = session.deliver(interaction).await {
            error!("Failed to deliver interaction: {e}");
            break;
        }

        for (id, response) in session.take_responses() {
            match serde_json::to_string(&response) {
                Ok(json) => println!("{id}\t{json}"),
                Err(e) => error!("Failed to encode response: {e}"),
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.file(path);
    }
    let config = loader.load().context("failed to load configuration")?;
    logging::init_from_config(&config.logging);

    if config.bot.require_token().is_err() {
        info!("No bot token configured, running against the local session only");
    }

    let scope = config.bot.scope();
    let session = Arc::new(LocalSession::new(args.application_id));
    let mux = build_mux(session.clone(), scope.clone())?;

    run_until(mux, replay(session, scope, args.print_commands)).await?;
    Ok(())
}
