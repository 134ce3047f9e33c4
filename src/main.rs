//! Pet Relay (v1)
//!
//! A chat-to-chain relay built with Tokio and Alloy.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────┐
//!                        │                    PET RELAY                      │
//!                        │                                                   │
//!     Chat Command       │  ┌─────────┐    ┌──────────┐    ┌─────────────┐  │
//!     ───────────────────┼─▶│  bot    │───▶│ contract │───▶│ fee policy  │  │
//!                        │  │ polling │    │ populate │    │  (static)   │  │
//!                        │  └─────────┘    └──────────┘    └──────┬──────┘  │
//!                        │                                        │         │
//!                        │                                        ▼         │
//!                        │                                ┌─────────────┐   │
//!                        │                                │  submitter  │───┼──▶ Wallet Session
//!                        │                                │ (delegated) │   │    Service
//!                        │                                └──────┬──────┘   │
//!                        │                                       │ tx hash  │
//!                        │                                       ▼          │
//!     Chat Reply         │  ┌─────────┐    ┌──────────┐   ┌─────────────┐   │
//!     ◀──────────────────┼──│reporter │◀───│  waiter  │◀──│ chain client│◀──┼──── RPC Providers
//!                        │  └─────────┘    └──────────┘   └─────────────┘   │
//!                        │                                                   │
//!                        │  ┌─────────────────────────────────────────────┐  │
//!                        │  │            Cross-Cutting Concerns            │  │
//!                        │  │   config      observability      lifecycle   │  │
//!                        │  └─────────────────────────────────────────────┘  │
//!                        └──────────────────────────────────────────────────┘
//! ```
//!
//! # Runtime Modes
//!
//! - Relay mode (default): long-poll the bot API for commands, execute each
//!   allowlisted action through the wallet session, reply with the outcome.
//! - One-shot mode (`--once <action>`): execute a single action, report the
//!   outcome to the log, exit 0 on confirmation and 1 otherwise.

// Core subsystems
pub mod bot;
pub mod chain;
pub mod config;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use crate::bot::{BotClient, ChatRelay};
use crate::chain::{
    Action, ActionCall, ActionExecutor, ChainClient, ConfirmationWaiter, DelegatedSession,
    FeePolicy, LogNotifier, PetContract, ResultReporter, StatsReader, TxSubmitter,
};
use crate::lifecycle::{wait_for_signal, Shutdown};

#[derive(Debug, Parser)]
#[command(name = "pet-relay", version, about = "Relays chat commands into pet contract transactions")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "relay.toml")]
    config: PathBuf,

    /// Execute one action and exit instead of polling for chat commands.
    #[arg(long, value_name = "ACTION")]
    once: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Fail fast: a config that fails validation aborts startup with every
    // problem listed, not just the first.
    let config = config::load_config(&cli.config)?;

    observability::init_logging(&config.observability.log_level);

    tracing::info!("pet-relay v0.1.0 starting");

    tracing::info!(
        environment = %config.network.environment,
        contract = %config.contract.address,
        bot_enabled = config.bot.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            crate::observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Chain-side wiring. The session service is the only signer; this
    // process never holds key material.
    let client = Arc::new(ChainClient::new(config.network.clone()).await?);
    let session = Arc::new(DelegatedSession::connect(&config.session).await?);
    let contract = Arc::new(PetContract::from_config(&config.contract, &config.session)?);

    let fee_policy = FeePolicy::new(&config.fees);
    let submitter = TxSubmitter::new(session);
    let waiter = ConfirmationWaiter::new(client.clone(), config.confirmation.clone());

    if let Some(method) = cli.once.as_deref() {
        let action = Action::from_method(method)
            .ok_or_else(|| format!("Unknown action '{}'", method))?;
        let executor = ActionExecutor::new(
            contract,
            fee_policy,
            submitter,
            waiter,
            ResultReporter::new(Arc::new(LogNotifier)),
        );
        let confirmed = executor.execute(&ActionCall::from(action)).await;
        std::process::exit(if confirmed { 0 } else { 1 });
    }

    if !config.bot.enabled {
        return Err("Bot polling is disabled and no --once action was given".into());
    }

    let bot_client = Arc::new(BotClient::from_env(&config.bot)?);
    let identity = bot_client.get_me().await?;
    tracing::info!(
        bot_id = identity.id,
        username = identity.username.as_deref().unwrap_or("<unset>"),
        "Bot is up and running"
    );

    let stats = StatsReader::new(contract.clone(), client.clone());
    let relay = ChatRelay::new(bot_client, contract, fee_policy, submitter, waiter, stats);

    let shutdown = Shutdown::new();
    let relay_task = tokio::spawn(relay.run(shutdown.subscribe()));

    wait_for_signal().await;
    shutdown.trigger();

    // The relay drains in-flight lifecycles before returning; a submitted
    // transaction is never abandoned mid-wait.
    if let Err(e) = relay_task.await {
        tracing::error!(error = %e, "Relay task panicked");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
