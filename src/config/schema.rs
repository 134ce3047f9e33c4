//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.
//!
//! Secrets (bot token, session token) are never part of the schema; they are
//! read from environment variables at startup.

use serde::{Deserialize, Serialize};

/// Root configuration for the pet relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Chain network selection and RPC endpoints.
    pub network: NetworkConfig,

    /// Pet contract settings.
    pub contract: ContractConfig,

    /// Wallet-session service settings.
    pub session: SessionConfig,

    /// Fee and resource-bound constants.
    pub fees: FeeConfig,

    /// Confirmation polling settings.
    pub confirmation: ConfirmationConfig,

    /// Chat bot settings.
    pub bot: BotConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Chain network configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Network environment selector (e.g., "sepolia", "mainnet", "devnet").
    pub environment: String,

    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// Chain ID the endpoints must report.
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            environment: "sepolia".to_string(),
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 11155111,
            rpc_timeout_secs: 10,
        }
    }
}

/// Pet contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ContractConfig {
    /// Deployed contract address (0x-prefixed hex). Required.
    pub address: String,
}

/// Wallet-session service configuration.
///
/// The service owns the session key and performs all signing; this process
/// only ever holds the opaque session token (from the environment).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Base URL of the session service. Required.
    pub service_url: String,

    /// Application name registered with the session service.
    pub app_name: String,

    /// Public URL of the app, shown in session approval prompts.
    pub app_url: String,

    /// Session validity window in days.
    pub validity_days: u32,

    /// Contract methods the session is authorized to invoke.
    pub allowed_methods: Vec<String>,

    /// Session service request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            service_url: String::new(),
            app_name: "telegram-pet".to_string(),
            app_url: String::new(),
            validity_days: 90,
            allowed_methods: vec![
                "feed".to_string(),
                "play".to_string(),
                "rest".to_string(),
                "test_set_stats_to_half".to_string(),
            ],
            request_timeout_secs: 15,
        }
    }
}

/// Fee and resource-bound constants.
///
/// One set of constants for every submission path. Values are denominated in
/// the chain's smallest fee unit.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeeConfig {
    /// Maximum quantity of settlement-layer gas authorized.
    pub max_gas_amount: u64,

    /// Maximum price authorized for one unit of settlement-layer gas.
    pub max_gas_price: u128,

    /// Overall fee ceiling for a transaction.
    pub max_fee: u128,

    /// Priority tip.
    pub tip: u128,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            max_gas_amount: 1_800,
            max_gas_price: 10 * 10u128.pow(14),
            max_fee: 10u128.pow(15),
            tip: 10u128.pow(13),
        }
    }
}

/// Confirmation polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Receipt poll interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Total time to wait for finality before giving up, in seconds.
    pub timeout_secs: u64,

    /// Number of block confirmations required for finality.
    pub confirmation_blocks: u32,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2_000,
            timeout_secs: 120,
            confirmation_blocks: 1,
        }
    }
}

/// Chat bot configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BotConfig {
    /// Enable the chat relay loop.
    pub enabled: bool,

    /// Bot API root. The default targets the test network, matching the
    /// environments this relay is deployed against.
    pub api_root: String,

    /// Long-poll timeout for getUpdates in seconds.
    pub poll_timeout_secs: u64,

    /// Bot API request timeout in seconds. Must exceed the long-poll timeout.
    pub request_timeout_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_root: "https://api.test.telegram.org".to_string(),
            poll_timeout_secs: 30,
            request_timeout_secs: 40,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
