//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check value ranges (timeouts > 0, fee caps non-zero)
//! - Verify addresses and URLs parse before any network use
//! - Catch settings that would wedge the relay at runtime (long-poll longer
//!   than its own HTTP timeout, confirmation timeout shorter than one poll)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::str::FromStr;

use alloy::primitives::Address;
use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

const KNOWN_ENVIRONMENTS: &[&str] = &["mainnet", "sepolia", "devnet"];
const KNOWN_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ValidationError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_network(config, &mut errors);
    validate_contract(config, &mut errors);
    validate_session(config, &mut errors);
    validate_fees(config, &mut errors);
    validate_confirmation(config, &mut errors);
    validate_bot(config, &mut errors);
    validate_observability(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_network(config: &RelayConfig, errors: &mut Vec<ValidationError>) {
    let network = &config.network;

    if !KNOWN_ENVIRONMENTS.contains(&network.environment.as_str()) {
        errors.push(ValidationError::invalid(
            "network.environment",
            format!(
                "unknown environment '{}', expected one of {:?}",
                network.environment, KNOWN_ENVIRONMENTS
            ),
        ));
    }

    if network.rpc_url.is_empty() {
        errors.push(ValidationError::MissingField("network.rpc_url"));
    } else if let Err(e) = Url::parse(&network.rpc_url) {
        errors.push(ValidationError::invalid("network.rpc_url", e.to_string()));
    }

    for u in &network.failover_urls {
        if let Err(e) = Url::parse(u) {
            errors.push(ValidationError::invalid(
                "network.failover_urls",
                format!("'{}': {}", u, e),
            ));
        }
    }

    if network.chain_id == 0 {
        errors.push(ValidationError::invalid("network.chain_id", "must be non-zero"));
    }

    if network.rpc_timeout_secs == 0 {
        errors.push(ValidationError::invalid(
            "network.rpc_timeout_secs",
            "must be greater than zero",
        ));
    }
}

fn validate_contract(config: &RelayConfig, errors: &mut Vec<ValidationError>) {
    if config.contract.address.is_empty() {
        errors.push(ValidationError::MissingField("contract.address"));
    } else if Address::from_str(&config.contract.address).is_err() {
        errors.push(ValidationError::invalid(
            "contract.address",
            "not a valid 0x-prefixed address",
        ));
    }
}

fn validate_session(config: &RelayConfig, errors: &mut Vec<ValidationError>) {
    let session = &config.session;

    if session.service_url.is_empty() {
        errors.push(ValidationError::MissingField("session.service_url"));
    } else if let Err(e) = Url::parse(&session.service_url) {
        errors.push(ValidationError::invalid("session.service_url", e.to_string()));
    }

    if session.validity_days == 0 {
        errors.push(ValidationError::invalid(
            "session.validity_days",
            "must be greater than zero",
        ));
    }

    if session.allowed_methods.is_empty() {
        errors.push(ValidationError::MissingField("session.allowed_methods"));
    }
    for method in &session.allowed_methods {
        if method.is_empty() {
            errors.push(ValidationError::invalid(
                "session.allowed_methods",
                "method names must be non-empty",
            ));
        }
    }

    if session.request_timeout_secs == 0 {
        errors.push(ValidationError::invalid(
            "session.request_timeout_secs",
            "must be greater than zero",
        ));
    }
}

fn validate_fees(config: &RelayConfig, errors: &mut Vec<ValidationError>) {
    let fees = &config.fees;

    if fees.max_gas_amount == 0 {
        errors.push(ValidationError::invalid(
            "fees.max_gas_amount",
            "must be greater than zero",
        ));
    }
    if fees.max_gas_price == 0 {
        errors.push(ValidationError::invalid(
            "fees.max_gas_price",
            "must be greater than zero",
        ));
    }
    if fees.max_fee == 0 {
        errors.push(ValidationError::invalid("fees.max_fee", "must be greater than zero"));
    }
    if fees.tip > fees.max_fee {
        errors.push(ValidationError::invalid(
            "fees.tip",
            "tip exceeds the overall fee ceiling",
        ));
    }
}

fn validate_confirmation(config: &RelayConfig, errors: &mut Vec<ValidationError>) {
    let confirmation = &config.confirmation;

    if confirmation.poll_interval_ms == 0 {
        errors.push(ValidationError::invalid(
            "confirmation.poll_interval_ms",
            "must be greater than zero",
        ));
    }
    if confirmation.timeout_secs == 0 {
        errors.push(ValidationError::invalid(
            "confirmation.timeout_secs",
            "must be greater than zero",
        ));
    }
    if confirmation.timeout_secs * 1_000 < confirmation.poll_interval_ms {
        errors.push(ValidationError::invalid(
            "confirmation.timeout_secs",
            "shorter than a single poll interval",
        ));
    }
}

fn validate_bot(config: &RelayConfig, errors: &mut Vec<ValidationError>) {
    let bot = &config.bot;
    if !bot.enabled {
        return;
    }

    if bot.api_root.is_empty() {
        errors.push(ValidationError::MissingField("bot.api_root"));
    } else if let Err(e) = Url::parse(&bot.api_root) {
        errors.push(ValidationError::invalid("bot.api_root", e.to_string()));
    }

    if bot.poll_timeout_secs == 0 {
        errors.push(ValidationError::invalid(
            "bot.poll_timeout_secs",
            "must be greater than zero",
        ));
    }

    if bot.request_timeout_secs <= bot.poll_timeout_secs {
        errors.push(ValidationError::invalid(
            "bot.request_timeout_secs",
            "must exceed the long-poll timeout",
        ));
    }
}

fn validate_observability(config: &RelayConfig, errors: &mut Vec<ValidationError>) {
    let obs = &config.observability;

    if !KNOWN_LOG_LEVELS.contains(&obs.log_level.as_str()) {
        errors.push(ValidationError::invalid(
            "observability.log_level",
            format!("unknown level '{}'", obs.log_level),
        ));
    }

    if obs.metrics_enabled && obs.metrics_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::invalid(
            "observability.metrics_address",
            "not a valid socket address",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RelayConfig;

    fn valid_config() -> RelayConfig {
        let mut config = RelayConfig::default();
        config.contract.address = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".to_string();
        config.session.service_url = "https://session.example.test".to_string();
        config
    }

    #[test]
    fn test_accepts_complete_config() {
        let config = valid_config();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_rejects_empty_config_with_missing_fields() {
        let config = RelayConfig::default();
        let errors = validate_config(&config).unwrap_err();

        assert!(errors.contains(&ValidationError::MissingField("contract.address")));
        assert!(errors.contains(&ValidationError::MissingField("session.service_url")));
    }

    #[test]
    fn test_collects_all_errors_not_just_first() {
        let mut config = valid_config();
        config.network.chain_id = 0;
        config.fees.max_gas_amount = 0;
        config.confirmation.poll_interval_ms = 0;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 3);
    }

    #[test]
    fn test_rejects_unknown_environment() {
        let mut config = valid_config();
        config.network.environment = "testnet9".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidValue { field, .. } if *field == "network.environment")));
    }

    #[test]
    fn test_rejects_tip_above_fee_ceiling() {
        let mut config = valid_config();
        config.fees.tip = config.fees.max_fee + 1;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidValue { field, .. } if *field == "fees.tip")));
    }

    #[test]
    fn test_rejects_long_poll_longer_than_request_timeout() {
        let mut config = valid_config();
        config.bot.poll_timeout_secs = 60;
        config.bot.request_timeout_secs = 60;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidValue { field, .. } if *field == "bot.request_timeout_secs")));
    }

    #[test]
    fn test_disabled_bot_skips_bot_checks() {
        let mut config = valid_config();
        config.bot.enabled = false;
        config.bot.api_root = String::new();

        assert!(validate_config(&config).is_ok());
    }
}
