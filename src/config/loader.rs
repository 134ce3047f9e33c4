//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<RelayConfig, ConfigError> {
    let config: RelayConfig = toml::from_str(content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [contract]
        address = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"

        [session]
        service_url = "https://session.example.test"
    "#;

    #[test]
    fn test_parses_minimal_config_with_defaults() {
        let config = parse_config(MINIMAL).unwrap();

        assert_eq!(config.network.environment, "sepolia");
        assert_eq!(config.fees.max_gas_amount, 1_800);
        assert_eq!(config.fees.max_gas_price, 10 * 10u128.pow(14));
        assert_eq!(config.session.validity_days, 90);
        assert_eq!(config.session.allowed_methods.len(), 4);
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = parse_config("contract = {").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_semantically_invalid_config() {
        let err = parse_config("").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_overrides_apply_over_defaults() {
        let content = format!(
            "{}\n[confirmation]\npoll_interval_ms = 500\ntimeout_secs = 30\n",
            MINIMAL
        );
        let config = parse_config(&content).unwrap();

        assert_eq!(config.confirmation.poll_interval_ms, 500);
        assert_eq!(config.confirmation.timeout_secs, 30);
        assert_eq!(config.confirmation.confirmation_blocks, 1);
    }
}
