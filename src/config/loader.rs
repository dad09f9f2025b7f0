//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::EnterL2Config;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading and lookups.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),

    /// A contract needed by the requested operation has no configured address.
    #[error("Contract address not configured: {0}")]
    MissingContract(&'static str),

    /// Bridge deposits need an L1 endpoint.
    #[error("L1 RPC endpoint not configured")]
    MissingL1Endpoint,
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from a TOML string.
pub fn parse_config(content: &str) -> Result<EnterL2Config, ConfigError> {
    let config: EnterL2Config = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<EnterL2Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = parse_config(&content)?;

    tracing::debug!(
        path = %path.display(),
        network = %config.network.name,
        chain_id = config.network.chain_id,
        tokens = config.tokens.len(),
        "Configuration loaded"
    );

    Ok(config)
}
