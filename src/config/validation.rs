//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate endpoint URLs and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: EnterL2Config → Result<(), Vec<ValidationError>>

use thiserror::Error;
use url::Url;

use crate::config::schema::EnterL2Config;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field}: invalid URL '{url}'")]
    InvalidUrl { field: &'static str, url: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("poll_interval_ms ({min}) exceeds max_poll_interval_ms ({max})")]
    PollIntervalRange { min: u64, max: u64 },

    #[error("gas_price_multiplier must be a finite value >= 1.0, got {0}")]
    GasMultiplier(f64),

    #[error("token registry contains an empty symbol")]
    EmptyTokenSymbol,
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &EnterL2Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let network = &config.network;

    if Url::parse(&network.l2_rpc_url).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field: "network.l2_rpc_url",
            url: network.l2_rpc_url.clone(),
        });
    }
    for url in &network.failover_urls {
        if Url::parse(url).is_err() {
            errors.push(ValidationError::InvalidUrl {
                field: "network.failover_urls",
                url: url.clone(),
            });
        }
    }
    if let Some(url) = &network.l1_rpc_url {
        if Url::parse(url).is_err() {
            errors.push(ValidationError::InvalidUrl {
                field: "network.l1_rpc_url",
                url: url.clone(),
            });
        }
    }

    if network.chain_id == 0 {
        errors.push(ValidationError::Zero("network.chain_id"));
    }
    if network.timeout_secs == 0 {
        errors.push(ValidationError::Zero("network.timeout_secs"));
    }
    if network.poll_interval_ms == 0 {
        errors.push(ValidationError::Zero("network.poll_interval_ms"));
    } else if network.poll_interval_ms > network.max_poll_interval_ms {
        errors.push(ValidationError::PollIntervalRange {
            min: network.poll_interval_ms,
            max: network.max_poll_interval_ms,
        });
    }

    let multiplier = config.fees.gas_price_multiplier;
    if !multiplier.is_finite() || multiplier < 1.0 {
        errors.push(ValidationError::GasMultiplier(multiplier));
    }
    if config.fees.max_gas_price_gwei == 0 {
        errors.push(ValidationError::Zero("fees.max_gas_price_gwei"));
    }

    if config.tokens.iter().any(|(symbol, _)| symbol.trim().is_empty()) {
        errors.push(ValidationError::EmptyTokenSymbol);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
