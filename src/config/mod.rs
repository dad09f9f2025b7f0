//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! preset (mainnet / testnet) or config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → EnterL2Config (validated, immutable)
//!     → shared via Arc by every component of one client
//! ```
//!
//! # Design Decisions
//! - Config is immutable once bound to a client
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod presets;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use presets::{mainnet, testnet};
pub use schema::{
    ContractAddresses, EnterL2Config, FeeConfig, NetworkConfig, ObservabilityConfig,
    TokenRegistry,
};
pub use validation::{validate_config, ValidationError};
