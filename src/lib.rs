//! Enter L2 Client SDK

pub mod blockchain;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod observability;
pub mod services;
pub mod session;
pub mod utils;

pub use client::Client;
pub use config::schema::EnterL2Config;
pub use error::{EnterL2Error, Result, TransactionError};
pub use events::{callback, Callback, EventDispatcher};
pub use utils::{format_units, parse_units};
