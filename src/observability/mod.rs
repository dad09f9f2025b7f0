//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! provider, facades, session, event dispatcher
//!     → tracing events (structured fields, no secrets)
//!     → metrics facade (counters, histograms)
//!
//! Consumers:
//!     → logging.rs installs a subscriber (CLI, applications opting in)
//!     → any `metrics` recorder the embedding application installs
//! ```

pub mod logging;
pub mod metrics;
