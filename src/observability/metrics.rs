//! Metrics emitted through the `metrics` facade.
//!
//! # Metrics
//! - `enterl2_rpc_requests_total` (counter): RPC reads by method, outcome
//! - `enterl2_rpc_duration_seconds` (histogram): RPC latency by method
//! - `enterl2_transactions_submitted_total` (counter): broadcasts by kind
//! - `enterl2_event_callback_failures_total` (counter): failing subscribers by event
//!
//! No recorder is installed here; without one every call is a no-op.

use std::time::Instant;

use crate::blockchain::TransactionKind;

/// Record one RPC read (after failover) and its latency.
pub fn record_rpc(method: &'static str, outcome: &'static str, start: Instant) {
    ::metrics::counter!("enterl2_rpc_requests_total", "method" => method, "outcome" => outcome)
        .increment(1);
    ::metrics::histogram!("enterl2_rpc_duration_seconds", "method" => method)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_transaction_submitted(kind: TransactionKind) {
    ::metrics::counter!("enterl2_transactions_submitted_total", "kind" => kind.as_str())
        .increment(1);
}

pub fn record_callback_failure(event: &str) {
    ::metrics::counter!("enterl2_event_callback_failures_total", "event" => event.to_string())
        .increment(1);
}
