//! In-process event dispatcher.
//!
//! Maps event names to ordered callback lists. A callback that returns an
//! error or panics is reported to the failure sink and the remaining
//! callbacks still run; nothing propagates to the caller of [`EventDispatcher::emit`].
//!
//! The dispatcher has no internal locking: `on`/`off` take `&mut self`.
//! Share it across threads by wrapping the owner in a mutex.

use serde_json::Value;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;

use crate::observability::metrics;

/// Emitted by the client after `connect`, payload `{"address": ..}`.
pub const EVENT_CONNECTED: &str = "connected";
/// Emitted by the client when a session is cleared, payload `{"address": ..}`.
pub const EVENT_DISCONNECTED: &str = "disconnected";
/// Emitted by the client after a transaction is submitted, payload `{"kind": .., "hash": ..}`.
pub const EVENT_TRANSACTION: &str = "transaction";

/// Error a callback may return.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// A subscriber. Identity for [`EventDispatcher::off`] is the `Arc` pointer.
pub type Callback = Arc<dyn Fn(&Value) -> Result<(), CallbackError> + Send + Sync>;

/// Receives every captured callback failure.
pub type FailureSink = Arc<dyn Fn(&str, &CallbackFailure) + Send + Sync>;

/// Wrap a closure as a [`Callback`].
pub fn callback<F>(f: F) -> Callback
where
    F: Fn(&Value) -> Result<(), CallbackError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// How a callback failed.
#[derive(Debug, Error)]
pub enum CallbackFailure {
    #[error("callback returned an error: {0}")]
    Error(CallbackError),

    #[error("callback panicked: {0}")]
    Panic(String),
}

/// Default sink: log through `tracing`.
pub fn log_failure(event: &str, failure: &CallbackFailure) {
    tracing::error!(event, error = %failure, "Error in event callback");
}

/// Ordered multimap from event name to callbacks.
pub struct EventDispatcher {
    listeners: HashMap<String, Vec<Callback>>,
    sink: FailureSink,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::with_failure_sink(Arc::new(log_failure))
    }

    pub fn with_failure_sink(sink: FailureSink) -> Self {
        Self {
            listeners: HashMap::new(),
            sink,
        }
    }

    /// Replace where callback failures are reported.
    pub fn set_failure_sink(&mut self, sink: FailureSink) {
        self.sink = sink;
    }

    /// Append `callback` to `event`'s list. Registering the same callback
    /// twice keeps two entries.
    pub fn on(&mut self, event: impl Into<String>, callback: Callback) {
        self.listeners.entry(event.into()).or_default().push(callback);
    }

    /// Remove the first registration of `callback` for `event`.
    ///
    /// Returns whether anything was removed; unknown events or callbacks are a no-op.
    pub fn off(&mut self, event: &str, callback: &Callback) -> bool {
        let Some(list) = self.listeners.get_mut(event) else {
            return false;
        };
        let Some(pos) = list.iter().position(|cb| Arc::ptr_eq(cb, callback)) else {
            return false;
        };

        list.remove(pos);
        if list.is_empty() {
            self.listeners.remove(event);
        }
        true
    }

    /// Invoke every callback registered for `event`, in registration order.
    pub fn emit(&self, event: &str, data: &Value) {
        let Some(list) = self.listeners.get(event) else {
            return;
        };

        for cb in list {
            let failure = match panic::catch_unwind(AssertUnwindSafe(|| cb(data))) {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => CallbackFailure::Error(e),
                Err(payload) => CallbackFailure::Panic(panic_message(payload.as_ref())),
            };

            metrics::record_callback_failure(event);
            (self.sink)(event, &failure);
        }
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.get(event).map_or(0, Vec::len)
    }

    /// Drop every registration.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<&str, usize> = self
            .listeners
            .iter()
            .map(|(event, list)| (event.as_str(), list.len()))
            .collect();
        f.debug_struct("EventDispatcher")
            .field("listeners", &counts)
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
