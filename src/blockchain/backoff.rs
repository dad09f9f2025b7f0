//! Poll delay schedule for receipt polling.

use rand::Rng;
use std::time::Duration;

/// Delay before poll number `attempt`: zero for the first poll, then
/// exponential from `base_ms`, capped at `max_ms`, plus up to 10% jitter.
pub fn poll_delay(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let capped_delay = base_ms.saturating_mul(exponential_base).min(max_ms);

    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}
