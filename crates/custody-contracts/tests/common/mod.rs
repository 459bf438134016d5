#![allow(dead_code)]

use std::sync::Arc;

use custody_types::{Clock, ManualClock, Timestamp};

/// Route engine logs to the test harness. `RUST_LOG=custody=debug` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A manual clock and the same clock as the engines take it.
pub fn clock_at(secs: u64) -> (ManualClock, Arc<dyn Clock>) {
    let clock = ManualClock::new(Timestamp(secs));
    let shared: Arc<dyn Clock> = Arc::new(clock.clone());
    (clock, shared)
}
