//! Monotonic time sources feeding the countdown clocks.

use tokio::time::Instant;

/// Source of "now" readings for the clock engine.
///
/// Every clock operation takes the instant explicitly; the source only decides
/// where that instant comes from.
pub trait TimeSource: Send + Sync {
    /// Current monotonic instant.
    fn now(&self) -> Instant;
}

/// Production time source backed by the Tokio clock.
///
/// Reads honour `tokio::time::pause`, which keeps scheduler tests deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimeSource;

impl TimeSource for TokioTimeSource {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
