use std::time::SystemTime;

use tracing::{info, warn};

use crate::{
    dto::sse::{BuzzerEvent, ServerEvent},
    state::{SseHub, scoreboard::ClockKind},
};

const EVENT_BUZZER: &str = "buzzer";

/// Expiry signal consumer. Implementations must return immediately.
pub trait AudioSink: Send + Sync {
    fn play(&self);
}

/// Publishes a `buzzer` event so the rendering client plays the horn.
#[derive(Clone)]
pub struct SseBuzzerSink {
    hub: SseHub,
    clock: ClockKind,
}

impl SseBuzzerSink {
    pub fn new(hub: SseHub, clock: ClockKind) -> Self {
        Self { hub, clock }
    }
}

impl AudioSink for SseBuzzerSink {
    fn play(&self) {
        let payload = BuzzerEvent::new(self.clock, SystemTime::now());
        match ServerEvent::json(Some(EVENT_BUZZER.to_string()), &payload) {
            Ok(event) => {
                info!(clock = ?self.clock, "buzzer");
                self.hub.broadcast(event);
            }
            Err(err) => warn!(clock = ?self.clock, error = %err, "failed to serialize buzzer event"),
        }
    }
}

/// Headless sink that only records the expiry in the logs.
#[derive(Debug, Clone, Copy)]
pub struct LogBuzzerSink {
    clock: ClockKind,
}

impl LogBuzzerSink {
    pub fn new(clock: ClockKind) -> Self {
        Self { clock }
    }
}

impl AudioSink for LogBuzzerSink {
    fn play(&self) {
        info!(clock = ?self.clock, "buzzer (no audio output attached)");
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::AudioSink;

    /// Counts `play` calls.
    #[derive(Debug, Default)]
    pub struct CountingSink {
        plays: AtomicUsize,
    }

    impl CountingSink {
        pub fn plays(&self) -> usize {
            self.plays.load(Ordering::SeqCst)
        }
    }

    impl AudioSink for CountingSink {
        fn play(&self) {
            self.plays.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sse_sink_broadcasts_named_event() {
        let hub = SseHub::new(4);
        let mut receiver = hub.subscribe();
        SseBuzzerSink::new(hub.clone(), ClockKind::Shot).play();

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.event.as_deref(), Some(EVENT_BUZZER));
        assert!(event.data.contains(r#""clock":"shot""#));
    }
}
