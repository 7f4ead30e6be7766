pub mod buzzer;
pub mod clock;
pub mod command;
pub mod format;
pub mod game;
pub mod scoreboard;
mod sse;
pub mod time_source;

use std::sync::Arc;

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::{
    sync::{Mutex, mpsc, watch},
    time::Instant,
};
use tracing::debug;
use uuid::Uuid;

use crate::{
    config::{AppConfig, BuzzerOutput},
    services::{
        audio::{AudioSink, LogBuzzerSink, SseBuzzerSink},
        tick_scheduler::TickerHandle,
    },
    state::{
        scoreboard::{ClockKind, Scoreboard, TickReport},
        time_source::{TimeSource, TokioTimeSource},
    },
};

pub use self::sse::SseHub;

pub type SharedState = Arc<AppState>;

const PUBLIC_SSE_CAPACITY: usize = 64;

#[derive(Clone)]
/// Handle used to push messages to a connected control socket.
pub struct ControllerConnection {
    pub id: Uuid,
    pub tx: mpsc::UnboundedSender<Message>,
}

/// The pair of expiry sinks, one per clock.
#[derive(Clone)]
pub struct BuzzerSinks {
    pub game: Arc<dyn AudioSink>,
    pub shot: Arc<dyn AudioSink>,
}

impl BuzzerSinks {
    /// Sinks announcing expiries on the public SSE stream.
    pub fn sse(hub: &SseHub) -> Self {
        Self {
            game: Arc::new(SseBuzzerSink::new(hub.clone(), ClockKind::Game)),
            shot: Arc::new(SseBuzzerSink::new(hub.clone(), ClockKind::Shot)),
        }
    }

    /// Sinks that only log expiries.
    pub fn log() -> Self {
        Self {
            game: Arc::new(LogBuzzerSink::new(ClockKind::Game)),
            shot: Arc::new(LogBuzzerSink::new(ClockKind::Shot)),
        }
    }
}

/// Central application state: the scoreboard, its scheduler and the connected clients.
pub struct AppState {
    config: Arc<AppConfig>,
    sse: SseHub,
    scoreboard: Mutex<Scoreboard>,
    time: Arc<dyn TimeSource>,
    buzzers: BuzzerSinks,
    ticker: Mutex<Option<TickerHandle>>,
    controllers: DashMap<Uuid, ControllerConnection>,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig) -> SharedState {
        let time: Arc<dyn TimeSource> = Arc::new(TokioTimeSource);
        match config.buzzer_output() {
            BuzzerOutput::Sse => Self::with_parts(config, time, BuzzerSinks::sse),
            BuzzerOutput::Log => Self::with_parts(config, time, |_| BuzzerSinks::log()),
        }
    }

    /// Build the state around an explicit clock source and buzzer sinks.
    pub fn with_parts(
        config: AppConfig,
        time: Arc<dyn TimeSource>,
        buzzers: impl FnOnce(&SseHub) -> BuzzerSinks,
    ) -> SharedState {
        let sse = SseHub::new(PUBLIC_SSE_CAPACITY);
        let buzzers = buzzers(&sse);
        let scoreboard = Scoreboard::new(config.game_duration_ms(), config.shot_presets());
        let (degraded_tx, _rx) = watch::channel(false);

        Arc::new(Self {
            config: Arc::new(config),
            sse,
            scoreboard: Mutex::new(scoreboard),
            time,
            buzzers,
            ticker: Mutex::new(None),
            controllers: DashMap::new(),
            degraded: degraded_tx,
        })
    }

    /// Configuration the state was built from.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        &self.sse
    }

    /// Registry of active control sockets keyed by their identifier.
    pub fn controllers(&self) -> &DashMap<Uuid, ControllerConnection> {
        &self.controllers
    }

    /// Slot holding the running tick scheduler, if any.
    pub fn ticker(&self) -> &Mutex<Option<TickerHandle>> {
        &self.ticker
    }

    /// Run `f` with exclusive access to the scoreboard.
    ///
    /// `now` is sampled after the lock is taken so successive callers observe
    /// non-decreasing instants.
    pub async fn with_scoreboard<T>(&self, f: impl FnOnce(&mut Scoreboard, Instant) -> T) -> T {
        let mut board = self.scoreboard.lock().await;
        let now = self.time.now();
        f(&mut board, now)
    }

    /// Sinks the scoreboard sounds when a clock runs out.
    pub fn buzzers(&self) -> &BuzzerSinks {
        &self.buzzers
    }

    /// One scheduler pass over both clocks.
    pub async fn tick(&self) -> TickReport {
        self.with_scoreboard(|board, now| board.tick(now, &self.buzzers))
            .await
    }

    /// Whether either clock is counting down.
    pub async fn is_running(&self) -> bool {
        self.scoreboard.lock().await.is_running()
    }

    /// Record the display link health. Returns true when the flag flipped.
    pub fn update_degraded(&self, value: bool) -> bool {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        })
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Stop background work owned by the state and close control sockets.
    ///
    /// The scheduler task holds a [`SharedState`]; dropping its handle here
    /// aborts it and releases that reference.
    pub async fn shutdown(&self) {
        self.ticker.lock().await.take();
        for connection in self.controllers.iter() {
            debug!(id = %connection.id, "closing controller");
            let _ = connection.tx.send(Message::Close(None));
        }
        self.controllers.clear();
    }
}
