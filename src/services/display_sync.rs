//! Mirrors the game clock onto the physical display over HTTP.

use std::{sync::Arc, time::Duration};

use futures::future::BoxFuture;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::{
    config::DisplaySyncConfig,
    services::sse_events,
    state::{SharedState, format::format_device_time},
};

const SET_TIME_PATH: &str = "setTime";

/// Failures while pushing the time to the display device.
#[derive(Debug, Error)]
pub enum DisplaySyncError {
    #[error("failed to build display HTTP client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    #[error("display request to `{url}` failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("display at `{url}` answered {status}")]
    Status { url: String, status: StatusCode },
}

/// Destination for `mm:ss` game clock updates.
pub trait DisplaySync: Send + Sync {
    fn push_time(&self, text: String) -> BoxFuture<'static, Result<(), DisplaySyncError>>;
}

/// Device reachable with `POST <url>/setTime` and a `time=mm:ss` form body.
#[derive(Clone)]
pub struct HttpDisplaySync {
    client: Client,
    endpoint: Arc<str>,
}

impl HttpDisplaySync {
    pub fn new(config: &DisplaySyncConfig) -> Result<Self, DisplaySyncError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| DisplaySyncError::ClientBuilder { source })?;
        let endpoint = format!("{}/{SET_TIME_PATH}", config.url.trim_end_matches('/'));

        Ok(Self {
            client,
            endpoint: Arc::from(endpoint),
        })
    }
}

impl DisplaySync for HttpDisplaySync {
    fn push_time(&self, text: String) -> BoxFuture<'static, Result<(), DisplaySyncError>> {
        let client = self.client.clone();
        let endpoint = Arc::clone(&self.endpoint);

        Box::pin(async move {
            let response = client
                .post(endpoint.as_ref())
                .form(&[("time", text)])
                .send()
                .await
                .map_err(|source| DisplaySyncError::Request {
                    url: endpoint.to_string(),
                    source,
                })?;

            let status = response.status();
            if status.is_success() {
                Ok(())
            } else {
                Err(DisplaySyncError::Status {
                    url: endpoint.to_string(),
                    status,
                })
            }
        })
    }
}

/// Push the game clock every `period` while the clocks run.
///
/// Each push runs on its own task so a slow device never delays the next one.
pub async fn run(state: SharedState, sync: Arc<dyn DisplaySync>, period: Duration) {
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        let Some(game_clock_ms) = state
            .with_scoreboard(|board, now| {
                board
                    .is_running()
                    .then(|| board.game_clock().sample(now))
            })
            .await
        else {
            continue;
        };

        let text = format_device_time(game_clock_ms);
        let sync = Arc::clone(&sync);
        let state = state.clone();
        tokio::spawn(async move {
            debug!(time = %text, "pushing time to display");
            let outcome = sync.push_time(text).await;
            record_outcome(&state, outcome);
        });
    }
}

fn record_outcome(state: &SharedState, outcome: Result<(), DisplaySyncError>) {
    match outcome {
        Ok(()) => {
            if state.update_degraded(false) {
                info!("display reachable again; leaving degraded mode");
                sse_events::broadcast_system_status(state, false);
            }
        }
        Err(err) => {
            warn!(error = %err, "display sync failed");
            if state.update_degraded(true) {
                sse_events::broadcast_system_status(state, true);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{
        config::AppConfig,
        services::scoreboard_service,
        state::{AppState, command::Command},
    };

    #[derive(Default)]
    struct RecordingDisplay {
        pushed: Mutex<Vec<String>>,
        failing: bool,
    }

    impl RecordingDisplay {
        fn failing() -> Self {
            Self {
                failing: true,
                ..Self::default()
            }
        }

        fn pushed(&self) -> Vec<String> {
            self.pushed.lock().unwrap().clone()
        }
    }

    impl DisplaySync for RecordingDisplay {
        fn push_time(&self, text: String) -> BoxFuture<'static, Result<(), DisplaySyncError>> {
            self.pushed.lock().unwrap().push(text);
            let failing = self.failing;
            Box::pin(async move {
                if failing {
                    Err(DisplaySyncError::Status {
                        url: "http://display.test/setTime".into(),
                        status: StatusCode::SERVICE_UNAVAILABLE,
                    })
                } else {
                    Ok(())
                }
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn pushes_only_while_running() {
        let state = AppState::new(AppConfig::default());
        let display = Arc::new(RecordingDisplay::default());
        let task = tokio::spawn(run(
            state.clone(),
            display.clone(),
            Duration::from_millis(500),
        ));

        time::sleep(Duration::from_millis(1_200)).await;
        assert!(display.pushed().is_empty());

        scoreboard_service::execute(&state, Command::ToggleMainClock).await;
        time::sleep(Duration::from_millis(1_100)).await;
        scoreboard_service::execute(&state, Command::ToggleMainClock).await;
        let pushed = display.pushed();
        time::sleep(Duration::from_millis(2_000)).await;

        assert!(pushed.len() >= 2);
        assert_eq!(pushed.first().map(String::as_str), Some("09:59"));
        assert_eq!(display.pushed().len(), pushed.len());
        assert!(!state.is_degraded());

        task.abort();
        state.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failures_flip_degraded_and_announce_it() {
        let state = AppState::new(AppConfig::default());
        let mut receiver = state.public_sse().subscribe();
        let task = tokio::spawn(run(
            state.clone(),
            Arc::new(RecordingDisplay::failing()),
            Duration::from_millis(500),
        ));

        scoreboard_service::execute(&state, Command::ToggleMainClock).await;
        time::sleep(Duration::from_millis(1_100)).await;
        assert!(state.is_degraded());

        let mut status_events = Vec::new();
        while let Ok(event) = receiver.try_recv() {
            if event.event.as_deref() == Some("system.status") {
                status_events.push(event.data);
            }
        }
        assert_eq!(status_events, vec![r#"{"degraded":true}"#.to_string()]);

        record_outcome(&state, Ok(()));
        assert!(!state.is_degraded());

        task.abort();
        state.shutdown().await;
    }

    #[test]
    fn endpoint_drops_trailing_slash() {
        let sync = HttpDisplaySync::new(&DisplaySyncConfig {
            url: "http://192.168.0.107/".into(),
            interval: Duration::from_millis(500),
            timeout: Duration::from_secs(1),
        })
        .unwrap();
        assert_eq!(sync.endpoint.as_ref(), "http://192.168.0.107/setTime");
    }
}
