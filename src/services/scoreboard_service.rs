//! Command execution shared by the REST routes and the control socket.

use tracing::info;
use validator::Validate;

use crate::{
    dto::display::DisplaySnapshot,
    error::ServiceError,
    services::{sse_events, tick_scheduler},
    state::{SharedState, command::Command},
};

/// Apply `command`, keep the scheduler in step and publish the new display.
pub async fn execute(state: &SharedState, command: Command) -> DisplaySnapshot {
    let name = command.name();
    let snapshot = state
        .with_scoreboard(|board, now| {
            board.apply(command, now, state.buzzers());
            board.snapshot(now)
        })
        .await;

    tick_scheduler::sync(state).await;
    sse_events::broadcast_scoreboard(state, &snapshot);
    info!(
        command = name,
        game_clock = %snapshot.game_clock_text,
        shot_clock = %snapshot.shot_clock_text,
        running = snapshot.is_running,
        "command executed"
    );

    snapshot
}

/// Validate a request payload, then execute the command it describes.
pub async fn execute_validated<P>(
    state: &SharedState,
    payload: P,
) -> Result<DisplaySnapshot, ServiceError>
where
    P: Validate + Into<Command>,
{
    payload.validate()?;
    Ok(execute(state, payload.into()).await)
}

/// Read-only view of the scoreboard at the current instant.
pub async fn sample_display(state: &SharedState) -> DisplaySnapshot {
    state.with_scoreboard(|board, now| board.snapshot(now)).await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        config::AppConfig,
        state::{
            game::{CounterKind, ShotPreset, Side},
            testing::Harness,
        },
    };

    #[tokio::test]
    async fn commands_return_fresh_display() {
        let harness = Harness::new(AppConfig::default());
        let state = &harness.state;

        let display = execute(state, Command::adjust(CounterKind::Score, Side::Home, 3)).await;
        assert_eq!(display.scores.home, 3);

        let display = execute(state, Command::ToggleMainClock).await;
        assert!(display.is_running);

        harness.time.advance(Duration::from_millis(5_000));
        let display = execute(
            state,
            Command::ResetShotClock {
                preset: ShotPreset::Short,
            },
        )
        .await;
        assert_eq!(display.game_clock_text, "9:55");
        assert_eq!(display.shot_clock_text, "14");

        harness.time.advance(Duration::from_millis(1_000));
        assert_eq!(sample_display(state).await.shot_clock_ms, 13_000);

        state.shutdown().await;
    }

    #[tokio::test]
    async fn invalid_payloads_change_nothing() {
        use crate::dto::commands::ShotClockResetRequest;

        let harness = Harness::new(AppConfig::default());
        let result = execute_validated(
            &harness.state,
            ShotClockResetRequest {
                preset: None,
                ms: None,
            },
        )
        .await;
        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
        assert_eq!(sample_display(&harness.state).await.shot_clock_ms, 24_000);

        let display = execute_validated(
            &harness.state,
            ShotClockResetRequest {
                preset: None,
                ms: Some(8_500),
            },
        )
        .await
        .unwrap();
        assert_eq!(display.shot_clock_text, "9");
    }

    #[tokio::test]
    async fn pausing_past_the_deadline_still_sounds_the_buzzer() {
        let harness = Harness::new(AppConfig::default());
        let state = &harness.state;

        execute(state, Command::ToggleMainClock).await;
        harness.time.advance(Duration::from_millis(24_050));
        let display = execute(state, Command::ToggleMainClock).await;

        assert_eq!(harness.shot_buzzer.plays(), 1);
        assert_eq!(display.shot_clock_text, "0.0");
        assert!(!display.is_running);
        state.shutdown().await;
    }

    #[tokio::test]
    async fn commands_are_broadcast() {
        let harness = Harness::new(AppConfig::default());
        let mut receiver = harness.state.public_sse().subscribe();

        execute(&harness.state, Command::AdvanceQuarter).await;

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.event.as_deref(), Some("scoreboard"));
        assert!(event.data.contains(r#""quarter":2"#));
    }
}
