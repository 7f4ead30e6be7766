//! Request payloads accepted by the scoreboard command routes.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::state::{
    command::Command,
    game::{CounterKind, ShotPreset, Side},
};

/// Longest shot clock value accepted from clients (ten minutes).
const MAX_SHOT_CLOCK_MS: i64 = 600_000;

/// New game clock duration; negative totals are clamped to zero.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ResetClockRequest {
    #[validate(range(max = 999))]
    pub minutes: i64,
    #[validate(range(max = 59))]
    #[serde(default)]
    pub seconds: i64,
}

impl From<ResetClockRequest> for Command {
    fn from(value: ResetClockRequest) -> Self {
        Command::ResetAndConfigure {
            minutes: value.minutes,
            seconds: value.seconds,
        }
    }
}

/// Shot clock reset target: either a named preset or an explicit value.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ShotClockResetRequest {
    #[serde(default)]
    pub preset: Option<ShotPreset>,
    #[serde(default)]
    pub ms: Option<i64>,
}

impl Validate for ShotClockResetRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        match (self.preset, self.ms) {
            (Some(_), None) => {}
            (None, Some(ms)) if ms <= MAX_SHOT_CLOCK_MS => {}
            (None, Some(_)) => {
                let mut err = ValidationError::new("shot_clock_range");
                err.message =
                    Some(format!("Shot clock must not exceed {MAX_SHOT_CLOCK_MS} ms").into());
                errors.add("ms", err);
            }
            _ => {
                let mut err = ValidationError::new("shot_clock_target");
                err.message = Some("Exactly one of `preset` or `ms` must be provided".into());
                errors.add("preset", err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl From<ShotClockResetRequest> for Command {
    fn from(value: ShotClockResetRequest) -> Self {
        match (value.preset, value.ms) {
            (Some(preset), _) => Command::ResetShotClock { preset },
            (None, ms) => Command::ResetShotClockTo { ms: ms.unwrap_or(0) },
        }
    }
}

/// Replacement long/short shot clock presets.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ShotPresetsRequest {
    #[validate(range(max = 600_000))]
    pub long_ms: i64,
    #[validate(range(max = 600_000))]
    pub short_ms: i64,
}

impl From<ShotPresetsRequest> for Command {
    fn from(value: ShotPresetsRequest) -> Self {
        Command::SetShotPresets {
            long_ms: value.long_ms,
            short_ms: value.short_ms,
        }
    }
}

/// Clamped change applied to one side's counter.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CounterAdjustmentRequest {
    pub side: Side,
    #[validate(range(min = -180, max = 180))]
    pub delta: i32,
}

impl CounterAdjustmentRequest {
    pub fn into_command(self, counter: CounterKind) -> Command {
        Command::adjust(counter, self.side, self.delta)
    }
}
