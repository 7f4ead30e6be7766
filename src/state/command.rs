use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::game::{CounterKind, ShotPreset, Side};

/// Every mutation the scoreboard accepts, whatever the input surface.
///
/// REST handlers, the key binding table and the control socket all resolve
/// into one of these before reaching [`Scoreboard::apply`](crate::state::scoreboard::Scoreboard::apply).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Pause both clocks when running, otherwise start or resume them.
    ToggleMainClock,
    /// Configure a new game clock duration and reset both clocks to it.
    ResetAndConfigure { minutes: i64, seconds: i64 },
    /// Full reset reusing the currently configured game clock duration.
    ResetToConfigured,
    /// Reset the shot clock to a named preset.
    ResetShotClock { preset: ShotPreset },
    /// Reset the shot clock to an explicit value.
    ResetShotClockTo { ms: i64 },
    SetShotPresets { long_ms: i64, short_ms: i64 },
    AdvanceQuarter,
    RetreatQuarter,
    TogglePossession,
    /// Clamped change to one side's score, fouls or timeouts.
    Adjust {
        counter: CounterKind,
        side: Side,
        delta: i32,
    },
}

impl Command {
    /// Counter change command.
    pub fn adjust(counter: CounterKind, side: Side, delta: i32) -> Self {
        Command::Adjust {
            counter,
            side,
            delta,
        }
    }

    /// Short label used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::ToggleMainClock => "toggle_main_clock",
            Command::ResetAndConfigure { .. } => "reset_and_configure",
            Command::ResetToConfigured => "reset_to_configured",
            Command::ResetShotClock { .. } => "reset_shot_clock",
            Command::ResetShotClockTo { .. } => "reset_shot_clock_to",
            Command::SetShotPresets { .. } => "set_shot_presets",
            Command::AdvanceQuarter => "advance_quarter",
            Command::RetreatQuarter => "retreat_quarter",
            Command::TogglePossession => "toggle_possession",
            Command::Adjust { .. } => "adjust",
        }
    }
}

/// Clamp a possibly negative millisecond value to zero.
pub fn non_negative_ms(ms: i64) -> u64 {
    u64::try_from(ms).unwrap_or(0)
}

/// Total duration of `minutes:seconds`, negative totals clamped to zero.
pub fn duration_from_parts(minutes: i64, seconds: i64) -> u64 {
    let total_seconds = minutes.saturating_mul(60).saturating_add(seconds);
    non_negative_ms(total_seconds.saturating_mul(1_000))
}
