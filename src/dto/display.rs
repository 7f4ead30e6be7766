use serde::Serialize;
use tokio::time::Instant;
use utoipa::ToSchema;

use crate::state::{
    format::{format_game_clock, format_shot_clock},
    game::{PerSide, ShotPresets, Side},
    scoreboard::Scoreboard,
};

/// Home/visitor pair of counter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct SideCounts {
    pub home: u32,
    pub visitor: u32,
}

impl From<PerSide<u32>> for SideCounts {
    fn from(value: PerSide<u32>) -> Self {
        Self {
            home: value.home,
            visitor: value.visitor,
        }
    }
}

/// Everything the rendering layer needs to draw the scoreboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DisplaySnapshot {
    /// Formatted game clock (`m:ss` or seconds with tenths).
    pub game_clock_text: String,
    /// Formatted shot clock (whole seconds above four, tenths below).
    pub shot_clock_text: String,
    pub game_clock_ms: u64,
    pub shot_clock_ms: u64,
    /// True while either clock is counting down.
    pub is_running: bool,
    pub game_clock_running: bool,
    pub shot_clock_running: bool,
    /// Configured full game clock duration.
    pub game_duration_ms: u64,
    pub quarter: u8,
    pub possession: Side,
    pub scores: SideCounts,
    pub fouls: SideCounts,
    pub timeouts: SideCounts,
    pub shot_presets: ShotPresets,
}

impl DisplaySnapshot {
    /// Sample both clocks at `now` without mutating them.
    pub fn capture(board: &Scoreboard, now: Instant) -> Self {
        let game_clock_ms = board.game_clock().sample(now);
        let shot_clock_ms = board.shot_clock().sample(now);
        let game = board.game();

        Self {
            game_clock_text: format_game_clock(game_clock_ms),
            shot_clock_text: format_shot_clock(shot_clock_ms),
            game_clock_ms,
            shot_clock_ms,
            is_running: board.is_running(),
            game_clock_running: board.game_clock().is_running(),
            shot_clock_running: board.shot_clock().is_running(),
            game_duration_ms: board.game_clock().duration_ms(),
            quarter: game.quarter(),
            possession: game.possession(),
            scores: game.scores().into(),
            fouls: game.fouls().into(),
            timeouts: game.timeouts().into(),
            shot_presets: game.shot_presets(),
        }
    }
}
