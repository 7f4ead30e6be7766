use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, info};
use utoipa::ToSchema;

use crate::{
    dto::display::DisplaySnapshot,
    state::{
        BuzzerSinks,
        clock::{ClockPhase, ClockTick, CountdownClock},
        command::{Command, duration_from_parts, non_negative_ms},
        game::{CounterKind, GameState, ShotPreset, ShotPresets, Side},
    },
};

/// Identifies one of the two countdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClockKind {
    /// Period clock.
    Game,
    /// Possession clock.
    Shot,
}

/// What a scheduler pass observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// The game clock ran out during this pass.
    pub game_expired: bool,
    /// The shot clock ran out during this pass.
    pub shot_expired: bool,
    /// Whether a clock is still running after the pass.
    pub running: bool,
    /// Display state right after the pass.
    pub display: DisplaySnapshot,
}

/// Single owner of both clocks and the game state.
///
/// All reads and writes go through `&self` / `&mut self` of this struct, so
/// wrapping it in one lock serializes commands and scheduler passes.
#[derive(Debug, Clone)]
pub struct Scoreboard {
    game: GameState,
    game_clock: CountdownClock,
    shot_clock: CountdownClock,
}

impl Scoreboard {
    /// Quarter 1, both clocks stopped at their full values.
    pub fn new(game_duration_ms: u64, shot_presets: ShotPresets) -> Self {
        Self {
            game: GameState::new(shot_presets),
            game_clock: CountdownClock::new(game_duration_ms),
            shot_clock: CountdownClock::new(shot_presets.long_ms),
        }
    }

    /// Counters, quarter and possession.
    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Period countdown.
    pub fn game_clock(&self) -> &CountdownClock {
        &self.game_clock
    }

    /// Possession countdown.
    pub fn shot_clock(&self) -> &CountdownClock {
        &self.shot_clock
    }

    /// True while either countdown runs.
    pub fn is_running(&self) -> bool {
        self.game_clock.is_running() || self.shot_clock.is_running()
    }

    /// Dispatch a command. Invalid-state requests fall through as no-ops.
    pub fn apply(&mut self, command: Command, now: Instant, buzzers: &BuzzerSinks) {
        debug!(command = command.name(), "applying scoreboard command");
        match command {
            Command::ToggleMainClock => self.toggle_main_clock(now, buzzers),
            Command::ResetAndConfigure { minutes, seconds } => {
                self.apply_full_reset(duration_from_parts(minutes, seconds));
            }
            Command::ResetToConfigured => self.apply_full_reset(self.game_clock.duration_ms()),
            Command::ResetShotClock { preset } => self.reset_shot_clock_preset(preset, now),
            Command::ResetShotClockTo { ms } => {
                self.reset_shot_clock_only(non_negative_ms(ms), now);
            }
            Command::SetShotPresets { long_ms, short_ms } => {
                self.set_shot_presets(non_negative_ms(long_ms), non_negative_ms(short_ms));
            }
            Command::AdvanceQuarter => self.advance_quarter(),
            Command::RetreatQuarter => self.retreat_quarter(),
            Command::TogglePossession => {
                self.game.toggle_possession();
            }
            Command::Adjust {
                counter,
                side,
                delta,
            } => {
                self.adjust(counter, side, delta);
            }
        }
    }

    /// Pause both clocks when one runs; otherwise start or resume every clock with time left.
    ///
    /// Nothing restarts once the game clock has run out: the period is over
    /// until a reset or quarter change. A deadline that passed since the last
    /// scheduler pass still sounds its buzzer when the pause freezes it.
    pub fn toggle_main_clock(&mut self, now: Instant, buzzers: &BuzzerSinks) {
        if self.is_running() {
            self.check_expiries(now, buzzers);
            self.game_clock.pause(now);
            self.shot_clock.pause(now);
            info!("clocks paused");
            return;
        }

        if self.game_clock.sample(now) == 0 {
            debug!("game clock expired; toggle ignored");
            return;
        }

        self.game_clock.toggle(now);
        if self.shot_clock.sample(now) > 0 {
            self.shot_clock.toggle(now);
        }
        info!("clocks running");
    }

    /// Reconfigure the game clock and stop both clocks at their full values.
    pub fn apply_full_reset(&mut self, duration_ms: u64) {
        self.game_clock.configure(duration_ms);
        self.game_clock.reset_to_duration();
        self.shot_clock.reset(self.game.shot_presets().long_ms);
        info!(duration_ms, "clocks reset");
    }

    /// Reset only the shot clock.
    ///
    /// The game clock is untouched; when it is running the shot clock starts
    /// its new cycle immediately so both keep counting together.
    pub fn reset_shot_clock_only(&mut self, preset_ms: u64, now: Instant) {
        self.shot_clock.reset(preset_ms);
        if self.game_clock.is_running() {
            self.shot_clock.start(now);
        }
        debug!(preset_ms, "shot clock reset");
    }

    /// Reset only the shot clock to one of the configured presets.
    pub fn reset_shot_clock_preset(&mut self, preset: ShotPreset, now: Instant) {
        let preset_ms = self.game.shot_presets().resolve(preset);
        self.reset_shot_clock_only(preset_ms, now);
    }

    /// Replace both shot clock presets.
    pub fn set_shot_presets(&mut self, long_ms: u64, short_ms: u64) {
        self.game.set_shot_presets(ShotPresets { long_ms, short_ms });
    }

    /// Move to `quarter`; an actual change resets fouls and both clocks.
    pub fn set_quarter(&mut self, quarter: i32) {
        if !self.game.set_quarter(quarter) {
            return;
        }

        self.game_clock.reset_to_duration();
        self.shot_clock.reset(self.game.shot_presets().long_ms);
        info!(quarter = self.game.quarter(), "quarter changed");
    }

    /// Next quarter, clamped at 4.
    pub fn advance_quarter(&mut self) {
        self.set_quarter(i32::from(self.game.quarter()) + 1);
    }

    /// Previous quarter, clamped at 1.
    pub fn retreat_quarter(&mut self) {
        self.set_quarter(i32::from(self.game.quarter()) - 1);
    }

    /// Clamped counter change; returns the new value.
    pub fn adjust(&mut self, counter: CounterKind, side: Side, delta: i32) -> u32 {
        self.game.adjust_counter(counter, side, delta)
    }

    /// Scheduler pass: sample game clock, sample shot clock, buzzer checks, display.
    ///
    /// Game clock expiry ends the period, so the shot clock is frozen with it.
    pub fn tick(&mut self, now: Instant, buzzers: &BuzzerSinks) -> TickReport {
        let (game, shot) = self.check_expiries(now, buzzers);

        TickReport {
            game_expired: game.expired,
            shot_expired: shot.expired,
            running: self.is_running(),
            display: self.snapshot(now),
        }
    }

    /// Stop clocks that reached zero and sound their buzzers once.
    fn check_expiries(&mut self, now: Instant, buzzers: &BuzzerSinks) -> (ClockTick, ClockTick) {
        let game = self.game_clock.tick(now, || buzzers.game.play());
        let shot = self.shot_clock.tick(now, || buzzers.shot.play());

        if game.expired {
            self.shot_clock.pause(now);
            info!("game clock expired");
        }
        if shot.expired {
            info!(
                game_clock_ms = game.remaining_ms,
                "shot clock expired"
            );
        }

        (game, shot)
    }

    /// Read-only view for rendering.
    pub fn snapshot(&self, now: Instant) -> DisplaySnapshot {
        DisplaySnapshot::capture(self, now)
    }

    /// Lifecycle of one clock.
    pub fn clock_phase(&self, kind: ClockKind) -> ClockPhase {
        match kind {
            ClockKind::Game => self.game_clock.phase(),
            ClockKind::Shot => self.shot_clock.phase(),
        }
    }
}
