use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// First quarter of a game.
pub const MIN_QUARTER: u8 = 1;
/// Last quarter of a game.
pub const MAX_QUARTER: u8 = 4;
/// Highest score a side can show.
pub const MAX_SCORE: u32 = 180;
/// Team foul cap per quarter.
pub const MAX_FOULS: u32 = 5;
/// Timeouts available per half.
pub const MAX_TIMEOUTS: u32 = 3;

/// One of the two teams on the scoreboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Left side of the board.
    Home,
    /// Right side of the board.
    Visitor,
}

impl Side {
    /// The other team.
    pub fn opponent(self) -> Self {
        match self {
            Side::Home => Side::Visitor,
            Side::Visitor => Side::Home,
        }
    }
}

/// Counter kinds adjustable per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CounterKind {
    /// Points, 0 to 180.
    Score,
    /// Team fouls, 0 to 5.
    Foul,
    /// Timeouts left, 0 to 3.
    Timeout,
}

impl CounterKind {
    /// Upper clamp bound of the counter.
    pub fn max(self) -> u32 {
        match self {
            CounterKind::Score => MAX_SCORE,
            CounterKind::Foul => MAX_FOULS,
            CounterKind::Timeout => MAX_TIMEOUTS,
        }
    }
}

/// Value stored once per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerSide<T> {
    /// Home team value.
    pub home: T,
    /// Visitor team value.
    pub visitor: T,
}

impl<T: Copy> PerSide<T> {
    /// Same value for both sides.
    pub fn splat(value: T) -> Self {
        Self {
            home: value,
            visitor: value,
        }
    }

    /// Value for `side`.
    pub fn get(&self, side: Side) -> T {
        match side {
            Side::Home => self.home,
            Side::Visitor => self.visitor,
        }
    }

    /// Mutable slot for `side`.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Home => &mut self.home,
            Side::Visitor => &mut self.visitor,
        }
    }
}

/// Configurable shot clock reset targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ShotPresets {
    /// Full possession, 24 s by default.
    pub long_ms: u64,
    /// Offensive rebound reset, 14 s by default.
    pub short_ms: u64,
}

impl Default for ShotPresets {
    fn default() -> Self {
        Self {
            long_ms: 24_000,
            short_ms: 14_000,
        }
    }
}

/// Named shot clock preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ShotPreset {
    /// [`ShotPresets::long_ms`].
    Long,
    /// [`ShotPresets::short_ms`].
    Short,
}

impl ShotPresets {
    /// Milliseconds configured for `preset`.
    pub fn resolve(&self, preset: ShotPreset) -> u64 {
        match preset {
            ShotPreset::Long => self.long_ms,
            ShotPreset::Short => self.short_ms,
        }
    }
}

/// Clamp `counter + delta` into `[0, max]`.
pub fn adjust(counter: u32, delta: i32, max: u32) -> u32 {
    let next = i64::from(counter) + i64::from(delta);
    let clamped = next.clamp(0, i64::from(max));
    u32::try_from(clamped).unwrap_or(max)
}

/// Quarter, counters and possession of a session.
///
/// Clock side effects of quarter changes are applied by the owning
/// [`Scoreboard`](crate::state::scoreboard::Scoreboard); this type only
/// reports whether the quarter actually moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    quarter: u8,
    scores: PerSide<u32>,
    fouls: PerSide<u32>,
    timeouts: PerSide<u32>,
    possession: Side,
    shot_presets: ShotPresets,
}

impl GameState {
    /// Start of a game: quarter 1, zeroed scores and fouls, full timeouts, home possession.
    pub fn new(shot_presets: ShotPresets) -> Self {
        Self {
            quarter: MIN_QUARTER,
            scores: PerSide::splat(0),
            fouls: PerSide::splat(0),
            timeouts: PerSide::splat(MAX_TIMEOUTS),
            possession: Side::Home,
            shot_presets,
        }
    }

    /// Current quarter, 1 to 4.
    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    /// Points per side.
    pub fn scores(&self) -> PerSide<u32> {
        self.scores
    }

    /// Team fouls per side.
    pub fn fouls(&self) -> PerSide<u32> {
        self.fouls
    }

    /// Timeouts left per side.
    pub fn timeouts(&self) -> PerSide<u32> {
        self.timeouts
    }

    /// Side holding the possession arrow.
    pub fn possession(&self) -> Side {
        self.possession
    }

    /// Shot clock reset targets.
    pub fn shot_presets(&self) -> ShotPresets {
        self.shot_presets
    }

    /// Replace both shot clock reset targets.
    pub fn set_shot_presets(&mut self, presets: ShotPresets) {
        self.shot_presets = presets;
    }

    /// Apply a clamped delta to one side's counter and return the new value.
    pub fn adjust_counter(&mut self, kind: CounterKind, side: Side, delta: i32) -> u32 {
        let counters = match kind {
            CounterKind::Score => &mut self.scores,
            CounterKind::Foul => &mut self.fouls,
            CounterKind::Timeout => &mut self.timeouts,
        };
        let slot = counters.get_mut(side);
        *slot = adjust(*slot, delta, kind.max());
        *slot
    }

    /// Move to `quarter` (clamped), returning `true` when the quarter changed.
    ///
    /// A change clears both sides' fouls; landing on the first or third
    /// quarter also refills both sides' timeouts.
    pub fn set_quarter(&mut self, quarter: i32) -> bool {
        let target = quarter.clamp(i32::from(MIN_QUARTER), i32::from(MAX_QUARTER));
        let target = u8::try_from(target).unwrap_or(MAX_QUARTER);
        if target == self.quarter {
            return false;
        }

        self.quarter = target;
        self.fouls = PerSide::splat(0);
        if target == 1 || target == 3 {
            self.timeouts = PerSide::splat(MAX_TIMEOUTS);
        }
        true
    }

    /// Flip the possession arrow and return the new holder.
    pub fn toggle_possession(&mut self) -> Side {
        self.possession = self.possession.opponent();
        self.possession
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjust_clamps_both_ends() {
        assert_eq!(adjust(0, -1, 5), 0);
        assert_eq!(adjust(5, 1, 5), 5);
        assert_eq!(adjust(2, 2, 5), 4);
        assert_eq!(adjust(3, -100, 180), 0);
        assert_eq!(adjust(u32::MAX, i32::MAX, 180), 180);
    }

    #[test]
    fn repeated_increments_never_exceed_max() {
        let mut game = GameState::new(ShotPresets::default());
        for _ in 0..10_000 {
            let value = game.adjust_counter(CounterKind::Foul, Side::Home, 1);
            assert!(value <= MAX_FOULS);
        }
        assert_eq!(game.fouls().home, MAX_FOULS);
        assert_eq!(game.fouls().visitor, 0);
    }

    #[test]
    fn counters_use_their_own_bounds() {
        let mut game = GameState::new(ShotPresets::default());
        game.adjust_counter(CounterKind::Score, Side::Visitor, 500);
        game.adjust_counter(CounterKind::Timeout, Side::Home, 4);
        game.adjust_counter(CounterKind::Timeout, Side::Visitor, -7);

        assert_eq!(game.scores().visitor, MAX_SCORE);
        assert_eq!(game.timeouts().home, MAX_TIMEOUTS);
        assert_eq!(game.timeouts().visitor, 0);
    }

    #[test]
    fn quarter_is_clamped_and_unchanged_quarter_is_noop() {
        let mut game = GameState::new(ShotPresets::default());
        game.adjust_counter(CounterKind::Foul, Side::Home, 2);

        assert!(!game.set_quarter(0));
        assert_eq!(game.quarter(), 1);
        assert_eq!(game.fouls().home, 2);

        assert!(game.set_quarter(9));
        assert_eq!(game.quarter(), MAX_QUARTER);
        assert!(!game.set_quarter(5));
    }

    #[test]
    fn quarter_change_resets_fouls_and_refills_timeouts_on_odd_quarters() {
        let mut game = GameState::new(ShotPresets::default());
        game.adjust_counter(CounterKind::Timeout, Side::Home, -2);
        game.adjust_counter(CounterKind::Foul, Side::Visitor, 3);
        game.adjust_counter(CounterKind::Score, Side::Home, 12);

        assert!(game.set_quarter(2));
        assert_eq!(game.fouls(), PerSide::splat(0));
        assert_eq!(game.timeouts().home, 1);

        game.adjust_counter(CounterKind::Foul, Side::Home, 1);
        assert!(game.set_quarter(3));
        assert_eq!(game.fouls(), PerSide::splat(0));
        assert_eq!(game.timeouts(), PerSide::splat(MAX_TIMEOUTS));
        assert_eq!(game.scores().home, 12);
    }

    #[test]
    fn possession_flips() {
        let mut game = GameState::new(ShotPresets::default());
        assert_eq!(game.possession(), Side::Home);
        assert_eq!(game.toggle_possession(), Side::Visitor);
        assert_eq!(game.toggle_possession(), Side::Home);
    }

    #[test]
    fn presets_resolve_by_name() {
        let presets = ShotPresets {
            long_ms: 30_000,
            short_ms: 15_000,
        };
        assert_eq!(presets.resolve(ShotPreset::Long), 30_000);
        assert_eq!(presets.resolve(ShotPreset::Short), 15_000);
    }
}
