use std::time::Duration;

use tokio::time::Instant;

use crate::state::buzzer::BuzzerController;

const MILLIS_PER_SECOND: u64 = 1_000;

/// Absolute instant at which a countdown reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockDeadline(Instant);

impl ClockDeadline {
    /// Deadline lying `remaining_ms` after `now`.
    pub fn after(now: Instant, remaining_ms: u64) -> Self {
        Self(now + Duration::from_millis(remaining_ms))
    }

    /// Milliseconds left before the deadline, saturating at zero once it has passed.
    pub fn remaining_ms(&self, now: Instant) -> u64 {
        let left = self.0.saturating_duration_since(now).as_millis();
        u64::try_from(left).unwrap_or(u64::MAX)
    }
}

/// Observable lifecycle of a [`CountdownClock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockPhase {
    /// Freshly reset; the next toggle performs an aligned start.
    NeverStarted,
    /// Counting down towards its deadline.
    Running,
    /// Started at least once in this cycle and currently frozen.
    Paused,
}

/// Result of a single scheduler pass over one clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTick {
    /// Remaining time sampled by the pass.
    pub remaining_ms: u64,
    /// The clock ran out during this pass and its buzzer was dispatched.
    pub expired: bool,
}

/// Pausable countdown whose running value is always derived from a deadline.
///
/// While running, `remaining_ms` is only a cache refreshed on pause; callers
/// read the live value through [`CountdownClock::sample`]. Invalid-state calls
/// (starting a running clock, pausing a paused one, ...) are silent no-ops.
#[derive(Debug, Clone)]
pub struct CountdownClock {
    duration_ms: u64,
    remaining_ms: u64,
    deadline: Option<ClockDeadline>,
    running: bool,
    buzzer: BuzzerController,
}

impl CountdownClock {
    /// Build a stopped clock holding its full configured duration.
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            remaining_ms: duration_ms,
            deadline: None,
            running: false,
            buzzer: BuzzerController::default(),
        }
    }

    /// Configured full duration used by resets.
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Change the configured full duration without touching the remaining time.
    pub fn configure(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }

    /// Whether the clock is counting down.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> ClockPhase {
        match (self.running, self.deadline) {
            (true, _) => ClockPhase::Running,
            (false, None) => ClockPhase::NeverStarted,
            (false, Some(_)) => ClockPhase::Paused,
        }
    }

    /// Expiry signal state for the current cycle.
    pub fn buzzer(&self) -> BuzzerController {
        self.buzzer
    }

    /// First start of a cycle.
    ///
    /// The remaining time is rounded up to a whole second so the first
    /// displayed tick is a full one.
    pub fn start(&mut self, now: Instant) {
        if self.running || self.deadline.is_some() {
            return;
        }

        self.remaining_ms = align_to_second(self.remaining_ms);
        self.run_from(now);
    }

    /// Continue a paused clock from its frozen remaining time.
    pub fn resume(&mut self, now: Instant) {
        if self.running || self.deadline.is_none() {
            return;
        }

        self.run_from(now);
    }

    /// Freeze the remaining time.
    pub fn pause(&mut self, now: Instant) {
        if !self.running {
            return;
        }

        self.remaining_ms = self
            .deadline
            .map_or(0, |deadline| deadline.remaining_ms(now));
        self.running = false;
    }

    /// Single-control behaviour: pause when running, otherwise start or resume.
    pub fn toggle(&mut self, now: Instant) {
        match self.phase() {
            ClockPhase::Running => self.pause(now),
            ClockPhase::NeverStarted => self.start(now),
            ClockPhase::Paused => self.resume(now),
        }
    }

    /// Remaining time at `now` without mutating the clock.
    pub fn sample(&self, now: Instant) -> u64 {
        match (self.running, self.deadline) {
            (true, Some(deadline)) => deadline.remaining_ms(now),
            _ => self.remaining_ms,
        }
    }

    /// Stop the clock and load `remaining_ms` as the start of a new cycle.
    pub fn reset(&mut self, remaining_ms: u64) {
        self.remaining_ms = remaining_ms;
        self.deadline = None;
        self.running = false;
        self.buzzer.rearm();
    }

    /// Reset to the configured full duration.
    pub fn reset_to_duration(&mut self) {
        self.reset(self.duration_ms);
    }

    /// Scheduler pass: sample, stop at zero and fire the buzzer at most once per cycle.
    pub fn tick<F>(&mut self, now: Instant, dispatch: F) -> ClockTick
    where
        F: FnOnce(),
    {
        let remaining_ms = self.sample(now);
        if !self.running {
            return ClockTick {
                remaining_ms,
                expired: false,
            };
        }

        if remaining_ms == 0 {
            self.pause(now);
        }
        let expired = self.buzzer.check_and_fire(remaining_ms, dispatch);

        ClockTick {
            remaining_ms,
            expired,
        }
    }

    fn run_from(&mut self, now: Instant) {
        self.deadline = Some(ClockDeadline::after(now, self.remaining_ms));
        self.running = true;
        self.buzzer.rearm();
    }
}

/// Round up to the next whole second.
pub fn align_to_second(ms: u64) -> u64 {
    ms.div_ceil(MILLIS_PER_SECOND)
        .saturating_mul(MILLIS_PER_SECOND)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn new_clock_is_never_started() {
        let clock = CountdownClock::new(24_000);
        assert_eq!(clock.phase(), ClockPhase::NeverStarted);
        assert_eq!(clock.sample(Instant::now()), 24_000);
    }

    #[test]
    fn start_aligns_to_whole_second() {
        let t0 = Instant::now();
        let mut clock = CountdownClock::new(0);
        clock.reset(9_250);

        clock.start(t0);
        assert_eq!(clock.sample(t0), 10_000);
        assert_eq!(clock.sample(t0 + ms(250)), 9_750);
    }

    #[test]
    fn resume_does_not_realign() {
        let t0 = Instant::now();
        let mut clock = CountdownClock::new(10_000);
        clock.start(t0);
        clock.pause(t0 + ms(1_250));
        assert_eq!(clock.phase(), ClockPhase::Paused);

        let t1 = t0 + ms(5_000);
        clock.resume(t1);
        assert_eq!(clock.sample(t1), 8_750);
    }

    #[test]
    fn pause_freezes_remaining() {
        let t0 = Instant::now();
        let mut clock = CountdownClock::new(24_000);
        clock.start(t0);
        clock.pause(t0 + ms(3_000));

        assert_eq!(clock.sample(t0 + ms(3_000)), 21_000);
        assert_eq!(clock.sample(t0 + ms(60_000)), 21_000);
    }

    #[test]
    fn invalid_state_calls_are_noops() {
        let t0 = Instant::now();
        let mut clock = CountdownClock::new(24_000);

        clock.pause(t0);
        clock.resume(t0);
        assert_eq!(clock.phase(), ClockPhase::NeverStarted);

        clock.start(t0);
        clock.start(t0 + ms(2_000));
        assert_eq!(clock.sample(t0 + ms(2_000)), 22_000);

        clock.pause(t0 + ms(2_000));
        clock.pause(t0 + ms(4_000));
        assert_eq!(clock.sample(t0 + ms(4_000)), 22_000);

        clock.start(t0 + ms(4_000));
        assert_eq!(clock.phase(), ClockPhase::Paused);
    }

    #[test]
    fn toggle_walks_the_state_machine() {
        let t0 = Instant::now();
        let mut clock = CountdownClock::new(24_000);

        clock.toggle(t0);
        assert_eq!(clock.phase(), ClockPhase::Running);
        clock.toggle(t0 + ms(1_000));
        assert_eq!(clock.phase(), ClockPhase::Paused);
        clock.toggle(t0 + ms(2_000));
        assert_eq!(clock.phase(), ClockPhase::Running);
        assert_eq!(clock.sample(t0 + ms(2_000)), 23_000);

        clock.reset(14_000);
        assert_eq!(clock.phase(), ClockPhase::NeverStarted);
        assert_eq!(clock.sample(t0 + ms(9_000)), 14_000);
    }

    #[test]
    fn remaining_depends_on_running_time_only() {
        let t0 = Instant::now();
        let mut clock = CountdownClock::new(600_000);
        clock.start(t0);

        // Segments of (running ms, paused ms); ticks never influence the result.
        let segments = [(1_337, 500), (250, 10_000), (4_999, 1), (12_345, 0)];
        let mut now = t0;
        let mut running_total = 0;
        for (run, idle) in segments {
            now += ms(run);
            running_total += run;
            clock.pause(now);
            now += ms(idle);
            clock.resume(now);
        }

        assert_eq!(clock.sample(now), 600_000 - running_total);
    }

    #[test]
    fn tick_stops_at_zero_and_fires_once() {
        let t0 = Instant::now();
        let mut clock = CountdownClock::new(1_000);
        clock.start(t0);
        let mut plays = 0;

        let tick = clock.tick(t0 + ms(500), || plays += 1);
        assert_eq!(tick.remaining_ms, 500);
        assert!(!tick.expired);

        let tick = clock.tick(t0 + ms(1_100), || plays += 1);
        assert_eq!(tick.remaining_ms, 0);
        assert!(tick.expired);
        assert_eq!(clock.phase(), ClockPhase::Paused);

        for step in 0..20 {
            clock.tick(t0 + ms(1_200 + step * 100), || plays += 1);
        }
        assert_eq!(plays, 1);
    }

    #[test]
    fn reset_rearms_buzzer() {
        let t0 = Instant::now();
        let mut clock = CountdownClock::new(1_000);
        let mut plays = 0;

        clock.start(t0);
        clock.tick(t0 + ms(1_000), || plays += 1);
        assert!(clock.buzzer().has_fired());

        clock.reset(1_000);
        assert!(!clock.buzzer().has_fired());
        clock.start(t0 + ms(2_000));
        clock.tick(t0 + ms(3_000), || plays += 1);
        assert_eq!(plays, 2);
    }

    #[test]
    fn align_rounds_up_only_partial_seconds() {
        assert_eq!(align_to_second(0), 0);
        assert_eq!(align_to_second(1), 1_000);
        assert_eq!(align_to_second(24_000), 24_000);
        assert_eq!(align_to_second(24_001), 25_000);
    }
}
