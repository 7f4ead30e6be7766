//! Display text for the two countdowns.
//!
//! Whole seconds are rounded up so a digit stays visible until it has fully
//! elapsed; the sub-second digit is truncated to tenths.

const MILLIS_PER_SECOND: u64 = 1_000;
const MILLIS_PER_MINUTE: u64 = 60_000;
/// Above this many milliseconds the shot clock shows whole seconds only.
const SHOT_CLOCK_TENTHS_THRESHOLD_MS: u64 = 4_000;
const EXPIRED_TEXT: &str = "0.0";

/// Game clock text: `m:ss` from one minute up, seconds with tenths below.
pub fn format_game_clock(ms: u64) -> String {
    if ms == 0 {
        return EXPIRED_TEXT.into();
    }

    if ms >= MILLIS_PER_MINUTE {
        let minutes = ms / MILLIS_PER_MINUTE;
        let seconds = (ms % MILLIS_PER_MINUTE).div_ceil(MILLIS_PER_SECOND);
        return format!("{minutes}:{seconds:02}");
    }

    format_with_tenths(ms)
}

/// Shot clock text: whole seconds above four seconds, tenths at or below.
pub fn format_shot_clock(ms: u64) -> String {
    if ms == 0 {
        return EXPIRED_TEXT.into();
    }

    if ms > SHOT_CLOCK_TENTHS_THRESHOLD_MS {
        return ms.div_ceil(MILLIS_PER_SECOND).to_string();
    }

    format_with_tenths(ms)
}

/// `mm:ss` text pushed to the physical display, truncated to whole seconds.
pub fn format_device_time(ms: u64) -> String {
    let total_seconds = ms / MILLIS_PER_SECOND;
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

fn format_with_tenths(ms: u64) -> String {
    let seconds = ms.div_ceil(MILLIS_PER_SECOND);
    let remainder = ms % MILLIS_PER_SECOND;
    if remainder == 0 {
        return seconds.to_string();
    }

    format!("{seconds}.{}", remainder / 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_clock_boundaries() {
        assert_eq!(format_game_clock(0), "0.0");
        assert_eq!(format_game_clock(60_000), "1:00");
        assert_eq!(format_game_clock(59_000), "59");
        assert_eq!(format_game_clock(59_999), "60.9");
        assert_eq!(format_game_clock(600_000), "10:00");
        assert_eq!(format_game_clock(597_000), "9:57");
    }

    #[test]
    fn game_clock_minutes_round_seconds_up() {
        assert_eq!(format_game_clock(61_001), "1:02");
        assert_eq!(format_game_clock(119_500), "1:60");
        assert_eq!(format_game_clock(90_000), "1:30");
    }

    #[test]
    fn game_clock_under_a_minute_uses_tenths() {
        assert_eq!(format_game_clock(1), "1.0");
        assert_eq!(format_game_clock(450), "1.4");
        assert_eq!(format_game_clock(1_000), "1");
        assert_eq!(format_game_clock(12_345), "13.3");
    }

    #[test]
    fn shot_clock_boundaries() {
        assert_eq!(format_shot_clock(0), "0.0");
        assert_eq!(format_shot_clock(4_000), "4");
        assert_eq!(format_shot_clock(4_001), "5");
        assert_eq!(format_shot_clock(3_500), "4.5");
        assert_eq!(format_shot_clock(24_000), "24");
        assert_eq!(format_shot_clock(21_000), "21");
        assert_eq!(format_shot_clock(13_100), "14");
    }

    #[test]
    fn device_time_is_zero_padded() {
        assert_eq!(format_device_time(600_000), "10:00");
        assert_eq!(format_device_time(597_400), "09:57");
        assert_eq!(format_device_time(999), "00:00");
        assert_eq!(format_device_time(0), "00:00");
    }
}
