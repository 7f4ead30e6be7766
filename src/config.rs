//! Application-level configuration loading: clock durations, shot clock presets,
//! scheduler cadence, the external display link and key bindings.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_with::{DurationMilliSeconds, serde_as};
use tracing::{info, warn};

use crate::{
    services::input::KeyBindings,
    state::{command::Command, game::ShotPresets},
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "COURTCLOCK_CONFIG_PATH";
/// Environment variable that overrides the external display address.
const DISPLAY_URL_ENV: &str = "COURTCLOCK_DISPLAY_URL";

const DEFAULT_GAME_DURATION: Duration = Duration::from_secs(10 * 60);
const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);
/// Lower bound keeping the scheduler interval non-zero.
const MIN_TICK_INTERVAL: Duration = Duration::from_millis(10);
const DEFAULT_DISPLAY_SYNC_INTERVAL: Duration = Duration::from_millis(500);
const DEFAULT_DISPLAY_SYNC_TIMEOUT: Duration = Duration::from_secs(1);

/// How to reach the physical display that mirrors the game clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySyncConfig {
    /// Base address of the device, e.g. `http://192.168.0.107`.
    pub url: String,
    /// Push period; never shorter than 500 ms.
    pub interval: Duration,
    pub timeout: Duration,
}

/// Where buzzer expiries are sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuzzerOutput {
    /// `buzzer` events on the public SSE stream; the rendering client plays the horn.
    #[default]
    Sse,
    /// Log lines only, for headless runs.
    Log,
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    game_duration: Duration,
    shot_presets: ShotPresets,
    tick_interval: Duration,
    buzzer_output: BuzzerOutput,
    display_sync: Option<DisplaySyncConfig>,
    key_bindings: KeyBindings,
}

impl AppConfig {
    /// Load the configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let config = match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json_str(&contents) {
                Ok(config) => {
                    info!(
                        path = %path.display(),
                        game_duration_ms = config.game_duration_ms(),
                        display_sync = config.display_sync.is_some(),
                        "loaded scoreboard config"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        config.with_display_url_override(env::var(DISPLAY_URL_ENV).ok())
    }

    /// Parse the JSON configuration format.
    pub fn from_json_str(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }

    pub fn game_duration_ms(&self) -> u64 {
        duration_to_ms(self.game_duration)
    }

    pub fn shot_presets(&self) -> ShotPresets {
        self.shot_presets
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn buzzer_output(&self) -> BuzzerOutput {
        self.buzzer_output
    }

    pub fn display_sync(&self) -> Option<&DisplaySyncConfig> {
        self.display_sync.as_ref()
    }

    pub fn key_bindings(&self) -> &KeyBindings {
        &self.key_bindings
    }

    fn with_display_url_override(mut self, url: Option<String>) -> Self {
        let Some(url) = url.filter(|value| !value.trim().is_empty()) else {
            return self;
        };

        info!(url = %url, "display sync address overridden from environment");
        let (interval, timeout) = self
            .display_sync
            .as_ref()
            .map(|sync| (sync.interval, sync.timeout))
            .unwrap_or((DEFAULT_DISPLAY_SYNC_INTERVAL, DEFAULT_DISPLAY_SYNC_TIMEOUT));
        self.display_sync = Some(DisplaySyncConfig {
            url,
            interval,
            timeout,
        });
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    game_duration_ms: Duration,
    shot_clock: RawShotClock,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    tick_interval_ms: Duration,
    buzzer_output: BuzzerOutput,
    display_sync: Option<RawDisplaySync>,
    /// Entries replace or extend the built-in bindings.
    key_bindings: IndexMap<String, Command>,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            game_duration_ms: DEFAULT_GAME_DURATION,
            shot_clock: RawShotClock::default(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL,
            buzzer_output: BuzzerOutput::default(),
            display_sync: None,
            key_bindings: IndexMap::new(),
        }
    }
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let mut key_bindings = KeyBindings::default();
        for (key, command) in value.key_bindings {
            key_bindings.bind(key, command);
        }

        Self {
            game_duration: value.game_duration_ms,
            shot_presets: ShotPresets {
                long_ms: value.shot_clock.long_ms,
                short_ms: value.shot_clock.short_ms,
            },
            tick_interval: value.tick_interval_ms.max(MIN_TICK_INTERVAL),
            buzzer_output: value.buzzer_output,
            display_sync: value.display_sync.map(Into::into),
            key_bindings,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
/// Shot clock reset targets in milliseconds.
struct RawShotClock {
    long_ms: u64,
    short_ms: u64,
}

impl Default for RawShotClock {
    fn default() -> Self {
        let presets = ShotPresets::default();
        Self {
            long_ms: presets.long_ms,
            short_ms: presets.short_ms,
        }
    }
}

#[serde_as]
#[derive(Debug, Deserialize)]
/// JSON representation of the external display block.
struct RawDisplaySync {
    url: String,
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    interval_ms: Option<Duration>,
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    timeout_ms: Option<Duration>,
}

impl From<RawDisplaySync> for DisplaySyncConfig {
    fn from(value: RawDisplaySync) -> Self {
        Self {
            url: value.url,
            interval: value
                .interval_ms
                .unwrap_or(DEFAULT_DISPLAY_SYNC_INTERVAL)
                .max(DEFAULT_DISPLAY_SYNC_INTERVAL),
            timeout: value.timeout_ms.unwrap_or(DEFAULT_DISPLAY_SYNC_TIMEOUT),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::game::{CounterKind, Side};

    #[test]
    fn defaults_match_a_ten_minute_quarter() {
        let config = AppConfig::default();
        assert_eq!(config.game_duration_ms(), 600_000);
        assert_eq!(config.shot_presets(), ShotPresets::default());
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
        assert!(config.display_sync().is_none());
        assert_eq!(config.buzzer_output(), BuzzerOutput::Sse);
        assert_eq!(
            config.key_bindings().resolve("Enter"),
            Some(&Command::ToggleMainClock)
        );
    }

    #[test]
    fn parses_partial_file() {
        let config = AppConfig::from_json_str(
            r#"{
                "game_duration_ms": 720000,
                "shot_clock": { "long_ms": 30000 },
                "display_sync": { "url": "http://192.168.0.107", "interval_ms": 100 },
                "key_bindings": { "p": { "command": "adjust", "counter": "score", "side": "home", "delta": 3 } }
            }"#,
        )
        .unwrap();

        assert_eq!(config.game_duration_ms(), 720_000);
        assert_eq!(config.shot_presets().long_ms, 30_000);
        assert_eq!(config.shot_presets().short_ms, 14_000);

        let sync = config.display_sync().unwrap();
        assert_eq!(sync.url, "http://192.168.0.107");
        assert_eq!(sync.interval, Duration::from_millis(500));
        assert_eq!(sync.timeout, Duration::from_secs(1));

        assert_eq!(
            config.key_bindings().resolve("p"),
            Some(&Command::adjust(CounterKind::Score, Side::Home, 3))
        );
        assert_eq!(
            config.key_bindings().resolve("w"),
            Some(&Command::adjust(CounterKind::Score, Side::Home, 1))
        );
    }

    #[test]
    fn zero_tick_interval_is_raised() {
        let config =
            AppConfig::from_json_str(r#"{ "tick_interval_ms": 0, "buzzer_output": "log" }"#)
                .unwrap();
        assert_eq!(config.tick_interval(), MIN_TICK_INTERVAL);
        assert_eq!(config.buzzer_output(), BuzzerOutput::Log);
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(AppConfig::from_json_str(r#"{ "game_duration_ms": "soon" }"#).is_err());
    }

    #[test]
    fn environment_url_enables_display_sync() {
        let config = AppConfig::default()
            .with_display_url_override(Some("http://10.0.0.2".into()));
        let sync = config.display_sync().unwrap();
        assert_eq!(sync.url, "http://10.0.0.2");
        assert_eq!(sync.interval, DEFAULT_DISPLAY_SYNC_INTERVAL);

        let config = AppConfig::default().with_display_url_override(Some("  ".into()));
        assert!(config.display_sync().is_none());
    }
}
