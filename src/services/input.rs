//! Keyboard-style input: one table from key names to scoreboard commands.

use indexmap::IndexMap;
use tracing::debug;

use crate::state::{
    command::Command,
    game::{CounterKind, ShotPreset, Side},
};

/// Key name to command table consulted by the control socket.
///
/// Key names follow the browser `KeyboardEvent.key` convention
/// (`"Enter"`, `"Shift"`, `"w"`), matched exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings(IndexMap<String, Command>);

impl KeyBindings {
    pub fn resolve(&self, key: &str) -> Option<&Command> {
        let command = self.0.get(key);
        if command.is_none() {
            debug!(key, "no binding for key");
        }
        command
    }

    /// Bind `key`, replacing any previous binding.
    pub fn bind(&mut self, key: impl Into<String>, command: Command) {
        self.0.insert(key.into(), command);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Command)> {
        self.0.iter().map(|(key, command)| (key.as_str(), command))
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        use CounterKind::{Foul, Score, Timeout};
        use Side::{Home, Visitor};

        let counters = [
            ("w", "q", Score, Home),
            ("o", "i", Score, Visitor),
            ("s", "a", Foul, Home),
            ("l", "k", Foul, Visitor),
            ("x", "z", Timeout, Home),
            ("m", "n", Timeout, Visitor),
        ];

        let mut table = IndexMap::new();
        for (up, down, counter, side) in counters {
            table.insert(up.to_string(), Command::adjust(counter, side, 1));
            table.insert(down.to_string(), Command::adjust(counter, side, -1));
        }

        table.insert("'".to_string(), Command::AdvanceQuarter);
        table.insert(";".to_string(), Command::RetreatQuarter);
        table.insert(
            ",".to_string(),
            Command::ResetShotClock {
                preset: ShotPreset::Long,
            },
        );
        table.insert(
            ".".to_string(),
            Command::ResetShotClock {
                preset: ShotPreset::Short,
            },
        );
        table.insert("Enter".to_string(), Command::ToggleMainClock);
        table.insert("Shift".to_string(), Command::ResetToConfigured);
        table.insert("Control".to_string(), Command::TogglePossession);

        Self(table)
    }
}
