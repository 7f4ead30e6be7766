use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{dto::display::DisplaySnapshot, state::command::Command};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
/// Messages accepted from control-panel WebSocket clients.
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlInboundMessage {
    /// A key press resolved through the binding table.
    Key { key: String },
    /// A command sent directly, bypassing key bindings.
    Command { command: Command },
}

impl ControlInboundMessage {
    /// Parse a raw text frame.
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Reply sent after each inbound control message.
pub struct ControlAck {
    /// Whether the message resolved to a command that was executed.
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplaySnapshot>,
}

impl ControlAck {
    pub fn executed(command: &Command, display: DisplaySnapshot) -> Self {
        Self {
            accepted: true,
            command: Some(command.name().to_string()),
            display: Some(display),
        }
    }

    pub fn ignored() -> Self {
        Self {
            accepted: false,
            command: None,
            display: None,
        }
    }
}
