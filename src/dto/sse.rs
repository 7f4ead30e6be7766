use std::time::SystemTime;

use serde::Serialize;
use utoipa::ToSchema;

use crate::{dto::format_system_time, state::scoreboard::ClockKind};

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
}

impl ServerEvent {
    /// Build an event from an already serialised payload.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the external display link fails or recovers.
pub struct SystemStatus {
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a countdown reaches zero; the rendering client sounds the horn.
pub struct BuzzerEvent {
    pub clock: ClockKind,
    /// RFC 3339 timestamp of the expiry.
    pub at: String,
}

impl BuzzerEvent {
    pub fn new(clock: ClockKind, at: SystemTime) -> Self {
        Self {
            clock,
            at: format_system_time(at),
        }
    }
}
