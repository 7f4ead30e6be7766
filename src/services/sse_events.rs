use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{
        display::DisplaySnapshot,
        sse::{ServerEvent, SystemStatus},
    },
    state::SharedState,
};

const EVENT_SCOREBOARD: &str = "scoreboard";
const EVENT_SYSTEM_STATUS: &str = "system.status";

/// Broadcast the current display to public subscribers.
pub fn broadcast_scoreboard(state: &SharedState, display: &DisplaySnapshot) {
    send_public_event(state, EVENT_SCOREBOARD, display);
}

/// Broadcast the external display link health.
pub fn broadcast_system_status(state: &SharedState, degraded: bool) {
    send_public_event(state, EVENT_SYSTEM_STATUS, &SystemStatus { degraded });
}

fn send_public_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.public_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize public SSE payload"),
    }
}
