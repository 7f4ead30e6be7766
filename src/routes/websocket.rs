use axum::{
    Router,
    extract::{State, WebSocketUpgrade},
    response::Response,
    routing::get,
};
use tracing::warn;

use crate::{services::websocket_service, state::SharedState};

/// Control frames are single key names or commands.
const MAX_CONTROL_FRAME_BYTES: usize = 4 * 1024;

#[utoipa::path(
    get,
    path = "/ws",
    tag = "control",
    responses((status = 101, description = "Key-input control socket; text frames carry `key` or `command` messages"))
)]
/// Hand the upgraded socket to the control-panel session loop.
pub async fn control_socket(State(state): State<SharedState>, ws: WebSocketUpgrade) -> Response {
    ws.max_message_size(MAX_CONTROL_FRAME_BYTES)
        .max_frame_size(MAX_CONTROL_FRAME_BYTES)
        .on_failed_upgrade(|err| warn!(error = %err, "control socket upgrade failed"))
        .on_upgrade(move |socket| websocket_service::handle_socket(state, socket))
}

/// Configure the control socket endpoint.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/ws", get(control_socket))
}
