use std::convert::Infallible;

use axum::{Router, extract::State, response::sse::Sse, routing::get};
use futures::Stream;
use tracing::info;

use crate::{
    services::{scoreboard_service, sse_events, sse_service},
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/sse/public",
    tag = "sse",
    responses((status = 200, description = "Scoreboard, buzzer and status events", content_type = "text/event-stream", body = String))
)]
/// Stream realtime scoreboard events to rendering clients.
pub async fn public_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let receiver = sse_service::subscribe_public(&state);
    info!(
        subscribers = state.public_sse().subscriber_count(),
        "New public SSE connection"
    );
    sse_service::broadcast_public_info(state.public_sse(), "public stream connected");

    // Idle clocks produce no ticks, so hand the newcomer a frame right away.
    let display = scoreboard_service::sample_display(&state).await;
    sse_events::broadcast_scoreboard(&state, &display);

    sse_service::to_sse_stream(receiver)
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/sse/public", get(public_stream))
}
