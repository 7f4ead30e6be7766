use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the scoreboard service.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::websocket::control_socket,
        crate::routes::scoreboard::get_scoreboard,
        crate::routes::scoreboard::toggle_clock,
        crate::routes::scoreboard::reset_clock,
        crate::routes::scoreboard::reset_shot_clock,
        crate::routes::scoreboard::set_shot_presets,
        crate::routes::scoreboard::next_quarter,
        crate::routes::scoreboard::previous_quarter,
        crate::routes::scoreboard::toggle_possession,
        crate::routes::scoreboard::adjust_score,
        crate::routes::scoreboard::adjust_fouls,
        crate::routes::scoreboard::adjust_timeouts,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::display::DisplaySnapshot,
            crate::dto::display::SideCounts,
            crate::dto::commands::ResetClockRequest,
            crate::dto::commands::ShotClockResetRequest,
            crate::dto::commands::ShotPresetsRequest,
            crate::dto::commands::CounterAdjustmentRequest,
            crate::dto::sse::SystemStatus,
            crate::dto::sse::BuzzerEvent,
            crate::dto::ws::ControlInboundMessage,
            crate::dto::ws::ControlAck,
            crate::state::command::Command,
            crate::state::game::Side,
            crate::state::game::CounterKind,
            crate::state::game::ShotPreset,
            crate::state::game::ShotPresets,
            crate::state::scoreboard::ClockKind,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "scoreboard", description = "Clock and game state commands"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "control", description = "WebSocket key-input control socket"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_scoreboard_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/scoreboard/clock/toggle"));
        assert!(doc.paths.paths.contains_key("/scoreboard/shot-clock/presets"));
        assert!(doc.paths.paths.contains_key("/healthcheck"));
    }
}
