use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};
use validator::Validate;

use crate::{
    dto::{
        commands::{
            CounterAdjustmentRequest, ResetClockRequest, ShotClockResetRequest,
            ShotPresetsRequest,
        },
        display::DisplaySnapshot,
    },
    error::AppError,
    services::scoreboard_service,
    state::{SharedState, command::Command, game::CounterKind},
};

/// Scoreboard operator endpoints. Each command answers with the fresh display.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/scoreboard", get(get_scoreboard))
        .route("/scoreboard/clock/toggle", post(toggle_clock))
        .route("/scoreboard/clock/reset", post(reset_clock))
        .route("/scoreboard/shot-clock/reset", post(reset_shot_clock))
        .route("/scoreboard/shot-clock/presets", put(set_shot_presets))
        .route("/scoreboard/quarter/next", post(next_quarter))
        .route("/scoreboard/quarter/previous", post(previous_quarter))
        .route("/scoreboard/possession/toggle", post(toggle_possession))
        .route("/scoreboard/score", post(adjust_score))
        .route("/scoreboard/fouls", post(adjust_fouls))
        .route("/scoreboard/timeouts", post(adjust_timeouts))
}

#[utoipa::path(
    get,
    path = "/scoreboard",
    tag = "scoreboard",
    responses((status = 200, description = "Current display", body = DisplaySnapshot))
)]
/// Sample both clocks and the game state without changing anything.
pub async fn get_scoreboard(State(state): State<SharedState>) -> Json<DisplaySnapshot> {
    Json(scoreboard_service::sample_display(&state).await)
}

#[utoipa::path(
    post,
    path = "/scoreboard/clock/toggle",
    tag = "scoreboard",
    responses((status = 200, description = "Clocks paused or started", body = DisplaySnapshot))
)]
/// Pause both clocks when running, otherwise start or resume them.
pub async fn toggle_clock(State(state): State<SharedState>) -> Json<DisplaySnapshot> {
    execute(&state, Command::ToggleMainClock).await
}

#[utoipa::path(
    post,
    path = "/scoreboard/clock/reset",
    tag = "scoreboard",
    request_body = ResetClockRequest,
    responses(
        (status = 200, description = "Clocks reset to the new duration", body = DisplaySnapshot),
        (status = 400, description = "Invalid duration")
    )
)]
/// Configure a new game clock duration and stop both clocks at their full values.
pub async fn reset_clock(
    State(state): State<SharedState>,
    Json(payload): Json<ResetClockRequest>,
) -> Result<Json<DisplaySnapshot>, AppError> {
    let display = scoreboard_service::execute_validated(&state, payload).await?;
    Ok(Json(display))
}

#[utoipa::path(
    post,
    path = "/scoreboard/shot-clock/reset",
    tag = "scoreboard",
    request_body = ShotClockResetRequest,
    responses(
        (status = 200, description = "Shot clock reset", body = DisplaySnapshot),
        (status = 400, description = "Neither or both of preset and ms given")
    )
)]
/// Reset only the shot clock, to a preset or an explicit value.
pub async fn reset_shot_clock(
    State(state): State<SharedState>,
    Json(payload): Json<ShotClockResetRequest>,
) -> Result<Json<DisplaySnapshot>, AppError> {
    let display = scoreboard_service::execute_validated(&state, payload).await?;
    Ok(Json(display))
}

#[utoipa::path(
    put,
    path = "/scoreboard/shot-clock/presets",
    tag = "scoreboard",
    request_body = ShotPresetsRequest,
    responses(
        (status = 200, description = "Presets replaced", body = DisplaySnapshot),
        (status = 400, description = "Invalid preset values")
    )
)]
/// Replace the long and short shot clock presets.
pub async fn set_shot_presets(
    State(state): State<SharedState>,
    Json(payload): Json<ShotPresetsRequest>,
) -> Result<Json<DisplaySnapshot>, AppError> {
    let display = scoreboard_service::execute_validated(&state, payload).await?;
    Ok(Json(display))
}

#[utoipa::path(
    post,
    path = "/scoreboard/quarter/next",
    tag = "scoreboard",
    responses((status = 200, description = "Quarter advanced (capped at 4)", body = DisplaySnapshot))
)]
pub async fn next_quarter(State(state): State<SharedState>) -> Json<DisplaySnapshot> {
    execute(&state, Command::AdvanceQuarter).await
}

#[utoipa::path(
    post,
    path = "/scoreboard/quarter/previous",
    tag = "scoreboard",
    responses((status = 200, description = "Quarter decreased (floored at 1)", body = DisplaySnapshot))
)]
pub async fn previous_quarter(State(state): State<SharedState>) -> Json<DisplaySnapshot> {
    execute(&state, Command::RetreatQuarter).await
}

#[utoipa::path(
    post,
    path = "/scoreboard/possession/toggle",
    tag = "scoreboard",
    responses((status = 200, description = "Possession arrow flipped", body = DisplaySnapshot))
)]
pub async fn toggle_possession(State(state): State<SharedState>) -> Json<DisplaySnapshot> {
    execute(&state, Command::TogglePossession).await
}

#[utoipa::path(
    post,
    path = "/scoreboard/score",
    tag = "scoreboard",
    request_body = CounterAdjustmentRequest,
    responses((status = 200, description = "Score adjusted within 0..=180", body = DisplaySnapshot))
)]
pub async fn adjust_score(
    State(state): State<SharedState>,
    Json(payload): Json<CounterAdjustmentRequest>,
) -> Result<Json<DisplaySnapshot>, AppError> {
    payload.validate()?;
    Ok(execute(&state, payload.into_command(CounterKind::Score)).await)
}

#[utoipa::path(
    post,
    path = "/scoreboard/fouls",
    tag = "scoreboard",
    request_body = CounterAdjustmentRequest,
    responses((status = 200, description = "Fouls adjusted within 0..=5", body = DisplaySnapshot))
)]
pub async fn adjust_fouls(
    State(state): State<SharedState>,
    Json(payload): Json<CounterAdjustmentRequest>,
) -> Result<Json<DisplaySnapshot>, AppError> {
    payload.validate()?;
    Ok(execute(&state, payload.into_command(CounterKind::Foul)).await)
}

#[utoipa::path(
    post,
    path = "/scoreboard/timeouts",
    tag = "scoreboard",
    request_body = CounterAdjustmentRequest,
    responses((status = 200, description = "Timeouts adjusted within 0..=3", body = DisplaySnapshot))
)]
pub async fn adjust_timeouts(
    State(state): State<SharedState>,
    Json(payload): Json<CounterAdjustmentRequest>,
) -> Result<Json<DisplaySnapshot>, AppError> {
    payload.validate()?;
    Ok(execute(&state, payload.into_command(CounterKind::Timeout)).await)
}

async fn execute(state: &SharedState, command: Command) -> Json<DisplaySnapshot> {
    Json(scoreboard_service::execute(state, command).await)
}
