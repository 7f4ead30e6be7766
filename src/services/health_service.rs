use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report `degraded` while the last display push failed.
pub fn health_status(state: &SharedState) -> HealthResponse {
    let degraded = state.is_degraded();
    if degraded {
        warn!("display sync failing (degraded mode)");
    }
    HealthResponse::new(degraded, state.config().display_sync().is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, dto::health::HealthStatus, state::AppState};

    #[tokio::test]
    async fn follows_degraded_flag() {
        let state = AppState::new(AppConfig::default());
        let health = health_status(&state);
        assert_eq!(health.status, HealthStatus::Ok);
        assert!(!health.display_sync);

        state.update_degraded(true);
        assert_eq!(health_status(&state).status, HealthStatus::Degraded);
    }
}
