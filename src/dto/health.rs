use serde::Serialize;
use utoipa::ToSchema;

/// Overall service state reported by `/healthcheck`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Ok,
    /// The last push to the physical display failed. Clocks keep running.
    Degraded,
}

/// Body of the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    /// Whether a physical display endpoint is configured at all.
    pub display_sync: bool,
}

impl HealthResponse {
    pub fn new(degraded: bool, display_sync: bool) -> Self {
        let status = if degraded {
            HealthStatus::Degraded
        } else {
            HealthStatus::Ok
        };
        Self {
            status,
            display_sync,
        }
    }
}
