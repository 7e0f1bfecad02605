use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::domain::Scenario;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub scenario: String,
    pub endpoints: usize,
}

pub struct HealthHandler {
    scenario: Scenario,
    endpoint_count: usize,
    start_time: std::time::Instant,
}

impl HealthHandler {
    pub fn new(scenario: Scenario, endpoint_count: usize) -> Self {
        Self {
            scenario,
            endpoint_count,
            start_time: std::time::Instant::now(),
        }
    }

    /// Basic health check - returns 200 if server is running
    pub async fn health(&self) -> impl IntoResponse {
        let status = HealthStatus {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            scenario: self.scenario.to_string(),
            endpoints: self.endpoint_count,
        };
        (StatusCode::OK, Json(status))
    }

    /// Readiness check - 200 once the contract has routable endpoints
    pub async fn ready(&self) -> impl IntoResponse {
        if self.endpoint_count > 0 {
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "status": "ready",
                    "message": "Server is ready to accept requests"
                })),
            )
        } else {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "not_ready",
                    "message": "Contract declares no endpoints"
                })),
            )
        }
    }

    /// Liveness check - returns 200 if server is alive
    pub async fn live(&self) -> impl IntoResponse {
        (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "alive",
                "message": "Server is alive"
            })),
        )
    }
}
