//! Health checks.

use aide::axum::ApiRouter;
use aide::axum::routing::get_with;
use aide::transform::TransformOperation;
use axum::Json;
use axum::extract::State;
use floww_core::{ServiceHealth, ServiceStatus};
use serde::Serialize;

use crate::service::ServiceState;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub database: ServiceHealth,
    pub delivery: ServiceHealth,
}

async fn get_health(State(state): State<ServiceState>) -> Json<HealthResponse> {
    let database = match state.pg_client().get_connection().await {
        Ok(_) => {
            let pool = state.pg_client().pool_status();
            if pool.is_under_pressure() {
                ServiceHealth::degraded("connection pool under pressure")
            } else {
                ServiceHealth::healthy()
            }
        }
        Err(error) => ServiceHealth::unhealthy(error.to_string()),
    };

    let delivery = state.delivery().health_check().await.unwrap_or_else(|error| ServiceHealth::unhealthy(error.to_string()));

    let status = if matches!(database.status, ServiceStatus::Unhealthy) || matches!(delivery.status, ServiceStatus::Unhealthy) {
        ServiceStatus::Unhealthy
    } else if matches!(database.status, ServiceStatus::Degraded) || matches!(delivery.status, ServiceStatus::Degraded) {
        ServiceStatus::Degraded
    } else {
        ServiceStatus::Healthy
    };

    Json(HealthResponse { status, database, delivery })
}

fn get_health_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Health check").description("Reports database and outbound delivery health.")
}

pub fn routes() -> ApiRouter<ServiceState> {
    ApiRouter::new().api_route("/health", get_with(get_health, get_health_docs)).with_path_items(|item| item.tag("Monitors"))
}
