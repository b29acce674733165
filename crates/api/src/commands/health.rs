//! Health check command

use crate::context::AppContext;
use crate::utils::health::HealthStatus;

/// Get application health: per-component checks plus an aggregate score.
pub async fn get_app_health(context: &AppContext) -> HealthStatus {
    context.health_check().await
}
