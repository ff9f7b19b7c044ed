//! Health check endpoint.

use actix_web::{HttpResponse, web};

use technex_shared::dto::HealthResponse;

use crate::state::AppState;

/// Health check endpoint - always 200, reports a degraded store.
///
/// GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let database_up = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check: database unreachable");
            false
        }
    };

    HttpResponse::Ok().json(HealthResponse {
        status: if database_up { "ok" } else { "degraded" }.to_string(),
        message: "TechNex Backend is running".to_string(),
        timestamp: chrono::Utc::now(),
        environment: state.config.environment.clone(),
        database: if database_up { "up" } else { "down" }.to_string(),
    })
}
