//! Application route configuration.

use axum::{
    extract::State, http::StatusCode, middleware, response::Json, routing::get, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    analytics_routes, appointment_routes, auth_routes, availability_routes, service_routes,
    working_hours_routes,
};
use super::middleware::{rate_limit_auth_middleware, rate_limit_middleware};
use super::openapi::ApiDoc;
use super::AppState;
use crate::errors::{AppError, AppResult};
use crate::infra::HealthCheck;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/services", service_routes(&state))
        .nest("/working-hours", working_hours_routes(&state))
        .nest("/availability", availability_routes())
        .nest("/appointments", appointment_routes(&state))
        .nest("/analytics", analytics_routes(&state))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        // Health check (no rate limiting)
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public authentication routes (stricter rate limiting)
        .nest(
            "/auth",
            auth_routes(&state).route_layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit_auth_middleware,
            )),
        )
        .merge(api)
        .fallback(not_found)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> AppResult<()> {
    Err(AppError::NotFound("Route"))
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    status: &'static str,
    services: ServiceHealth,
}

/// Individual service health status
#[derive(Serialize, ToSchema)]
pub struct ServiceHealth {
    database: ServiceStatus,
    redis: ServiceStatus,
}

#[derive(Serialize, ToSchema)]
pub struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServiceStatus {
    fn is_healthy(&self) -> bool {
        self.error.is_none()
    }
}

async fn probe(check: &Arc<dyn HealthCheck>) -> ServiceStatus {
    match check.ping().await {
        Ok(()) => ServiceStatus {
            status: "healthy",
            error: None,
        },
        Err(e) => {
            tracing::error!(service = check.name(), error = %e, "Health probe failed");
            ServiceStatus {
                status: "unhealthy",
                error: Some(e),
            }
        }
    }
}

/// Database and Redis connectivity
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "All dependencies reachable", body = HealthResponse),
        (status = 503, description = "At least one dependency is down", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (database, redis) = tokio::join!(probe(&state.database), probe(&state.cache));
    let all_healthy = database.is_healthy() && redis.is_healthy();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" },
        services: ServiceHealth { database, redis },
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
