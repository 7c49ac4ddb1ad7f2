//! Service catalog handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch, post},
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::barber_only;
use crate::api::AppState;
use crate::domain::{CreateService, Service, UpdateService};
use crate::errors::AppResult;

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceListResponse {
    pub services: Vec<Service>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceResponse {
    pub service: Service,
}

pub fn service_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_services).merge(barber_only(state, post(create_service))))
        .route("/:id", barber_only(state, patch(update_service)))
}

/// Active services, newest first
#[utoipa::path(
    get,
    path = "/services",
    tag = "Services",
    responses((status = 200, description = "Active services", body = ServiceListResponse))
)]
pub async fn list_services(State(state): State<AppState>) -> AppResult<Json<ServiceListResponse>> {
    let services = state.catalog_service.list_active().await?;
    Ok(Json(ServiceListResponse { services }))
}

/// Add a service to the catalog
#[utoipa::path(
    post,
    path = "/services",
    tag = "Services",
    security(("bearer_auth" = [])),
    request_body = CreateService,
    responses(
        (status = 201, description = "Service created", body = ServiceResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Barber role required")
    )
)]
pub async fn create_service(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateService>,
) -> AppResult<(StatusCode, Json<ServiceResponse>)> {
    let service = state.catalog_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(ServiceResponse { service })))
}

/// Edit or retire a service
#[utoipa::path(
    patch,
    path = "/services/{id}",
    tag = "Services",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Service id")),
    request_body = UpdateService,
    responses(
        (status = 200, description = "Service updated", body = ServiceResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Service not found")
    )
)]
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateService>,
) -> AppResult<Json<ServiceResponse>> {
    let service = state.catalog_service.update(id, payload).await?;
    Ok(Json(ServiceResponse { service }))
}
