//! Weekly working hours handlers.

use axum::{
    extract::State,
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::barber_only;
use crate::api::AppState;
use crate::domain::{ReplaceWorkingHours, WorkingHour};
use crate::errors::AppResult;

#[derive(Debug, Serialize, ToSchema)]
pub struct WorkingHoursResponse {
    pub hours: Vec<WorkingHour>,
}

pub fn working_hours_routes(state: &AppState) -> Router<AppState> {
    Router::new().route(
        "/",
        get(list_working_hours).merge(barber_only(state, put(replace_working_hours))),
    )
}

/// Current week, ordered by day (0 = Sunday)
#[utoipa::path(
    get,
    path = "/working-hours",
    tag = "Working hours",
    responses((status = 200, description = "Saved schedule", body = WorkingHoursResponse))
)]
pub async fn list_working_hours(
    State(state): State<AppState>,
) -> AppResult<Json<WorkingHoursResponse>> {
    let hours = state.schedule_service.list().await?;
    Ok(Json(WorkingHoursResponse { hours }))
}

/// Replace the whole week; days left out are closed
#[utoipa::path(
    put,
    path = "/working-hours",
    tag = "Working hours",
    security(("bearer_auth" = [])),
    request_body = ReplaceWorkingHours,
    responses(
        (status = 200, description = "Saved schedule", body = WorkingHoursResponse),
        (status = 400, description = "Invalid range or duplicate day"),
        (status = 403, description = "Barber role required")
    )
)]
pub async fn replace_working_hours(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ReplaceWorkingHours>,
) -> AppResult<Json<WorkingHoursResponse>> {
    let hours = state.schedule_service.replace(payload).await?;
    Ok(Json(WorkingHoursResponse { hours }))
}
