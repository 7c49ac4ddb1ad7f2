//! Slot availability handler.

use axum::{extract::State, response::Json, routing::get, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedQuery;
use crate::api::AppState;
use crate::domain::Availability;
use crate::errors::AppResult;

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQuery {
    /// Business-local date, YYYY-MM-DD
    #[param(value_type = String, format = Date, example = "2024-06-03")]
    pub date: NaiveDate,
    pub service_id: Uuid,
}

pub fn availability_routes() -> Router<AppState> {
    Router::new().route("/", get(get_availability))
}

/// Free start times for a service on a date
#[utoipa::path(
    get,
    path = "/availability",
    tag = "Availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Slots in 15 minute steps", body = Availability),
        (status = 400, description = "Malformed date or service id"),
        (status = 404, description = "Service not found")
    )
)]
pub async fn get_availability(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<AvailabilityQuery>,
) -> AppResult<Json<Availability>> {
    let availability = state
        .booking_service
        .availability(query.date, query.service_id)
        .await?;
    Ok(Json(availability))
}
