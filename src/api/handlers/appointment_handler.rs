//! Appointment handlers: customer booking and barber management.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, patch, post},
    Extension, Router,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{authenticated, barber_only, CurrentUser};
use crate::api::AppState;
use crate::domain::{
    Appointment, CreateAppointment, MyAppointment, ScheduledAppointment, UpdateAppointmentStatus,
};
use crate::errors::AppResult;

#[derive(Debug, Serialize, ToSchema)]
pub struct BookedResponse {
    pub appointment: MyAppointment,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AppointmentResponse {
    pub appointment: Appointment,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MyAppointmentsResponse {
    pub appointments: Vec<MyAppointment>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScheduleResponse {
    pub appointments: Vec<ScheduledAppointment>,
}

pub fn appointment_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            authenticated(state, post(create_appointment))
                .merge(barber_only(state, get(list_appointments))),
        )
        .route("/my", authenticated(state, get(list_my_appointments)))
        .route("/:id", authenticated(state, delete(cancel_appointment)))
        .route("/:id/status", barber_only(state, patch(update_appointment_status)))
}

/// Book a slot
#[utoipa::path(
    post,
    path = "/appointments",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    request_body = CreateAppointment,
    responses(
        (status = 201, description = "Appointment booked as PENDING", body = BookedResponse),
        (status = 400, description = "Closed day, outside working hours or invalid input"),
        (status = 404, description = "Service not found"),
        (status = 409, description = "Time slot is not available")
    )
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateAppointment>,
) -> AppResult<(StatusCode, Json<BookedResponse>)> {
    let appointment = state.booking_service.book(current.id, payload).await?;
    Ok((StatusCode::CREATED, Json(BookedResponse { appointment })))
}

/// The caller's appointments, oldest first
#[utoipa::path(
    get,
    path = "/appointments/my",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Own appointments", body = MyAppointmentsResponse))
)]
pub async fn list_my_appointments(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<MyAppointmentsResponse>> {
    let appointments = state.booking_service.list_mine(current.id).await?;
    Ok(Json(MyAppointmentsResponse { appointments }))
}

/// Cancel one of the caller's appointments
#[utoipa::path(
    delete,
    path = "/appointments/{id}",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment cancelled", body = AppointmentResponse),
        (status = 400, description = "Completed appointments cannot be cancelled"),
        (status = 403, description = "Not the caller's appointment"),
        (status = 404, description = "Appointment not found")
    )
)]
pub async fn cancel_appointment(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AppointmentResponse>> {
    let appointment = state.booking_service.cancel(current.id, id).await?;
    Ok(Json(AppointmentResponse { appointment }))
}

/// Every appointment with customer and service
#[utoipa::path(
    get,
    path = "/appointments",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All appointments, oldest first", body = ScheduleResponse),
        (status = 403, description = "Barber role required")
    )
)]
pub async fn list_appointments(State(state): State<AppState>) -> AppResult<Json<ScheduleResponse>> {
    let appointments = state.booking_service.list_all().await?;
    Ok(Json(ScheduleResponse { appointments }))
}

/// Confirm, complete or cancel an appointment
#[utoipa::path(
    patch,
    path = "/appointments/{id}/status",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Appointment id")),
    request_body = UpdateAppointmentStatus,
    responses(
        (status = 200, description = "Status updated", body = AppointmentResponse),
        (status = 400, description = "Transition not allowed"),
        (status = 404, description = "Appointment not found")
    )
)]
pub async fn update_appointment_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateAppointmentStatus>,
) -> AppResult<Json<AppointmentResponse>> {
    let appointment = state
        .booking_service
        .set_status(id, payload.status.into())
        .await?;
    Ok(Json(AppointmentResponse { appointment }))
}
