//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::handlers::{
    analytics_handler, appointment_handler, auth_handler, availability_handler, service_handler,
    working_hours_handler,
};
use super::routes;
use crate::domain::analytics::{
    Deltas, Kpis, Meta, RevenuePoint, Series, TodayAppointment, ValuePoint, Window,
};
use crate::domain::{
    AnalyticsRange, AnalyticsSummary, Appointment, AppointmentStatus, Availability,
    CreateAppointment, CreateService, CustomerSummary, MyAppointment, OpenHours, RegisterUser,
    ReplaceWorkingHours, ScheduledAppointment, Service, ServiceSummary, SlotService,
    StatusUpdate, UpdateAppointmentStatus, UpdateService, UserResponse, UserRole, WorkingHour,
    WorkingHourInput,
};
use crate::services::TokenResponse;

/// OpenAPI documentation for the BarberBook API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "BarberBook API",
        version = "0.1.0",
        description = "Single-barber booking: services, weekly hours, slot availability, appointments and analytics"
    ),
    servers(
        (url = "http://localhost:4000", description = "Local development server")
    ),
    paths(
        routes::health,
        auth_handler::register,
        auth_handler::login,
        auth_handler::me,
        service_handler::list_services,
        service_handler::create_service,
        service_handler::update_service,
        working_hours_handler::list_working_hours,
        working_hours_handler::replace_working_hours,
        availability_handler::get_availability,
        appointment_handler::create_appointment,
        appointment_handler::list_my_appointments,
        appointment_handler::cancel_appointment,
        appointment_handler::list_appointments,
        appointment_handler::update_appointment_status,
        analytics_handler::get_summary,
    ),
    components(
        schemas(
            // Accounts
            UserRole,
            UserResponse,
            RegisterUser,
            auth_handler::LoginRequest,
            auth_handler::MeResponse,
            TokenResponse,
            // Catalog and schedule
            Service,
            ServiceSummary,
            CreateService,
            UpdateService,
            service_handler::ServiceListResponse,
            service_handler::ServiceResponse,
            WorkingHour,
            WorkingHourInput,
            ReplaceWorkingHours,
            working_hours_handler::WorkingHoursResponse,
            // Booking
            Availability,
            SlotService,
            OpenHours,
            Appointment,
            AppointmentStatus,
            CustomerSummary,
            MyAppointment,
            ScheduledAppointment,
            CreateAppointment,
            StatusUpdate,
            UpdateAppointmentStatus,
            appointment_handler::BookedResponse,
            appointment_handler::AppointmentResponse,
            appointment_handler::MyAppointmentsResponse,
            appointment_handler::ScheduleResponse,
            // Analytics
            AnalyticsRange,
            AnalyticsSummary,
            Kpis,
            Deltas,
            Series,
            RevenuePoint,
            ValuePoint,
            TodayAppointment,
            Meta,
            Window,
            routes::HealthResponse,
            routes::ServiceHealth,
            routes::ServiceStatus,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Dependency status"),
        (name = "Authentication", description = "Registration, login and current account"),
        (name = "Services", description = "Service catalog"),
        (name = "Working hours", description = "Weekly opening hours"),
        (name = "Availability", description = "Bookable start times"),
        (name = "Appointments", description = "Booking and appointment lifecycle"),
        (name = "Analytics", description = "Barber dashboard")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
