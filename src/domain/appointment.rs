//! Appointment entity, status lifecycle and request/response shapes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::service::ServiceSummary;
use super::time::{ClockTime, TimeSpan};

/// Appointment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Done,
}

/// Rejected status transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusChangeError {
    #[error("Cannot cancel a completed appointment")]
    CompletedCannotBeCancelled,

    #[error("Cannot change status from {from} to {to}")]
    NotAllowed {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::Done,
    ];

    /// Statuses that occupy their time span and block new bookings
    pub const ACTIVE: [AppointmentStatus; 2] =
        [AppointmentStatus::Pending, AppointmentStatus::Confirmed];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::Cancelled => "CANCELLED",
            AppointmentStatus::Done => "DONE",
        }
    }

    /// PENDING and CONFIRMED block their span.
    pub fn is_active(&self) -> bool {
        matches!(self, AppointmentStatus::Pending | AppointmentStatus::Confirmed)
    }

    /// Counts toward planned revenue.
    pub fn is_planned(&self) -> bool {
        matches!(self, AppointmentStatus::Confirmed | AppointmentStatus::Done)
    }

    /// Validate a move to `next`. Re-requesting the current status is a no-op.
    pub fn transition_to(self, next: AppointmentStatus) -> Result<AppointmentStatus, StatusChangeError> {
        use AppointmentStatus::*;

        if self == next {
            return Ok(next);
        }
        match (self, next) {
            (Pending, Confirmed | Cancelled | Done) | (Confirmed, Cancelled | Done) => Ok(next),
            (Done, Cancelled) => Err(StatusChangeError::CompletedCannotBeCancelled),
            (from, to) => Err(StatusChangeError::NotAllowed { from, to }),
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown appointment status '{}'", s))
    }
}

/// Occupied span of an appointment as seen by the availability engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppointmentInterval {
    pub span: TimeSpan,
    pub status: AppointmentStatus,
}

impl AppointmentInterval {
    pub fn new(start_at: DateTime<Utc>, end_at: DateTime<Utc>, status: AppointmentStatus) -> Self {
        Self {
            span: TimeSpan::new(start_at, end_at),
            status,
        }
    }
}

/// Appointment domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Service price at booking time
    pub price_snapshot: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn interval(&self) -> AppointmentInterval {
        AppointmentInterval::new(self.start_at, self.end_at, self.status)
    }
}

/// Data needed to persist a validated booking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub span: TimeSpan,
    pub price_snapshot: Option<i32>,
    pub note: Option<String>,
}

/// Customer shown next to an appointment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CustomerSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Appointment joined with its service and customer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentDetails {
    pub appointment: Appointment,
    pub service: ServiceSummary,
    pub customer: CustomerSummary,
}

/// Customer's own appointment with its service
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MyAppointment {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub service: ServiceSummary,
}

impl From<AppointmentDetails> for MyAppointment {
    fn from(details: AppointmentDetails) -> Self {
        Self {
            appointment: details.appointment,
            service: details.service,
        }
    }
}

/// Appointment as listed to the barber
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ScheduledAppointment {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub user: CustomerSummary,
    pub service: ServiceSummary,
}

impl From<AppointmentDetails> for ScheduledAppointment {
    fn from(details: AppointmentDetails) -> Self {
        Self {
            appointment: details.appointment,
            user: details.customer,
            service: details.service,
        }
    }
}

/// Booking request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointment {
    pub service_id: Uuid,
    /// Business-local date
    #[schema(value_type = String, format = Date, example = "2024-06-03")]
    pub date: NaiveDate,
    /// Business-local start time
    #[schema(value_type = String, example = "09:30")]
    pub start_time: ClockTime,
    #[validate(length(max = 300, message = "Note must be at most 300 characters"))]
    pub note: Option<String>,
}

/// Status a barber may set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusUpdate {
    Confirmed,
    Cancelled,
    Done,
}

impl From<StatusUpdate> for AppointmentStatus {
    fn from(update: StatusUpdate) -> Self {
        match update {
            StatusUpdate::Confirmed => AppointmentStatus::Confirmed,
            StatusUpdate::Cancelled => AppointmentStatus::Cancelled,
            StatusUpdate::Done => AppointmentStatus::Done,
        }
    }
}

/// Status update request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateAppointmentStatus {
    pub status: StatusUpdate,
}
