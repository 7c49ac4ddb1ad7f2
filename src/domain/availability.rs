//! Slot availability and booking conflict checks.
//!
//! Pure functions over snapshots: the caller loads the day's working window
//! and appointments, the engine decides which start times are free. Listing
//! and booking share [`overlaps`], so a slot that is listed is a slot that
//! can be booked against the same snapshot.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use super::appointment::AppointmentInterval;
use super::service::{Service, ServiceDuration};
use super::time::{ClockTime, LocalDay, TimeSpan};
use super::working_hours::WorkingWindow;
use crate::config::SLOT_STEP_MINUTES;

/// Why a requested start time cannot be booked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BookingRejection {
    #[error("Service not found")]
    ServiceNotFound,

    #[error("Barber is closed this day")]
    ClosedDay,

    #[error("Selected time is outside working hours")]
    OutsideWorkingHours,

    #[error("Time slot is not available")]
    SlotUnavailable,
}

impl BookingRejection {
    pub fn code(&self) -> &'static str {
        match self {
            BookingRejection::ServiceNotFound => "SERVICE_NOT_FOUND",
            BookingRejection::ClosedDay => "CLOSED_DAY",
            BookingRejection::OutsideWorkingHours => "OUTSIDE_WORKING_HOURS",
            BookingRejection::SlotUnavailable => "SLOT_UNAVAILABLE",
        }
    }
}

/// Service fields echoed back with a slot listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotService {
    pub id: Uuid,
    pub name: String,
    pub duration_min: i32,
}

impl From<&Service> for SlotService {
    fn from(service: &Service) -> Self {
        Self {
            id: service.id,
            name: service.name.clone(),
            duration_min: service.duration_min,
        }
    }
}

/// Opening hours of the requested day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenHours {
    pub day_of_week: u8,
    pub start_min: u16,
    pub end_min: u16,
}

impl From<&WorkingWindow> for OpenHours {
    fn from(window: &WorkingWindow) -> Self {
        Self {
            day_of_week: window.day_of_week(),
            start_min: window.start_minute(),
            end_min: window.end_minute(),
        }
    }
}

/// Free start times for one service on one day.
///
/// `working_hours` is omitted and `slots` empty when the shop is closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    #[schema(value_type = String, format = Date, example = "2024-06-03")]
    pub date: NaiveDate,
    pub service: SlotService,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_hours: Option<OpenHours>,
    #[schema(example = 15)]
    pub slot_step_min: u16,
    #[schema(value_type = Vec<String>, example = json!(["09:00", "09:15"]))]
    pub slots: Vec<ClockTime>,
}

/// Half-open overlap: `[a0, a1)` and `[b0, b1)` intersect iff `a0 < b1 && b0 < a1`.
pub fn overlaps(a: &TimeSpan, b: &TimeSpan) -> bool {
    a.start < b.end && b.start < a.end
}

fn conflicts(candidate: &TimeSpan, booked: &[AppointmentInterval]) -> bool {
    booked
        .iter()
        .filter(|appt| appt.status.is_active())
        .any(|appt| overlaps(candidate, &appt.span))
}

/// Free start times on `day`, ascending, stepped by [`SLOT_STEP_MINUTES`].
///
/// A missing window means the shop is closed and yields no slots.
/// Non-active appointments in `booked` are ignored.
pub fn enumerate_slots(
    day: &LocalDay,
    duration: ServiceDuration,
    window: Option<&WorkingWindow>,
    booked: &[AppointmentInterval],
) -> Vec<ClockTime> {
    let Some(window) = window else {
        return Vec::new();
    };

    let length = duration.minutes();
    let last_start = match window.end_minute().checked_sub(length) {
        Some(last) if last >= window.start_minute() => last,
        _ => return Vec::new(),
    };

    (window.start_minute()..=last_start)
        .step_by(usize::from(SLOT_STEP_MINUTES))
        .filter(|start| {
            let candidate = TimeSpan::new(day.at(*start), day.at(start + length));
            !conflicts(&candidate, booked)
        })
        .filter_map(ClockTime::from_minutes)
        .collect()
}

/// Check that `start` on `day` can be booked for `duration`.
///
/// Returns the absolute span to persist. Checks run in order: closed day,
/// working-hour bounds, then overlap with active appointments.
pub fn validate_slot(
    day: &LocalDay,
    start: ClockTime,
    duration: ServiceDuration,
    window: Option<&WorkingWindow>,
    booked: &[AppointmentInterval],
) -> Result<TimeSpan, BookingRejection> {
    let window = window.ok_or(BookingRejection::ClosedDay)?;

    let start_minute = start.minutes();
    let end_minute = start_minute
        .checked_add(duration.minutes())
        .filter(|end| start_minute >= window.start_minute() && *end <= window.end_minute())
        .ok_or(BookingRejection::OutsideWorkingHours)?;

    let candidate = TimeSpan::new(day.at(start_minute), day.at(end_minute));
    if conflicts(&candidate, booked) {
        tracing::debug!(start = %start, "slot overlaps an active appointment");
        return Err(BookingRejection::SlotUnavailable);
    }

    Ok(candidate)
}
