//! Domain layer - Core business entities and logic
//!
//! Booking rules live here as plain functions over snapshots: the
//! availability engine, the appointment status lifecycle, weekly schedule
//! validation and dashboard analytics. Nothing in this module touches the
//! database or reads the clock.

pub mod analytics;
pub mod appointment;
pub mod availability;
pub mod password;
pub mod service;
pub mod time;
pub mod user;
pub mod working_hours;

pub use analytics::{AnalyticsRange, AnalyticsSummary};
pub use appointment::{
    Appointment, AppointmentDetails, AppointmentInterval, AppointmentStatus, CreateAppointment,
    CustomerSummary, MyAppointment, NewAppointment, ScheduledAppointment, StatusChangeError,
    StatusUpdate, UpdateAppointmentStatus,
};
pub use availability::{
    enumerate_slots, overlaps, validate_slot, Availability, BookingRejection, OpenHours,
    SlotService,
};
pub use password::Password;
pub use service::{CreateService, Service, ServiceDuration, ServiceSummary, UpdateService};
pub use time::{ClockTime, LocalDay, TimeSpan};
pub use user::{CreateUser, RegisterUser, User, UserResponse, UserRole};
pub use working_hours::{
    build_week, ReplaceWorkingHours, ScheduleError, WorkingHour, WorkingHourInput, WorkingWindow,
};
