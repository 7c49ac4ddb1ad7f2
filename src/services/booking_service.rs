//! Booking service - Slot listing, reservation and the appointment lifecycle.
//!
//! Listing and reserving both run the domain availability engine over a
//! snapshot of the day. Reservation takes that snapshot, validates and
//! inserts inside one serializable transaction, so two customers racing for
//! the same start time cannot both win.

use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDate};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::SLOT_STEP_MINUTES;
use crate::domain::{
    enumerate_slots, validate_slot, Appointment, AppointmentStatus, Availability,
    BookingRejection, CreateAppointment, LocalDay, MyAppointment, NewAppointment, OpenHours,
    ScheduledAppointment, Service, ServiceDuration,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{is_write_conflict, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BookingService: Send + Sync {
    /// Free start times for `service_id` on the business-local `date`
    async fn availability(&self, date: NaiveDate, service_id: Uuid) -> AppResult<Availability>;

    /// Reserve a slot for `user_id`; the appointment starts out PENDING
    async fn book(&self, user_id: Uuid, request: CreateAppointment) -> AppResult<MyAppointment>;

    async fn list_mine(&self, user_id: Uuid) -> AppResult<Vec<MyAppointment>>;

    async fn list_all(&self) -> AppResult<Vec<ScheduledAppointment>>;

    /// Customer cancellation of their own appointment
    async fn cancel(&self, user_id: Uuid, appointment_id: Uuid) -> AppResult<Appointment>;

    /// Barber-side status change, subject to the status lifecycle
    async fn set_status(&self, appointment_id: Uuid, status: AppointmentStatus) -> AppResult<Appointment>;
}

/// Unknown and retired services both read as "not found" to customers.
fn bookable(service: Option<Service>) -> AppResult<(Service, ServiceDuration)> {
    let service = service
        .filter(|s| s.is_active)
        .ok_or(AppError::Booking(BookingRejection::ServiceNotFound))?;

    match service.duration() {
        Some(duration) => Ok((service, duration)),
        None => Err(AppError::internal(format!(
            "Service {} has invalid duration {}",
            service.id, service.duration_min
        ))),
    }
}

pub struct Booking<U: UnitOfWork> {
    uow: Arc<U>,
    offset: FixedOffset,
}

impl<U: UnitOfWork> Booking<U> {
    /// `offset` places business-local dates and times on the UTC timeline.
    pub fn new(uow: Arc<U>, offset: FixedOffset) -> Self {
        Self { uow, offset }
    }

    async fn change_status(&self, appointment: Appointment, next: AppointmentStatus) -> AppResult<Appointment> {
        let target = appointment.status.transition_to(next)?;
        if target == appointment.status {
            return Ok(appointment);
        }

        let updated = self.uow.appointments().update_status(appointment.id, target).await?;
        tracing::info!(
            appointment_id = %updated.id,
            from = %appointment.status,
            to = %updated.status,
            "Appointment status changed"
        );
        Ok(updated)
    }
}

#[async_trait]
impl<U: UnitOfWork> BookingService for Booking<U> {
    async fn availability(&self, date: NaiveDate, service_id: Uuid) -> AppResult<Availability> {
        let (service, duration) = bookable(self.uow.services().find_by_id(service_id).await?)?;
        let day = LocalDay::new(date, self.offset);

        let window = self
            .uow
            .working_hours()
            .find_by_day(day.weekday())
            .await?
            .and_then(|hours| hours.window());

        let (working_hours, slots) = match window {
            Some(window) => {
                let bounds = day.bounds();
                let booked = self
                    .uow
                    .appointments()
                    .find_active_between(bounds.start, bounds.end)
                    .await?;
                let slots = enumerate_slots(&day, duration, Some(&window), &booked);
                (Some(OpenHours::from(&window)), slots)
            }
            None => (None, Vec::new()),
        };

        Ok(Availability {
            date,
            service: (&service).into(),
            working_hours,
            slot_step_min: SLOT_STEP_MINUTES,
            slots,
        })
    }

    async fn book(&self, user_id: Uuid, request: CreateAppointment) -> AppResult<MyAppointment> {
        let day = LocalDay::new(request.date, self.offset);
        let start = request.start_time;
        let note = request.note;
        let service_id = request.service_id;

        let reserved = self
            .uow
            .transaction_serializable(move |ctx| {
                Box::pin(async move {
                    let (service, duration) = bookable(ctx.services().find_by_id(service_id).await?)?;

                    let window = ctx
                        .working_hours()
                        .find_by_day(day.weekday())
                        .await?
                        .and_then(|hours| hours.window());

                    let bounds = day.bounds();
                    let booked = ctx
                        .appointments()
                        .find_active_between(bounds.start, bounds.end)
                        .await?;

                    let span = validate_slot(&day, start, duration, window.as_ref(), &booked)?;

                    let appointment = ctx
                        .appointments()
                        .insert(NewAppointment {
                            user_id,
                            service_id: service.id,
                            span,
                            price_snapshot: service.price,
                            note,
                        })
                        .await?;

                    Ok(MyAppointment {
                        appointment,
                        service: service.summary(),
                    })
                })
            })
            .await
            .map_err(|e| match e {
                AppError::Database(ref db) if is_write_conflict(db) => {
                    tracing::warn!(date = %day.date(), start = %start, "Concurrent booking lost the slot");
                    AppError::Booking(BookingRejection::SlotUnavailable)
                }
                other => other,
            })?;

        tracing::info!(
            appointment_id = %reserved.appointment.id,
            user_id = %user_id,
            date = %day.date(),
            start = %start,
            "Appointment booked"
        );
        Ok(reserved)
    }

    async fn list_mine(&self, user_id: Uuid) -> AppResult<Vec<MyAppointment>> {
        let details = self.uow.appointments().list_for_user(user_id).await?;
        Ok(details.into_iter().map(MyAppointment::from).collect())
    }

    async fn list_all(&self) -> AppResult<Vec<ScheduledAppointment>> {
        let details = self.uow.appointments().list_all().await?;
        Ok(details.into_iter().map(ScheduledAppointment::from).collect())
    }

    async fn cancel(&self, user_id: Uuid, appointment_id: Uuid) -> AppResult<Appointment> {
        let appointment = self
            .uow
            .appointments()
            .find_by_id(appointment_id)
            .await?
            .ok_or_not_found("Appointment")?;

        if appointment.user_id != user_id {
            return Err(AppError::Forbidden);
        }

        self.change_status(appointment, AppointmentStatus::Cancelled).await
    }

    async fn set_status(&self, appointment_id: Uuid, status: AppointmentStatus) -> AppResult<Appointment> {
        let appointment = self
            .uow
            .appointments()
            .find_by_id(appointment_id)
            .await?
            .ok_or_not_found("Appointment")?;

        self.change_status(appointment, status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AppointmentInterval, WorkingHour};
    use crate::infra::{MockAppointmentRepository, MockServiceRepository, MockWorkingHourRepository};
    use crate::services::test_support::MockedUnitOfWork;
    use chrono::{Duration, TimeZone, Utc};

    fn service(id: Uuid, active: bool) -> Service {
        let now = Utc::now();
        Service {
            id,
            name: "Haircut".into(),
            duration_min: 30,
            price: Some(250),
            is_active: active,
            created_at: now,
            updated_at: now,
        }
    }

    fn appointment(owner: Uuid, status: AppointmentStatus) -> Appointment {
        let start = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();
        Appointment {
            id: Uuid::new_v4(),
            user_id: owner,
            service_id: Uuid::new_v4(),
            start_at: start,
            end_at: start + Duration::minutes(30),
            status,
            note: None,
            price_snapshot: Some(250),
            created_at: start,
            updated_at: start,
        }
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    fn services_returning(found: Option<Service>) -> MockServiceRepository {
        let mut repo = MockServiceRepository::new();
        repo.expect_find_by_id().returning(move |_| Ok(found.clone()));
        repo
    }

    #[tokio::test]
    async fn test_availability_for_inactive_service_is_not_found() {
        let id = Uuid::new_v4();
        let uow = MockedUnitOfWork::new().with_services(services_returning(Some(service(id, false))));
        let booking = Booking::new(Arc::new(uow), utc());

        let result = booking.availability(monday(), id).await;
        assert!(matches!(
            result,
            Err(AppError::Booking(BookingRejection::ServiceNotFound))
        ));
    }

    #[tokio::test]
    async fn test_closed_day_skips_appointment_lookup() {
        let id = Uuid::new_v4();
        let mut hours = MockWorkingHourRepository::new();
        hours.expect_find_by_day().returning(|_| Ok(None));
        let mut appointments = MockAppointmentRepository::new();
        appointments.expect_find_active_between().never();

        let uow = MockedUnitOfWork::new()
            .with_services(services_returning(Some(service(id, true))))
            .with_working_hours(hours)
            .with_appointments(appointments);
        let booking = Booking::new(Arc::new(uow), utc());

        let availability = booking.availability(monday(), id).await.unwrap();
        assert!(availability.working_hours.is_none());
        assert!(availability.slots.is_empty());
        assert_eq!(availability.service.duration_min, 30);
    }

    #[tokio::test]
    async fn test_availability_excludes_booked_slot() {
        let id = Uuid::new_v4();
        let mut hours = MockWorkingHourRepository::new();
        hours
            .expect_find_by_day()
            .withf(|day| *day == 1)
            .returning(|day| {
                Ok(Some(WorkingHour {
                    id: Uuid::new_v4(),
                    day_of_week: i32::from(day),
                    start_min: 540,
                    end_min: 1080,
                }))
            });
        let mut appointments = MockAppointmentRepository::new();
        appointments.expect_find_active_between().returning(|start, _| {
            let booked_at = start + Duration::minutes(600);
            Ok(vec![AppointmentInterval::new(
                booked_at,
                booked_at + Duration::minutes(30),
                AppointmentStatus::Pending,
            )])
        });

        let uow = MockedUnitOfWork::new()
            .with_services(services_returning(Some(service(id, true))))
            .with_working_hours(hours)
            .with_appointments(appointments);
        let booking = Booking::new(Arc::new(uow), utc());

        let availability = booking.availability(monday(), id).await.unwrap();
        let slots: Vec<String> = availability.slots.iter().map(ToString::to_string).collect();
        assert_eq!(slots.first().map(String::as_str), Some("09:00"));
        assert_eq!(slots.last().map(String::as_str), Some("17:30"));
        assert!(!slots.contains(&"10:00".to_string()));
        assert!(slots.contains(&"10:30".to_string()));
        assert_eq!(
            availability.working_hours,
            Some(OpenHours {
                day_of_week: 1,
                start_min: 540,
                end_min: 1080
            })
        );
    }

    #[tokio::test]
    async fn test_cancel_by_another_customer_is_forbidden() {
        let owner = Uuid::new_v4();
        let existing = appointment(owner, AppointmentStatus::Pending);
        let id = existing.id;

        let mut appointments = MockAppointmentRepository::new();
        appointments
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        appointments.expect_update_status().never();

        let booking = Booking::new(
            Arc::new(MockedUnitOfWork::new().with_appointments(appointments)),
            utc(),
        );
        assert!(matches!(
            booking.cancel(Uuid::new_v4(), id).await,
            Err(AppError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_cancel_completed_appointment_is_rejected() {
        let owner = Uuid::new_v4();
        let existing = appointment(owner, AppointmentStatus::Done);
        let id = existing.id;

        let mut appointments = MockAppointmentRepository::new();
        appointments
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        appointments.expect_update_status().never();

        let booking = Booking::new(
            Arc::new(MockedUnitOfWork::new().with_appointments(appointments)),
            utc(),
        );
        match booking.cancel(owner, id).await {
            Err(AppError::Validation(msg)) => {
                assert_eq!(msg, "Cannot cancel a completed appointment")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_repeated_status_is_not_written() {
        let existing = appointment(Uuid::new_v4(), AppointmentStatus::Confirmed);
        let id = existing.id;

        let mut appointments = MockAppointmentRepository::new();
        appointments
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        appointments.expect_update_status().never();

        let booking = Booking::new(
            Arc::new(MockedUnitOfWork::new().with_appointments(appointments)),
            utc(),
        );
        let unchanged = booking.set_status(id, AppointmentStatus::Confirmed).await.unwrap();
        assert_eq!(unchanged.status, AppointmentStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_unknown_appointment_is_not_found() {
        let mut appointments = MockAppointmentRepository::new();
        appointments.expect_find_by_id().returning(|_| Ok(None));

        let booking = Booking::new(
            Arc::new(MockedUnitOfWork::new().with_appointments(appointments)),
            utc(),
        );
        assert!(matches!(
            booking.set_status(Uuid::new_v4(), AppointmentStatus::Done).await,
            Err(AppError::NotFound("Appointment"))
        ));
    }
}
