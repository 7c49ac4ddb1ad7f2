//! Shared fixtures for integration tests.
//!
//! `MemoryUnitOfWork` keeps every table in process memory. Transactions are
//! serialized behind one async lock and roll back by restoring a snapshot, so
//! concurrent bookings behave like they do under SERIALIZABLE isolation.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use barberbook::config::Config;
use barberbook::domain::{
    Appointment, AppointmentDetails, AppointmentInterval, AppointmentStatus, CreateService,
    CreateUser, CustomerSummary, NewAppointment, Password, Service, UpdateService, User,
    UserRole, WorkingHour, WorkingWindow,
};
use barberbook::errors::{AppError, AppResult};
use barberbook::infra::{
    AppointmentRepository, HealthCheck, RateLimitDecision, RateLimiter, ServiceRepository,
    TransactionContext, TxFuture, UnitOfWork, UserRepository, WorkingHourRepository,
};
use barberbook::services::Services;
use barberbook::AppState;

// =============================================================================
// Tables
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub users: Vec<User>,
    pub services: Vec<Service>,
    pub working_hours: Vec<WorkingHour>,
    pub appointments: Vec<Appointment>,
}

#[derive(Clone, Default)]
pub struct Shared(Arc<Mutex<Tables>>);

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn details(tables: &Tables, appointment: &Appointment) -> AppResult<AppointmentDetails> {
    let service = tables
        .services
        .iter()
        .find(|s| s.id == appointment.service_id)
        .ok_or_else(|| AppError::internal("dangling service"))?;
    let customer = tables
        .users
        .iter()
        .find(|u| u.id == appointment.user_id)
        .ok_or_else(|| AppError::internal("dangling customer"))?;

    Ok(AppointmentDetails {
        appointment: appointment.clone(),
        service: service.summary(),
        customer: CustomerSummary {
            id: customer.id,
            name: customer.name.clone(),
            email: customer.email.clone(),
        },
    })
}

fn sorted_details(
    tables: &Tables,
    keep: impl Fn(&Appointment) -> bool,
) -> AppResult<Vec<AppointmentDetails>> {
    let mut rows: Vec<&Appointment> = tables.appointments.iter().filter(|a| keep(a)).collect();
    rows.sort_by_key(|a| a.start_at);
    rows.into_iter().map(|a| details(tables, a)).collect()
}

// =============================================================================
// Repositories
// =============================================================================

pub struct MemoryUsers(Shared);

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.0.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.0.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: CreateUser) -> AppResult<User> {
        let mut tables = self.0.lock();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::conflict("Email already in use"));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            surname: user.surname,
            phone_number: user.phone_number,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn upsert(&self, user: CreateUser) -> AppResult<User> {
        let existing = {
            let mut tables = self.0.lock();
            tables.users.iter_mut().find(|u| u.email == user.email).map(|row| {
                row.name = user.name.clone();
                row.password_hash = user.password_hash.clone();
                row.role = user.role;
                row.updated_at = Utc::now();
                row.clone()
            })
        };
        match existing {
            Some(row) => Ok(row),
            None => self.create(user).await,
        }
    }
}

pub struct MemoryServices(Shared);

#[async_trait]
impl ServiceRepository for MemoryServices {
    async fn list_active(&self) -> AppResult<Vec<Service>> {
        let mut active: Vec<Service> = self
            .0
            .lock()
            .services
            .iter()
            .filter(|s| s.is_active)
            .cloned()
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(active)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Service>> {
        Ok(self.0.lock().services.iter().find(|s| s.id == id).cloned())
    }

    async fn create(&self, input: CreateService) -> AppResult<Service> {
        let now = Utc::now();
        let service = Service {
            id: Uuid::new_v4(),
            name: input.name,
            duration_min: input.duration_min,
            price: input.price,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.0.lock().services.push(service.clone());
        Ok(service)
    }

    async fn update(&self, id: Uuid, changes: UpdateService) -> AppResult<Service> {
        let mut tables = self.0.lock();
        let row = tables
            .services
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(AppError::NotFound("Service"))?;
        if let Some(name) = changes.name {
            row.name = name;
        }
        if let Some(duration_min) = changes.duration_min {
            row.duration_min = duration_min;
        }
        if let Some(price) = changes.price {
            row.price = Some(price);
        }
        if let Some(is_active) = changes.is_active {
            row.is_active = is_active;
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }
}

pub struct MemoryWorkingHours(Shared);

#[async_trait]
impl WorkingHourRepository for MemoryWorkingHours {
    async fn list(&self) -> AppResult<Vec<WorkingHour>> {
        let mut rows = self.0.lock().working_hours.clone();
        rows.sort_by_key(|h| h.day_of_week);
        Ok(rows)
    }

    async fn find_by_day(&self, day_of_week: u8) -> AppResult<Option<WorkingHour>> {
        Ok(self
            .0
            .lock()
            .working_hours
            .iter()
            .find(|h| h.day_of_week == i32::from(day_of_week))
            .cloned())
    }

    async fn replace_all(&self, week: Vec<WorkingWindow>) -> AppResult<Vec<WorkingHour>> {
        self.0.lock().working_hours = week
            .iter()
            .map(|w| WorkingHour {
                id: Uuid::new_v4(),
                day_of_week: i32::from(w.day_of_week()),
                start_min: i32::from(w.start_minute()),
                end_min: i32::from(w.end_minute()),
            })
            .collect();
        self.list().await
    }
}

pub struct MemoryAppointments(Shared);

#[async_trait]
impl AppointmentRepository for MemoryAppointments {
    async fn find_active_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<AppointmentInterval>> {
        Ok(self
            .0
            .lock()
            .appointments
            .iter()
            .filter(|a| a.status.is_active() && a.start_at >= start && a.start_at < end)
            .map(Appointment::interval)
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Appointment>> {
        Ok(self.0.lock().appointments.iter().find(|a| a.id == id).cloned())
    }

    async fn insert(&self, appointment: NewAppointment) -> AppResult<Appointment> {
        let now = Utc::now();
        let row = Appointment {
            id: Uuid::new_v4(),
            user_id: appointment.user_id,
            service_id: appointment.service_id,
            start_at: appointment.span.start,
            end_at: appointment.span.end,
            status: AppointmentStatus::Pending,
            note: appointment.note,
            price_snapshot: appointment.price_snapshot,
            created_at: now,
            updated_at: now,
        };
        self.0.lock().appointments.push(row.clone());
        Ok(row)
    }

    async fn update_status(&self, id: Uuid, status: AppointmentStatus) -> AppResult<Appointment> {
        let mut tables = self.0.lock();
        let row = tables
            .appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(AppError::NotFound("Appointment"))?;
        row.status = status;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<AppointmentDetails>> {
        sorted_details(&self.0.lock(), |a| a.user_id == user_id)
    }

    async fn list_all(&self) -> AppResult<Vec<AppointmentDetails>> {
        sorted_details(&self.0.lock(), |_| true)
    }

    async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<AppointmentDetails>> {
        sorted_details(&self.0.lock(), |a| a.start_at >= start && a.start_at < end)
    }
}

// =============================================================================
// Unit of work
// =============================================================================

#[derive(Default)]
pub struct MemoryUnitOfWork {
    tables: Shared,
    tx_lock: tokio::sync::Mutex<()>,
}

impl MemoryUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Tables {
        self.tables.lock().clone()
    }

    pub fn add_user(&self, role: UserRole, email: &str, password: &str) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: "Ali".into(),
            surname: "Demir".into(),
            phone_number: "05551112233".into(),
            email: email.into(),
            password_hash: Password::new(password)
                .expect("hashable password")
                .into(),
            role,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().users.push(user.clone());
        user
    }

    pub fn add_service(&self, name: &str, duration_min: i32, price: Option<i32>, is_active: bool) -> Service {
        let now = Utc::now();
        let service = Service {
            id: Uuid::new_v4(),
            name: name.into(),
            duration_min,
            price,
            is_active,
            created_at: now,
            updated_at: now,
        };
        self.tables.lock().services.push(service.clone());
        service
    }

    pub fn open(&self, day_of_week: i32, start_min: i32, end_min: i32) {
        self.tables.lock().working_hours.push(WorkingHour {
            id: Uuid::new_v4(),
            day_of_week,
            start_min,
            end_min,
        });
    }

    fn context(&self) -> TransactionContext<'static> {
        TransactionContext::new(
            Box::new(MemoryServices(self.tables.clone())),
            Box::new(MemoryWorkingHours(self.tables.clone())),
            Box::new(MemoryAppointments(self.tables.clone())),
        )
    }

    async fn run<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let _serialized = self.tx_lock.lock().await;
        let before = self.snapshot();

        let outcome = f(self.context()).await;
        if outcome.is_err() {
            *self.tables.lock() = before;
        }
        outcome
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(MemoryUsers(self.tables.clone()))
    }

    fn services(&self) -> Arc<dyn ServiceRepository> {
        Arc::new(MemoryServices(self.tables.clone()))
    }

    fn working_hours(&self) -> Arc<dyn WorkingHourRepository> {
        Arc::new(MemoryWorkingHours(self.tables.clone()))
    }

    fn appointments(&self) -> Arc<dyn AppointmentRepository> {
        Arc::new(MemoryAppointments(self.tables.clone()))
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.run(f).await
    }

    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.run(f).await
    }
}

// =============================================================================
// Infrastructure stubs
// =============================================================================

/// Rate limiter that admits everything, or fails like an unreachable Redis.
pub struct StubRateLimiter {
    pub reachable: bool,
}

#[async_trait]
impl RateLimiter for StubRateLimiter {
    async fn check(&self, _identifier: &str, _max: u64, _window: u64) -> AppResult<RateLimitDecision> {
        if self.reachable {
            Ok(RateLimitDecision {
                count: 1,
                allowed: true,
            })
        } else {
            Err(AppError::internal("redis unreachable"))
        }
    }
}

pub struct StubHealth {
    pub name: &'static str,
    pub up: bool,
}

#[async_trait]
impl HealthCheck for StubHealth {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn ping(&self) -> Result<(), String> {
        if self.up {
            Ok(())
        } else {
            Err("connection refused".into())
        }
    }
}

// =============================================================================
// Wiring
// =============================================================================

/// Development config pinned to UTC business time.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.business_utc_offset_minutes = 0;
    config
}

pub fn services(uow: Arc<MemoryUnitOfWork>) -> Services {
    Services::from_unit_of_work(uow, test_config())
}

pub struct StateBuilder {
    pub rate_limiter_reachable: bool,
    pub database_up: bool,
    pub redis_up: bool,
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self {
            rate_limiter_reachable: true,
            database_up: true,
            redis_up: true,
        }
    }
}

impl StateBuilder {
    pub fn build(self, uow: Arc<MemoryUnitOfWork>) -> AppState {
        AppState::new(
            &services(uow),
            Arc::new(StubRateLimiter {
                reachable: self.rate_limiter_reachable,
            }),
            Arc::new(StubHealth {
                name: "database",
                up: self.database_up,
            }),
            Arc::new(StubHealth {
                name: "redis",
                up: self.redis_up,
            }),
        )
    }
}
