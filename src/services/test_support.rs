//! Unit of work over mockall repositories for service unit tests.
//!
//! Transactions are not supported here; transactional flows are covered by
//! the in-memory unit of work in `tests/common`.

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::{AppError, AppResult};
use crate::infra::{
    AppointmentRepository, MockAppointmentRepository, MockServiceRepository, MockUserRepository,
    MockWorkingHourRepository, ServiceRepository, TransactionContext, TxFuture, UnitOfWork,
    UserRepository, WorkingHourRepository,
};

pub(crate) struct MockedUnitOfWork {
    users: Arc<MockUserRepository>,
    services: Arc<MockServiceRepository>,
    working_hours: Arc<MockWorkingHourRepository>,
    appointments: Arc<MockAppointmentRepository>,
}

impl MockedUnitOfWork {
    pub(crate) fn new() -> Self {
        Self {
            users: Arc::new(MockUserRepository::new()),
            services: Arc::new(MockServiceRepository::new()),
            working_hours: Arc::new(MockWorkingHourRepository::new()),
            appointments: Arc::new(MockAppointmentRepository::new()),
        }
    }

    pub(crate) fn with_users(mut self, users: MockUserRepository) -> Self {
        self.users = Arc::new(users);
        self
    }

    pub(crate) fn with_services(mut self, services: MockServiceRepository) -> Self {
        self.services = Arc::new(services);
        self
    }

    pub(crate) fn with_working_hours(mut self, working_hours: MockWorkingHourRepository) -> Self {
        self.working_hours = Arc::new(working_hours);
        self
    }

    pub(crate) fn with_appointments(mut self, appointments: MockAppointmentRepository) -> Self {
        self.appointments = Arc::new(appointments);
        self
    }
}

#[async_trait]
impl UnitOfWork for MockedUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn services(&self) -> Arc<dyn ServiceRepository> {
        self.services.clone()
    }

    fn working_hours(&self) -> Arc<dyn WorkingHourRepository> {
        self.working_hours.clone()
    }

    fn appointments(&self) -> Arc<dyn AppointmentRepository> {
        self.appointments.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        Err(AppError::internal("transactions are not mocked"))
    }

    async fn transaction_serializable<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        Err(AppError::internal("transactions are not mocked"))
    }
}
