//! Infrastructure layer - External systems integration
//!
//! - PostgreSQL via SeaORM: connection, migrations, repositories
//! - Redis: rate limiting
//! - Unit of Work for transaction management

pub mod cache;
pub mod db;
pub mod health;
pub mod repositories;
pub mod unit_of_work;

pub use cache::{Cache, RateLimitDecision, RateLimiter};
pub use db::{is_write_conflict, Database, Migrator};
pub use health::HealthCheck;
pub use repositories::{
    AppointmentRepository, AppointmentStore, ServiceRepository, ServiceStore, UserRepository,
    UserStore, WorkingHourRepository, WorkingHourStore,
};
pub use unit_of_work::{Persistence, TransactionContext, TxFuture, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use cache::MockRateLimiter;
#[cfg(any(test, feature = "test-utils"))]
pub use health::MockHealthCheck;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockAppointmentRepository, MockServiceRepository, MockUserRepository,
    MockWorkingHourRepository,
};
