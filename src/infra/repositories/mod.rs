//! Repository layer - Data access abstraction
//!
//! One trait per aggregate. `*Store` types run on the shared connection,
//! `Tx*Repository` types run inside a transaction opened by the unit of work.

mod appointment_repository;
pub(crate) mod entities;
mod service_repository;
mod user_repository;
mod working_hour_repository;

pub use appointment_repository::{AppointmentRepository, AppointmentStore, TxAppointmentRepository};
pub use service_repository::{ServiceRepository, ServiceStore, TxServiceRepository};
pub use user_repository::{UserRepository, UserStore};
pub use working_hour_repository::{TxWorkingHourRepository, WorkingHourRepository, WorkingHourStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use appointment_repository::MockAppointmentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use service_repository::MockServiceRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use working_hour_repository::MockWorkingHourRepository;
