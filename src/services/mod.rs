//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use Unit of Work pattern for centralized repository
//! access and transaction management.

mod analytics_service;
mod auth_service;
mod booking_service;
mod catalog_service;
pub mod container;
mod schedule_service;

#[cfg(test)]
mod test_support;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use analytics_service::{Analytics, AnalyticsService};
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use booking_service::{Booking, BookingService};
pub use catalog_service::{Catalog, CatalogService};
pub use schedule_service::{Schedule, ScheduleService};

#[cfg(any(test, feature = "test-utils"))]
pub use analytics_service::MockAnalyticsService;
#[cfg(any(test, feature = "test-utils"))]
pub use auth_service::MockAuthService;
#[cfg(any(test, feature = "test-utils"))]
pub use booking_service::MockBookingService;
#[cfg(any(test, feature = "test-utils"))]
pub use catalog_service::MockCatalogService;
#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use schedule_service::MockScheduleService;
