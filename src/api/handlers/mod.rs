//! HTTP request handlers.

pub mod analytics_handler;
pub mod appointment_handler;
pub mod auth_handler;
pub mod availability_handler;
pub mod service_handler;
pub mod working_hours_handler;

pub use analytics_handler::analytics_routes;
pub use appointment_handler::appointment_routes;
pub use auth_handler::auth_routes;
pub use availability_handler::availability_routes;
pub use service_handler::service_routes;
pub use working_hours_handler::working_hours_routes;
