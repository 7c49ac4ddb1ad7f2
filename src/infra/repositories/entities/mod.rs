//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod appointment;
pub mod service;
pub mod user;
pub mod working_hour;

pub use appointment::Entity as AppointmentEntity;
pub use service::Entity as ServiceEntity;
pub use user::Entity as UserEntity;
pub use working_hour::Entity as WorkingHourEntity;
