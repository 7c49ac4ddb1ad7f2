//! BarberBook - Booking backend for a single barber shop
//!
//! Customers pick a service, see free start times on a date and book one;
//! the barber manages the catalog, weekly hours and appointment statuses and
//! watches revenue on a dashboard.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Business entities, availability engine, status lifecycle, analytics
//! - **services**: Application use cases
//! - **infra**: PostgreSQL, Redis, unit of work
//! - **api**: HTTP handlers, middleware, and routes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Create the barber account
//! cargo run -- seed --email barber@demo.com --password 123456
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{BookingRejection, Password, User, UserRole};
pub use errors::{AppError, AppResult};
