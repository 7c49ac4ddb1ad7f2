//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database, HealthCheck, RateLimiter};
use crate::services::{
    AnalyticsService, AuthService, BookingService, CatalogService, ScheduleService,
    ServiceContainer, Services,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub catalog_service: Arc<dyn CatalogService>,
    pub schedule_service: Arc<dyn ScheduleService>,
    pub booking_service: Arc<dyn BookingService>,
    pub analytics_service: Arc<dyn AnalyticsService>,
    /// Request counters, Redis in production
    pub rate_limiter: Arc<dyn RateLimiter>,
    /// Probed by `/health`
    pub database: Arc<dyn HealthCheck>,
    pub cache: Arc<dyn HealthCheck>,
}

impl AppState {
    /// Build the production state on top of PostgreSQL and Redis.
    pub fn from_config(database: Arc<Database>, cache: Arc<Cache>, config: Config) -> Self {
        let services = Services::from_connection(database.get_connection(), config);
        Self::new(&services, cache.clone(), database, cache)
    }

    /// Create application state from any service container and backing stores.
    pub fn new(
        services: &dyn ServiceContainer,
        rate_limiter: Arc<dyn RateLimiter>,
        database: Arc<dyn HealthCheck>,
        cache: Arc<dyn HealthCheck>,
    ) -> Self {
        Self {
            auth_service: services.auth(),
            catalog_service: services.catalog(),
            schedule_service: services.schedule(),
            booking_service: services.booking(),
            analytics_service: services.analytics(),
            rate_limiter,
            database,
            cache,
        }
    }
}
