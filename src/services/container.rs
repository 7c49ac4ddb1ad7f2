//! Service Container - Centralized service access.
//!
//! SOLID (SRP): Manages service lifecycle and access.
//! SOLID (DIP): Depends on service traits, not implementations.

use std::sync::Arc;

use super::{
    Analytics, AnalyticsService, AuthService, Authenticator, Booking, BookingService, Catalog,
    CatalogService, Schedule, ScheduleService,
};
use crate::config::Config;
use crate::infra::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn catalog(&self) -> Arc<dyn CatalogService>;

    fn schedule(&self) -> Arc<dyn ScheduleService>;

    fn booking(&self) -> Arc<dyn BookingService>;

    fn analytics(&self) -> Arc<dyn AnalyticsService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth: Arc<dyn AuthService>,
    catalog: Arc<dyn CatalogService>,
    schedule: Arc<dyn ScheduleService>,
    booking: Arc<dyn BookingService>,
    analytics: Arc<dyn AnalyticsService>,
}

impl Services {
    /// Wire every service onto one unit of work.
    pub fn from_unit_of_work<U: UnitOfWork>(uow: Arc<U>, config: Config) -> Self {
        let offset = config.business_offset();

        Self {
            auth: Arc::new(Authenticator::new(uow.clone(), config)),
            catalog: Arc::new(Catalog::new(uow.clone())),
            schedule: Arc::new(Schedule::new(uow.clone())),
            booking: Arc::new(Booking::new(uow.clone(), offset)),
            analytics: Arc::new(Analytics::new(uow, offset)),
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        Self::from_unit_of_work(Arc::new(Persistence::new(db)), config)
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog.clone()
    }

    fn schedule(&self) -> Arc<dyn ScheduleService> {
        self.schedule.clone()
    }

    fn booking(&self) -> Arc<dyn BookingService> {
        self.booking.clone()
    }

    fn analytics(&self) -> Arc<dyn AnalyticsService> {
        self.analytics.clone()
    }
}
