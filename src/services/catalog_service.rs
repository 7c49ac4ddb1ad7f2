//! Service catalog - What the shop offers, for how long and at what price.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{CreateService, Service, UpdateService};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Active services, newest first
    async fn list_active(&self) -> AppResult<Vec<Service>>;

    async fn create(&self, input: CreateService) -> AppResult<Service>;

    /// Apply a partial update. An empty patch returns the current record.
    async fn update(&self, id: Uuid, changes: UpdateService) -> AppResult<Service>;
}

pub struct Catalog<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> Catalog<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for Catalog<U> {
    async fn list_active(&self) -> AppResult<Vec<Service>> {
        self.uow.services().list_active().await
    }

    async fn create(&self, input: CreateService) -> AppResult<Service> {
        let service = self.uow.services().create(input).await?;
        tracing::info!(service_id = %service.id, name = %service.name, "Service created");
        Ok(service)
    }

    async fn update(&self, id: Uuid, changes: UpdateService) -> AppResult<Service> {
        if changes.is_empty() {
            return self.uow.services().find_by_id(id).await?.ok_or_not_found("Service");
        }
        self.uow.services().update(id, changes).await
    }
}
