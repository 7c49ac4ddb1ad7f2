//! Service catalog repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::service::{self, ActiveModel, Entity as ServiceEntity};
use crate::domain::{CreateService, Service, UpdateService};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// Active services, newest first
    async fn list_active(&self) -> AppResult<Vec<Service>>;

    /// Find service by ID, active or not
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Service>>;

    async fn create(&self, input: CreateService) -> AppResult<Service>;

    /// Apply the fields present in `changes`
    async fn update(&self, id: Uuid, changes: UpdateService) -> AppResult<Service>;
}

async fn list_active<C: ConnectionTrait>(conn: &C) -> AppResult<Vec<Service>> {
    let models = ServiceEntity::find()
        .filter(service::Column::IsActive.eq(true))
        .order_by_desc(service::Column::CreatedAt)
        .all(conn)
        .await?;

    Ok(models.into_iter().map(Service::from).collect())
}

async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<Service>> {
    let result = ServiceEntity::find_by_id(id).one(conn).await?;
    Ok(result.map(Service::from))
}

async fn create<C: ConnectionTrait>(conn: &C, input: CreateService) -> AppResult<Service> {
    let now = chrono::Utc::now();
    let active_model = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        duration_min: Set(input.duration_min),
        price: Set(input.price),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = active_model.insert(conn).await.map_err(AppError::from)?;
    Ok(Service::from(model))
}

async fn update<C: ConnectionTrait>(conn: &C, id: Uuid, changes: UpdateService) -> AppResult<Service> {
    let existing = ServiceEntity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_not_found("Service")?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = changes.name {
        active.name = Set(name);
    }
    if let Some(duration_min) = changes.duration_min {
        active.duration_min = Set(duration_min);
    }
    if let Some(price) = changes.price {
        active.price = Set(Some(price));
    }
    if let Some(is_active) = changes.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(conn).await.map_err(AppError::from)?;
    Ok(Service::from(model))
}

/// Connection-backed implementation of ServiceRepository
pub struct ServiceStore {
    db: DatabaseConnection,
}

impl ServiceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ServiceRepository for ServiceStore {
    async fn list_active(&self) -> AppResult<Vec<Service>> {
        list_active(&self.db).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Service>> {
        find_by_id(&self.db, id).await
    }

    async fn create(&self, input: CreateService) -> AppResult<Service> {
        create(&self.db, input).await
    }

    async fn update(&self, id: Uuid, changes: UpdateService) -> AppResult<Service> {
        update(&self.db, id, changes).await
    }
}

/// Transaction-bound ServiceRepository
pub struct TxServiceRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxServiceRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }
}

#[async_trait]
impl ServiceRepository for TxServiceRepository<'_> {
    async fn list_active(&self) -> AppResult<Vec<Service>> {
        list_active(self.txn).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Service>> {
        find_by_id(self.txn, id).await
    }

    async fn create(&self, input: CreateService) -> AppResult<Service> {
        create(self.txn, input).await
    }

    async fn update(&self, id: Uuid, changes: UpdateService) -> AppResult<Service> {
        update(self.txn, id, changes).await
    }
}
