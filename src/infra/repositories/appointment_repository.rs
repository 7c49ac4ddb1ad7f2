//! Appointment repository.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, Select, Set,
};
use uuid::Uuid;

use super::entities::appointment::{self, ActiveModel, Entity as AppointmentEntity};
use super::entities::{service, user, ServiceEntity, UserEntity};
use crate::domain::{
    Appointment, AppointmentDetails, AppointmentInterval, AppointmentStatus, CustomerSummary,
    NewAppointment, Service,
};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// PENDING/CONFIRMED appointments starting in `[start, end)`
    async fn find_active_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<AppointmentInterval>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Appointment>>;

    /// Persist a validated booking as PENDING
    async fn insert(&self, appointment: NewAppointment) -> AppResult<Appointment>;

    async fn update_status(&self, id: Uuid, status: AppointmentStatus) -> AppResult<Appointment>;

    /// A customer's appointments, ascending by start
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<AppointmentDetails>>;

    /// Every appointment, ascending by start
    async fn list_all(&self) -> AppResult<Vec<AppointmentDetails>>;

    /// Appointments of any status starting in `[start, end)`, ascending
    async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<AppointmentDetails>>;
}

fn active_statuses() -> Vec<&'static str> {
    AppointmentStatus::ACTIVE.iter().map(|s| s.as_str()).collect()
}

async fn find_active_between<C: ConnectionTrait>(
    conn: &C,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> AppResult<Vec<AppointmentInterval>> {
    let models = AppointmentEntity::find()
        .filter(appointment::Column::StartAt.gte(start))
        .filter(appointment::Column::StartAt.lt(end))
        .filter(appointment::Column::Status.is_in(active_statuses()))
        .order_by_asc(appointment::Column::StartAt)
        .all(conn)
        .await?;

    models
        .into_iter()
        .map(|m| -> AppResult<AppointmentInterval> { Ok(Appointment::try_from(m)?.interval()) })
        .collect()
}

async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<Appointment>> {
    AppointmentEntity::find_by_id(id)
        .one(conn)
        .await?
        .map(Appointment::try_from)
        .transpose()
        .map_err(AppError::from)
}

async fn insert<C: ConnectionTrait>(conn: &C, new: NewAppointment) -> AppResult<Appointment> {
    let now = Utc::now();
    let active_model = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(new.user_id),
        service_id: Set(new.service_id),
        start_at: Set(new.span.start),
        end_at: Set(new.span.end),
        status: Set(AppointmentStatus::Pending.to_string()),
        note: Set(new.note),
        price_snapshot: Set(new.price_snapshot),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = active_model.insert(conn).await?;
    Ok(Appointment::try_from(model)?)
}

async fn update_status<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    status: AppointmentStatus,
) -> AppResult<Appointment> {
    let existing = AppointmentEntity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_not_found("Appointment")?;

    let mut active: ActiveModel = existing.into();
    active.status = Set(status.to_string());
    active.updated_at = Set(Utc::now());

    let model = active.update(conn).await?;
    Ok(Appointment::try_from(model)?)
}

/// Load appointments for `query` and attach their services and customers.
async fn load_details<C: ConnectionTrait>(
    conn: &C,
    query: Select<AppointmentEntity>,
) -> AppResult<Vec<AppointmentDetails>> {
    let models = query
        .order_by_asc(appointment::Column::StartAt)
        .all(conn)
        .await?;
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let mut service_ids: Vec<Uuid> = models.iter().map(|m| m.service_id).collect();
    service_ids.sort_unstable();
    service_ids.dedup();
    let mut user_ids: Vec<Uuid> = models.iter().map(|m| m.user_id).collect();
    user_ids.sort_unstable();
    user_ids.dedup();

    let services: HashMap<Uuid, Service> = ServiceEntity::find()
        .filter(service::Column::Id.is_in(service_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|m| (m.id, Service::from(m)))
        .collect();
    let customers: HashMap<Uuid, CustomerSummary> = UserEntity::find()
        .filter(user::Column::Id.is_in(user_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|m| {
            (
                m.id,
                CustomerSummary {
                    id: m.id,
                    name: m.name,
                    email: m.email,
                },
            )
        })
        .collect();

    models
        .into_iter()
        .map(|model| -> AppResult<AppointmentDetails> {
            let appointment = Appointment::try_from(model)?;
            let service = services
                .get(&appointment.service_id)
                .map(Service::summary)
                .ok_or_else(|| {
                    AppError::internal(format!("appointment {} has no service", appointment.id))
                })?;
            let customer = customers.get(&appointment.user_id).cloned().ok_or_else(|| {
                AppError::internal(format!("appointment {} has no customer", appointment.id))
            })?;
            Ok(AppointmentDetails {
                appointment,
                service,
                customer,
            })
        })
        .collect()
}

/// Connection-backed implementation of AppointmentRepository
pub struct AppointmentStore {
    db: DatabaseConnection,
}

impl AppointmentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AppointmentRepository for AppointmentStore {
    async fn find_active_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<AppointmentInterval>> {
        find_active_between(&self.db, start, end).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Appointment>> {
        find_by_id(&self.db, id).await
    }

    async fn insert(&self, appointment: NewAppointment) -> AppResult<Appointment> {
        insert(&self.db, appointment).await
    }

    async fn update_status(&self, id: Uuid, status: AppointmentStatus) -> AppResult<Appointment> {
        update_status(&self.db, id, status).await
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<AppointmentDetails>> {
        let query = AppointmentEntity::find().filter(appointment::Column::UserId.eq(user_id));
        load_details(&self.db, query).await
    }

    async fn list_all(&self) -> AppResult<Vec<AppointmentDetails>> {
        load_details(&self.db, AppointmentEntity::find()).await
    }

    async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<AppointmentDetails>> {
        let query = AppointmentEntity::find()
            .filter(appointment::Column::StartAt.gte(start))
            .filter(appointment::Column::StartAt.lt(end));
        load_details(&self.db, query).await
    }
}

/// Transaction-bound AppointmentRepository
pub struct TxAppointmentRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxAppointmentRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }
}

#[async_trait]
impl AppointmentRepository for TxAppointmentRepository<'_> {
    async fn find_active_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<AppointmentInterval>> {
        find_active_between(self.txn, start, end).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Appointment>> {
        find_by_id(self.txn, id).await
    }

    async fn insert(&self, appointment: NewAppointment) -> AppResult<Appointment> {
        insert(self.txn, appointment).await
    }

    async fn update_status(&self, id: Uuid, status: AppointmentStatus) -> AppResult<Appointment> {
        update_status(self.txn, id, status).await
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<AppointmentDetails>> {
        let query = AppointmentEntity::find().filter(appointment::Column::UserId.eq(user_id));
        load_details(self.txn, query).await
    }

    async fn list_all(&self) -> AppResult<Vec<AppointmentDetails>> {
        load_details(self.txn, AppointmentEntity::find()).await
    }

    async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<AppointmentDetails>> {
        let query = AppointmentEntity::find()
            .filter(appointment::Column::StartAt.gte(start))
            .filter(appointment::Column::StartAt.lt(end));
        load_details(self.txn, query).await
    }
}
