//! Working hours repository.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::working_hour::{self, ActiveModel, Entity as WorkingHourEntity};
use crate::domain::{WorkingHour, WorkingWindow};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait WorkingHourRepository: Send + Sync {
    /// The whole week, ordered by day
    async fn list(&self) -> AppResult<Vec<WorkingHour>>;

    /// Row for a weekday (0 = Sunday), if the shop opens that day
    async fn find_by_day(&self, day_of_week: u8) -> AppResult<Option<WorkingHour>>;

    /// Delete every row, then insert `week`. Run inside a transaction.
    async fn replace_all(&self, week: Vec<WorkingWindow>) -> AppResult<Vec<WorkingHour>>;
}

async fn list<C: ConnectionTrait>(conn: &C) -> AppResult<Vec<WorkingHour>> {
    let models = WorkingHourEntity::find()
        .order_by_asc(working_hour::Column::DayOfWeek)
        .all(conn)
        .await?;

    Ok(models.into_iter().map(WorkingHour::from).collect())
}

async fn find_by_day<C: ConnectionTrait>(conn: &C, day_of_week: u8) -> AppResult<Option<WorkingHour>> {
    let result = WorkingHourEntity::find()
        .filter(working_hour::Column::DayOfWeek.eq(i32::from(day_of_week)))
        .one(conn)
        .await?;

    Ok(result.map(WorkingHour::from))
}

async fn replace_all<C: ConnectionTrait>(conn: &C, week: Vec<WorkingWindow>) -> AppResult<Vec<WorkingHour>> {
    WorkingHourEntity::delete_many().exec(conn).await?;

    if !week.is_empty() {
        let rows = week.iter().map(|w| ActiveModel {
            id: Set(Uuid::new_v4()),
            day_of_week: Set(i32::from(w.day_of_week())),
            start_min: Set(i32::from(w.start_minute())),
            end_min: Set(i32::from(w.end_minute())),
        });
        WorkingHourEntity::insert_many(rows).exec(conn).await?;
    }

    list(conn).await
}

/// Connection-backed implementation of WorkingHourRepository
pub struct WorkingHourStore {
    db: DatabaseConnection,
}

impl WorkingHourStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WorkingHourRepository for WorkingHourStore {
    async fn list(&self) -> AppResult<Vec<WorkingHour>> {
        list(&self.db).await
    }

    async fn find_by_day(&self, day_of_week: u8) -> AppResult<Option<WorkingHour>> {
        find_by_day(&self.db, day_of_week).await
    }

    async fn replace_all(&self, week: Vec<WorkingWindow>) -> AppResult<Vec<WorkingHour>> {
        replace_all(&self.db, week).await
    }
}

/// Transaction-bound WorkingHourRepository
pub struct TxWorkingHourRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxWorkingHourRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }
}

#[async_trait]
impl WorkingHourRepository for TxWorkingHourRepository<'_> {
    async fn list(&self) -> AppResult<Vec<WorkingHour>> {
        list(self.txn).await
    }

    async fn find_by_day(&self, day_of_week: u8) -> AppResult<Option<WorkingHour>> {
        find_by_day(self.txn, day_of_week).await
    }

    async fn replace_all(&self, week: Vec<WorkingWindow>) -> AppResult<Vec<WorkingHour>> {
        replace_all(self.txn, week).await
    }
}
