//! Weekly working hours.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{build_week, ReplaceWorkingHours, WorkingHour};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ScheduleService: Send + Sync {
    /// Saved hours ordered by day of week
    async fn list(&self) -> AppResult<Vec<WorkingHour>>;

    /// Validate and swap in a whole new week in one transaction.
    async fn replace(&self, input: ReplaceWorkingHours) -> AppResult<Vec<WorkingHour>>;
}

pub struct Schedule<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> Schedule<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> ScheduleService for Schedule<U> {
    async fn list(&self) -> AppResult<Vec<WorkingHour>> {
        self.uow.working_hours().list().await
    }

    async fn replace(&self, input: ReplaceWorkingHours) -> AppResult<Vec<WorkingHour>> {
        let week = build_week(&input.hours)?;
        let open_days = week.len();

        let saved = self
            .uow
            .transaction(move |ctx| Box::pin(async move { ctx.working_hours().replace_all(week).await }))
            .await?;

        tracing::info!(open_days, "Working hours replaced");
        Ok(saved)
    }
}
