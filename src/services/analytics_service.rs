//! Dashboard analytics.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use std::sync::Arc;

use crate::domain::analytics::{earliest_needed, latest_needed, summarize};
use crate::domain::{AnalyticsRange, AnalyticsSummary};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AnalyticsService: Send + Sync {
    /// KPIs, deltas and series for `range` as of `now`
    async fn summary(&self, range: AnalyticsRange, now: DateTime<Utc>) -> AppResult<AnalyticsSummary>;
}

pub struct Analytics<U: UnitOfWork> {
    uow: Arc<U>,
    offset: FixedOffset,
}

impl<U: UnitOfWork> Analytics<U> {
    pub fn new(uow: Arc<U>, offset: FixedOffset) -> Self {
        Self { uow, offset }
    }
}

#[async_trait]
impl<U: UnitOfWork> AnalyticsService for Analytics<U> {
    async fn summary(&self, range: AnalyticsRange, now: DateTime<Utc>) -> AppResult<AnalyticsSummary> {
        let from = earliest_needed(range, now, self.offset);
        let to = latest_needed(now, self.offset);

        let appointments = self.uow.appointments().list_between(from, to).await?;
        tracing::debug!(%range, loaded = appointments.len(), "Computing analytics summary");

        Ok(summarize(range, &appointments, now, self.offset))
    }
}
