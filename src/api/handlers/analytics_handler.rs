//! Barber dashboard analytics handler.

use axum::{extract::State, response::Json, routing::get, Router};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::api::extractors::ValidatedQuery;
use crate::api::middleware::barber_only;
use crate::api::AppState;
use crate::domain::{AnalyticsRange, AnalyticsSummary};
use crate::errors::{AppError, AppResult};

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    /// `today`, `7d` or `30d` (default)
    #[param(example = "30d")]
    pub range: Option<String>,
}

impl SummaryQuery {
    fn range(&self) -> AppResult<AnalyticsRange> {
        match self.range.as_deref() {
            None => Ok(AnalyticsRange::default()),
            Some(raw) => raw.parse().map_err(AppError::Validation),
        }
    }
}

pub fn analytics_routes(state: &AppState) -> Router<AppState> {
    Router::new().route("/summary", barber_only(state, get(get_summary)))
}

/// KPIs, deltas, daily series and today's agenda
#[utoipa::path(
    get,
    path = "/analytics/summary",
    tag = "Analytics",
    security(("bearer_auth" = [])),
    params(SummaryQuery),
    responses(
        (status = 200, description = "Dashboard summary", body = AnalyticsSummary),
        (status = 400, description = "Invalid range"),
        (status = 403, description = "Barber role required")
    )
)]
pub async fn get_summary(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<SummaryQuery>,
) -> AppResult<Json<AnalyticsSummary>> {
    let range = query.range()?;
    let summary = state.analytics_service.summary(range, Utc::now()).await?;
    Ok(Json(summary))
}
