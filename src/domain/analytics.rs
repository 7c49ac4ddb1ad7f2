//! Dashboard KPIs computed from appointment records.
//!
//! [`summarize`] is pure: the caller loads appointments starting at or after
//! [`earliest_needed`] and passes the current instant explicitly. Windows are
//! half-open `[start, end)` and aligned to business-local midnights.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, Months, NaiveDate, Timelike, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::appointment::{AppointmentDetails, AppointmentStatus};
use super::time::{ClockTime, LocalDay, TimeSpan};
use crate::config::ANALYTICS_SERIES_DAYS;

/// Reporting range selected on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
pub enum AnalyticsRange {
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "7d")]
    Last7Days,
    #[default]
    #[serde(rename = "30d")]
    Last30Days,
}

impl AnalyticsRange {
    pub fn days(&self) -> i64 {
        match self {
            AnalyticsRange::Today => 1,
            AnalyticsRange::Last7Days => 7,
            AnalyticsRange::Last30Days => 30,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsRange::Today => "today",
            AnalyticsRange::Last7Days => "7d",
            AnalyticsRange::Last30Days => "30d",
        }
    }
}

impl fmt::Display for AnalyticsRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalyticsRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(AnalyticsRange::Today),
            "7d" => Ok(AnalyticsRange::Last7Days),
            "30d" => Ok(AnalyticsRange::Last30Days),
            _ => Err("Invalid range. Use today|7d|30d".to_string()),
        }
    }
}

/// Half-open reporting window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

impl From<TimeSpan> for Window {
    fn from(span: TimeSpan) -> Self {
        Self {
            start: span.start,
            end: span.end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    /// Planned revenue of today
    pub today_revenue: i64,
    pub today_appointments: u64,
    /// Planned revenue since the first of the month
    pub month_revenue: i64,
    pub cancel_rate30d: f64,
    pub today_planned_revenue: i64,
    pub today_realized_revenue: i64,
    pub month_planned_revenue: i64,
    pub month_realized_revenue: i64,
    pub cancelled_value_range: i64,
}

/// Relative change against the previous period
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Deltas {
    pub today_revenue: f64,
    pub today_appointments: f64,
    pub month_revenue: f64,
    pub cancel_rate30d: f64,
    pub range_revenue: f64,
    pub range_appointments: f64,
    pub range_planned_revenue_delta: f64,
    pub range_realized_revenue_delta: f64,
    pub cancelled_value_delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RevenuePoint {
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub planned: i64,
    pub realized: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ValuePoint {
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub revenue_daily: Vec<RevenuePoint>,
    pub cancelled_value_daily: Vec<ValuePoint>,
    /// Appointments per status in the selected range; absent statuses are omitted
    pub status_counts: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodayAppointment {
    pub id: Uuid,
    #[schema(value_type = String, example = "09:30")]
    pub time: ClockTime,
    pub customer_name: String,
    pub customer_email: String,
    pub service_name: String,
    pub duration_min: i32,
    pub price: Option<i32>,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub today: Window,
    pub range_window: Window,
}

/// Full dashboard payload
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub range: AnalyticsRange,
    pub kpis: Kpis,
    pub deltas: Deltas,
    pub series: Series,
    pub today_appointments: Vec<TodayAppointment>,
    pub meta: Meta,
}

/// All windows a summary looks at, anchored on the local day containing `now`.
#[derive(Debug, Clone, Copy)]
struct Windows {
    today: Window,
    yesterday: Window,
    month: Window,
    previous_month: Window,
    last30: Window,
    previous30: Window,
    range: Window,
    previous_range: Window,
}

impl Windows {
    fn new(range: AnalyticsRange, now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let today = LocalDay::containing(now, offset);
        let span = |from: i64, to: i64| Window {
            start: today.shift(from).bounds().start,
            end: today.shift(to).bounds().start,
        };

        let days = range.days();
        let month_first = first_of_month(today.date());
        let month_start = LocalDay::new(month_first, offset).bounds().start;
        let previous_month_first = month_first
            .checked_sub_months(Months::new(1))
            .unwrap_or(month_first);
        let previous_month_start = LocalDay::new(previous_month_first, offset).bounds().start;

        Self {
            today: today.bounds().into(),
            yesterday: today.shift(-1).bounds().into(),
            month: Window {
                start: month_start,
                end: now,
            },
            previous_month: Window {
                start: previous_month_start,
                end: month_start,
            },
            last30: span(-29, 1),
            previous30: span(-59, -29),
            range: span(-(days - 1), 1),
            previous_range: span(-(2 * days - 1), -(days - 1)),
        }
    }

    fn earliest(&self) -> DateTime<Utc> {
        [
            self.previous_month.start,
            self.previous30.start,
            self.previous_range.start,
            self.yesterday.start,
        ]
        .into_iter()
        .min()
        .unwrap_or(self.today.start)
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Earliest appointment start a summary for `range` at `now` can touch.
pub fn earliest_needed(range: AnalyticsRange, now: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
    Windows::new(range, now, offset).earliest()
}

/// End of the local day containing `now`; no summary looks past it.
pub fn latest_needed(now: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
    LocalDay::containing(now, offset).bounds().end
}

/// Change from `previous` to `current`. 0 when both are 0, 1 when only `previous` is.
pub fn safe_delta(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        if current == 0.0 {
            0.0
        } else {
            1.0
        }
    } else {
        (current - previous) / previous
    }
}

fn safe_rate(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

struct Facts<'a>(&'a [AppointmentDetails]);

impl<'a> Facts<'a> {
    fn within(&self, window: Window) -> impl Iterator<Item = &'a AppointmentDetails> + '_ {
        self.0
            .iter()
            .filter(move |d| window.contains(d.appointment.start_at))
    }

    fn revenue(&self, window: Window, keep: impl Fn(AppointmentStatus) -> bool) -> i64 {
        self.within(window)
            .filter(|d| keep(d.appointment.status))
            .map(|d| i64::from(d.appointment.price_snapshot.unwrap_or(0)))
            .sum()
    }

    fn planned(&self, window: Window) -> i64 {
        self.revenue(window, |s| s.is_planned())
    }

    fn realized(&self, window: Window) -> i64 {
        self.revenue(window, |s| s == AppointmentStatus::Done)
    }

    fn cancelled_value(&self, window: Window) -> i64 {
        self.revenue(window, |s| s == AppointmentStatus::Cancelled)
    }

    fn count(&self, window: Window) -> u64 {
        self.within(window).count() as u64
    }

    fn cancel_rate(&self, window: Window) -> f64 {
        let cancelled = self
            .within(window)
            .filter(|d| d.appointment.status == AppointmentStatus::Cancelled)
            .count() as u64;
        safe_rate(cancelled, self.count(window))
    }
}

/// Compute the dashboard summary for `range` as of `now`.
pub fn summarize(
    range: AnalyticsRange,
    appointments: &[AppointmentDetails],
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> AnalyticsSummary {
    let w = Windows::new(range, now, offset);
    let facts = Facts(appointments);

    let today_planned = facts.planned(w.today);
    let today_count = facts.count(w.today);
    let month_planned = facts.planned(w.month);
    let cancel_rate = facts.cancel_rate(w.last30);
    let range_planned = facts.planned(w.range);
    let range_cancelled = facts.cancelled_value(w.range);

    let kpis = Kpis {
        today_revenue: today_planned,
        today_appointments: today_count,
        month_revenue: month_planned,
        cancel_rate30d: cancel_rate,
        today_planned_revenue: today_planned,
        today_realized_revenue: facts.realized(w.today),
        month_planned_revenue: month_planned,
        month_realized_revenue: facts.realized(w.month),
        cancelled_value_range: range_cancelled,
    };

    let delta = |current: i64, previous: i64| safe_delta(current as f64, previous as f64);
    let range_delta = delta(range_planned, facts.planned(w.previous_range));
    let deltas = Deltas {
        today_revenue: delta(today_planned, facts.planned(w.yesterday)),
        today_appointments: safe_delta(today_count as f64, facts.count(w.yesterday) as f64),
        month_revenue: delta(month_planned, facts.planned(w.previous_month)),
        cancel_rate30d: safe_delta(cancel_rate, facts.cancel_rate(w.previous30)),
        range_revenue: range_delta,
        range_appointments: safe_delta(
            facts.count(w.range) as f64,
            facts.count(w.previous_range) as f64,
        ),
        range_planned_revenue_delta: range_delta,
        range_realized_revenue_delta: delta(
            facts.realized(w.range),
            facts.realized(w.previous_range),
        ),
        cancelled_value_delta: delta(range_cancelled, facts.cancelled_value(w.previous_range)),
    };

    let today = LocalDay::containing(now, offset);
    let series_days: Vec<LocalDay> = (0..ANALYTICS_SERIES_DAYS)
        .map(|i| today.shift(i - (ANALYTICS_SERIES_DAYS - 1)))
        .collect();

    let revenue_daily = series_days
        .iter()
        .map(|day| {
            let window = Window::from(day.bounds());
            RevenuePoint {
                date: day.date(),
                planned: facts.planned(window),
                realized: facts.realized(window),
            }
        })
        .collect();

    let cancelled_value_daily = series_days
        .iter()
        .map(|day| ValuePoint {
            date: day.date(),
            value: facts.cancelled_value(day.bounds().into()),
        })
        .collect();

    let mut status_counts = BTreeMap::new();
    for details in facts.within(w.range) {
        *status_counts
            .entry(details.appointment.status.as_str().to_string())
            .or_insert(0) += 1;
    }

    let mut todays: Vec<&AppointmentDetails> = facts.within(w.today).collect();
    todays.sort_by_key(|d| d.appointment.start_at);
    let today_appointments = todays
        .into_iter()
        .map(|d| TodayAppointment {
            id: d.appointment.id,
            time: local_clock_time(d.appointment.start_at, offset),
            customer_name: d.customer.name.clone(),
            customer_email: d.customer.email.clone(),
            service_name: d.service.name.clone(),
            duration_min: d.service.duration_min,
            price: d.appointment.price_snapshot,
            status: d.appointment.status,
        })
        .collect();

    AnalyticsSummary {
        range,
        kpis,
        deltas,
        series: Series {
            revenue_daily,
            cancelled_value_daily,
            status_counts,
        },
        today_appointments,
        meta: Meta {
            today: w.today,
            range_window: w.range,
        },
    }
}

fn local_clock_time(instant: DateTime<Utc>, offset: FixedOffset) -> ClockTime {
    let local = instant.with_timezone(&offset);
    let minutes = (local.hour() * 60 + local.minute()) as u16;
    ClockTime::from_minutes(minutes).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::appointment::{Appointment, CustomerSummary};
    use crate::domain::service::ServiceSummary;
    use chrono::{Duration, TimeZone};

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    // Wednesday 2024-06-12 15:00 UTC
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 12, 15, 0, 0).unwrap()
    }

    fn appt(start_at: DateTime<Utc>, status: AppointmentStatus, price: i32) -> AppointmentDetails {
        let service_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        AppointmentDetails {
            appointment: Appointment {
                id: Uuid::new_v4(),
                user_id,
                service_id,
                start_at,
                end_at: start_at + Duration::minutes(30),
                status,
                note: None,
                price_snapshot: Some(price),
                created_at: start_at,
                updated_at: start_at,
            },
            service: ServiceSummary {
                id: service_id,
                name: "Haircut".into(),
                duration_min: 30,
                price: Some(price),
            },
            customer: CustomerSummary {
                id: user_id,
                name: "Ali".into(),
                email: "ali@example.com".into(),
            },
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_range_parsing() {
        assert_eq!("7d".parse::<AnalyticsRange>(), Ok(AnalyticsRange::Last7Days));
        assert_eq!(AnalyticsRange::default(), AnalyticsRange::Last30Days);
        assert_eq!(
            "90d".parse::<AnalyticsRange>().unwrap_err(),
            "Invalid range. Use today|7d|30d"
        );
    }

    #[test]
    fn test_safe_delta() {
        assert_eq!(safe_delta(0.0, 0.0), 0.0);
        assert_eq!(safe_delta(5.0, 0.0), 1.0);
        assert_eq!(safe_delta(150.0, 100.0), 0.5);
        assert_eq!(safe_delta(50.0, 100.0), -0.5);
    }

    #[test]
    fn test_planned_and_realized_revenue() {
        let facts = vec![
            appt(at(12, 9), AppointmentStatus::Done, 100),
            appt(at(12, 10), AppointmentStatus::Confirmed, 200),
            appt(at(12, 11), AppointmentStatus::Pending, 400),
            appt(at(12, 12), AppointmentStatus::Cancelled, 800),
            appt(at(11, 9), AppointmentStatus::Done, 150),
        ];
        let summary = summarize(AnalyticsRange::Today, &facts, now(), utc());

        assert_eq!(summary.kpis.today_planned_revenue, 300);
        assert_eq!(summary.kpis.today_realized_revenue, 100);
        assert_eq!(summary.kpis.today_revenue, 300);
        assert_eq!(summary.kpis.today_appointments, 4);
        assert_eq!(summary.kpis.cancelled_value_range, 800);
        assert_eq!(summary.deltas.today_revenue, 1.0);
        assert_eq!(summary.deltas.today_appointments, 3.0);
    }

    #[test]
    fn test_month_windows() {
        let facts = vec![
            appt(at(1, 9), AppointmentStatus::Done, 100),
            appt(at(12, 14), AppointmentStatus::Confirmed, 100),
            // later today, after `now`
            appt(at(12, 17), AppointmentStatus::Confirmed, 999),
            appt(Utc.with_ymd_and_hms(2024, 5, 31, 10, 0, 0).unwrap(), AppointmentStatus::Done, 400),
            appt(Utc.with_ymd_and_hms(2024, 4, 30, 10, 0, 0).unwrap(), AppointmentStatus::Done, 1000),
        ];
        let summary = summarize(AnalyticsRange::Last30Days, &facts, now(), utc());

        assert_eq!(summary.kpis.month_planned_revenue, 200);
        assert_eq!(summary.kpis.month_realized_revenue, 100);
        assert_eq!(summary.kpis.month_revenue, 200);
        assert_eq!(summary.deltas.month_revenue, -0.5);
    }

    #[test]
    fn test_cancel_rate_last_30_days() {
        let facts = vec![
            appt(at(12, 9), AppointmentStatus::Cancelled, 100),
            appt(at(10, 9), AppointmentStatus::Done, 100),
            appt(at(5, 9), AppointmentStatus::Done, 100),
            appt(at(2, 9), AppointmentStatus::Pending, 100),
        ];
        let summary = summarize(AnalyticsRange::Last7Days, &facts, now(), utc());
        assert_eq!(summary.kpis.cancel_rate30d, 0.25);
        assert_eq!(summary.deltas.cancel_rate30d, 1.0);
    }

    #[test]
    fn test_series_covers_thirty_local_days() {
        let facts = vec![
            appt(at(12, 9), AppointmentStatus::Done, 100),
            appt(at(12, 10), AppointmentStatus::Confirmed, 50),
            appt(at(12, 11), AppointmentStatus::Cancelled, 70),
            // outside the series
            appt(Utc.with_ymd_and_hms(2024, 5, 13, 10, 0, 0).unwrap(), AppointmentStatus::Done, 1),
        ];
        let summary = summarize(AnalyticsRange::Last30Days, &facts, now(), utc());
        let daily = &summary.series.revenue_daily;

        assert_eq!(daily.len(), 30);
        assert_eq!(daily[0].date, NaiveDate::from_ymd_opt(2024, 5, 14).unwrap());
        assert_eq!(daily[29].date, NaiveDate::from_ymd_opt(2024, 6, 12).unwrap());
        assert_eq!((daily[29].planned, daily[29].realized), (150, 100));
        assert_eq!(daily.iter().map(|p| p.planned).sum::<i64>(), 150);
        assert_eq!(summary.series.cancelled_value_daily[29].value, 70);
    }

    #[test]
    fn test_status_counts_follow_range() {
        let facts = vec![
            appt(at(12, 9), AppointmentStatus::Done, 100),
            appt(at(9, 9), AppointmentStatus::Pending, 100),
            appt(at(1, 9), AppointmentStatus::Cancelled, 100),
        ];
        let week = summarize(AnalyticsRange::Last7Days, &facts, now(), utc());
        assert_eq!(week.series.status_counts.get("DONE"), Some(&1));
        assert_eq!(week.series.status_counts.get("PENDING"), Some(&1));
        assert!(week.series.status_counts.get("CANCELLED").is_none());

        let today = summarize(AnalyticsRange::Today, &facts, now(), utc());
        assert_eq!(today.series.status_counts.len(), 1);
    }

    #[test]
    fn test_range_windows_and_meta() {
        let summary = summarize(AnalyticsRange::Last7Days, &[], now(), utc());
        assert_eq!(summary.meta.range_window.start, at(6, 0));
        assert_eq!(summary.meta.range_window.end, at(13, 0));
        assert_eq!(summary.meta.today.start, at(12, 0));
        assert_eq!(summary.deltas.range_revenue, 0.0);
    }

    #[test]
    fn test_today_list_uses_local_time() {
        let plus3 = FixedOffset::east_opt(3 * 3600).unwrap();
        // 21:30 UTC on the 11th is 00:30 local on the 12th
        let facts = vec![
            appt(Utc.with_ymd_and_hms(2024, 6, 12, 7, 0, 0).unwrap(), AppointmentStatus::Pending, 10),
            appt(Utc.with_ymd_and_hms(2024, 6, 11, 21, 30, 0).unwrap(), AppointmentStatus::Confirmed, 20),
        ];
        let summary = summarize(AnalyticsRange::Today, &facts, now(), plus3);
        let times: Vec<String> = summary
            .today_appointments
            .iter()
            .map(|a| a.time.to_string())
            .collect();
        assert_eq!(times, vec!["00:30", "10:00"]);
    }

    #[test]
    fn test_earliest_needed_reaches_previous_month() {
        let earliest = earliest_needed(AnalyticsRange::Today, now(), utc());
        assert_eq!(earliest, Utc.with_ymd_and_hms(2024, 4, 14, 0, 0, 0).unwrap());
        assert_eq!(latest_needed(now(), utc()), at(13, 0));
    }

    #[test]
    fn test_summary_wire_names() {
        let json = serde_json::to_value(summarize(AnalyticsRange::Today, &[], now(), utc())).unwrap();
        assert_eq!(json["range"], "today");
        assert!(json["kpis"].get("cancelRate30d").is_some());
        assert!(json["deltas"].get("rangePlannedRevenueDelta").is_some());
        assert!(json["series"].get("revenueDaily").is_some());
        assert!(json["meta"].get("rangeWindow").is_some());
    }
}
