//! Weekly working hours.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::config::MINUTES_PER_DAY;

/// Reasons a weekly schedule is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Invalid range for dayOfWeek={0}. startMin must be < endMin.")]
    InvalidRange(u8),

    #[error("Duplicate dayOfWeek={0}")]
    DuplicateDay(u8),

    #[error("dayOfWeek must be between 0 and 6, got {0}")]
    DayOutOfRange(i32),

    #[error("minutes must be between 0 and 1440, got {0}")]
    MinuteOutOfRange(i32),
}

/// The open interval of one weekday, in minutes since local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingWindow {
    day_of_week: u8,
    start_minute: u16,
    end_minute: u16,
}

impl WorkingWindow {
    /// Validated constructor: day 0..=6, minutes 0..=1440, start < end.
    pub fn new(day_of_week: i32, start_minute: i32, end_minute: i32) -> Result<Self, ScheduleError> {
        let day = u8::try_from(day_of_week)
            .ok()
            .filter(|d| *d <= 6)
            .ok_or(ScheduleError::DayOutOfRange(day_of_week))?;
        let start = to_minute(start_minute)?;
        let end = to_minute(end_minute)?;
        if start >= end {
            return Err(ScheduleError::InvalidRange(day));
        }
        Ok(Self {
            day_of_week: day,
            start_minute: start,
            end_minute: end,
        })
    }

    pub fn day_of_week(&self) -> u8 {
        self.day_of_week
    }

    pub fn start_minute(&self) -> u16 {
        self.start_minute
    }

    pub fn end_minute(&self) -> u16 {
        self.end_minute
    }
}

fn to_minute(value: i32) -> Result<u16, ScheduleError> {
    u16::try_from(value)
        .ok()
        .filter(|m| *m <= MINUTES_PER_DAY)
        .ok_or(ScheduleError::MinuteOutOfRange(value))
}

/// Validate a full week: every window well-formed, at most one per weekday.
pub fn build_week(entries: &[WorkingHourInput]) -> Result<Vec<WorkingWindow>, ScheduleError> {
    let mut seen = [false; 7];
    let mut week = Vec::with_capacity(entries.len());

    for entry in entries {
        let window = WorkingWindow::new(entry.day_of_week, entry.start_min, entry.end_min)?;
        let slot = &mut seen[usize::from(window.day_of_week)];
        if *slot {
            return Err(ScheduleError::DuplicateDay(window.day_of_week));
        }
        *slot = true;
        week.push(window);
    }

    week.sort_by_key(|w| w.day_of_week);
    Ok(week)
}

/// Persisted working-hour row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkingHour {
    pub id: Uuid,
    /// 0 = Sunday .. 6 = Saturday
    #[schema(example = 1)]
    pub day_of_week: i32,
    #[schema(example = 540)]
    pub start_min: i32,
    #[schema(example = 1080)]
    pub end_min: i32,
}

impl WorkingHour {
    /// The engine view of this row, if it is well-formed.
    ///
    /// A malformed row reads as a closed day and is logged.
    pub fn window(&self) -> Option<WorkingWindow> {
        match WorkingWindow::new(self.day_of_week, self.start_min, self.end_min) {
            Ok(window) => Some(window),
            Err(e) => {
                tracing::warn!(working_hour_id = %self.id, error = %e, "Ignoring malformed working-hour row");
                None
            }
        }
    }
}

/// One weekday in a schedule update
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkingHourInput {
    #[validate(range(min = 0, max = 6))]
    #[schema(example = 1)]
    pub day_of_week: i32,
    #[validate(range(min = 0, max = 1440))]
    #[schema(example = 540)]
    pub start_min: i32,
    #[validate(range(min = 0, max = 1440))]
    #[schema(example = 1080)]
    pub end_min: i32,
}

/// Full weekly schedule replacement
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ReplaceWorkingHours {
    #[validate(length(max = 7), nested)]
    pub hours: Vec<WorkingHourInput>,
}
