//! Bookable service (haircut, beard trim, ...) and catalog requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Length of a service in minutes, always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ServiceDuration(u16);

impl ServiceDuration {
    pub fn from_minutes(minutes: i32) -> Option<Self> {
        u16::try_from(minutes).ok().filter(|m| *m > 0).map(Self)
    }

    pub fn minutes(self) -> u16 {
        self.0
    }
}

/// Service domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    #[schema(example = "Classic haircut")]
    pub name: String,
    #[schema(example = 30)]
    pub duration_min: i32,
    /// Price in whole currency units, if published
    #[schema(example = 250)]
    pub price: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Service {
    /// Duration as the engine sees it; `None` for a corrupt row.
    pub fn duration(&self) -> Option<ServiceDuration> {
        ServiceDuration::from_minutes(self.duration_min)
    }

    pub fn summary(&self) -> ServiceSummary {
        ServiceSummary {
            id: self.id,
            name: self.name.clone(),
            duration_min: self.duration_min,
            price: self.price,
        }
    }
}

/// Service fields embedded in appointment listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub id: Uuid,
    pub name: String,
    pub duration_min: i32,
    pub price: Option<i32>,
}

/// Service creation request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateService {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    #[schema(example = "Classic haircut")]
    pub name: String,
    #[validate(range(min = 10, max = 240, message = "Duration must be between 10 and 240 minutes"))]
    #[schema(example = 30)]
    pub duration_min: i32,
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    #[schema(example = 250)]
    pub price: Option<i32>,
}

/// Partial service update
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateService {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: Option<String>,
    #[validate(range(min = 10, max = 240, message = "Duration must be between 10 and 240 minutes"))]
    pub duration_min: Option<i32>,
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price: Option<i32>,
    pub is_active: Option<bool>,
}

impl UpdateService {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.duration_min.is_none()
            && self.price.is_none()
            && self.is_active.is_none()
    }
}
