//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::config::{ROLE_BARBER, ROLE_USER};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// Customer booking appointments
    User,
    /// Shop owner managing the catalog, hours and appointments
    Barber,
}

impl UserRole {
    /// Check if this role manages the shop
    pub fn is_barber(&self) -> bool {
        matches!(self, UserRole::Barber)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Barber => ROLE_BARBER,
            UserRole::User => ROLE_USER,
        }
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_BARBER => UserRole::Barber,
            _ => UserRole::User,
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub phone_number: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if user owns the shop
    pub fn is_barber(&self) -> bool {
        self.role.is_barber()
    }
}

/// Registration data handed to the user store
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub surname: String,
    pub phone_number: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Self-service sign-up payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    #[schema(example = "Ali")]
    pub name: String,
    #[validate(length(min = 1, message = "Surname is required"))]
    #[schema(example = "Demir")]
    pub surname: String,
    #[validate(length(min = 10, max = 20, message = "Phone number must be 10 to 20 characters"))]
    #[schema(example = "+905551112233")]
    pub phone_number: String,
    #[validate(email(message = "Invalid email"))]
    #[schema(example = "ali@example.com")]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[schema(example = "secret123", min_length = 6)]
    pub password: String,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Ali")]
    pub name: String,
    #[schema(example = "Demir")]
    pub surname: String,
    #[schema(example = "ali@example.com")]
    pub email: String,
    #[schema(example = "+905551112233")]
    pub phone_number: String,
    #[schema(example = "USER")]
    pub role: UserRole,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            surname: user.surname,
            email: user.email,
            phone_number: user.phone_number,
            role: user.role,
            created_at: user.created_at,
        }
    }
}
