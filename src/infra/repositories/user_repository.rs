//! User repository.

use async_trait::async_trait;
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{CreateUser, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Create a new user. A taken email is a `Conflict`.
    async fn create(&self, user: CreateUser) -> AppResult<User>;

    /// Insert or refresh the account registered under `user.email`.
    async fn upsert(&self, user: CreateUser) -> AppResult<User>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_active_model(user: CreateUser) -> ActiveModel {
    let now = chrono::Utc::now();
    ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(user.name),
        surname: Set(user.surname),
        phone_number: Set(user.phone_number),
        email: Set(user.email),
        password_hash: Set(user.password_hash),
        role: Set(user.role.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn create(&self, user: CreateUser) -> AppResult<User> {
        match to_active_model(user).insert(&self.db).await {
            Ok(model) => Ok(User::from(model)),
            Err(e) if is_unique_violation(&e) => Err(AppError::conflict("Email already in use")),
            Err(e) => Err(AppError::from(e)),
        }
    }

    async fn upsert(&self, user: CreateUser) -> AppResult<User> {
        let email = user.email.clone();

        UserEntity::insert(to_active_model(user))
            .on_conflict(
                OnConflict::column(user::Column::Email)
                    .update_columns([
                        user::Column::Name,
                        user::Column::PasswordHash,
                        user::Column::Role,
                        user::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        self.find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::internal(format!("upserted user {} vanished", email)))
    }
}
