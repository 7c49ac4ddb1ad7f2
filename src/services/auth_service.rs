//! Authentication service - Registration, login and token handling.
//!
//! DDD: Uses domain Password value object for hashing.
//! DDD: Uses Unit of Work for repository access.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{is_valid_role, Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{CreateUser, Password, RegisterUser, User, UserRole};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Verified when the email is unknown so both login failures cost one Argon2 run.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 604800)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a customer account and sign it in
    async fn register(&self, input: RegisterUser) -> AppResult<TokenResponse>;

    /// Exchange credentials for a token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Load the account behind a token
    async fn me(&self, user_id: Uuid) -> AppResult<User>;

    /// Create or refresh the shop owner account
    async fn provision_barber(&self, email: String, password: String, name: String) -> AppResult<User>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    if !is_valid_role(&token_data.claims.role) {
        return Err(AppError::Unauthorized);
    }

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, input: RegisterUser) -> AppResult<TokenResponse> {
        if self.uow.users().find_by_email(&input.email).await?.is_some() {
            return Err(AppError::conflict("Email already in use"));
        }

        let password = Password::new(&input.password)?;
        let user = self
            .uow
            .users()
            .create(CreateUser {
                name: input.name,
                surname: input.surname,
                phone_number: input.phone_number,
                email: input.email,
                password_hash: password.into(),
                role: UserRole::User,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        generate_token(&user, &self.config)
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let user = self.uow.users().find_by_email(&email).await?;

        let stored = match &user {
            Some(user) => Password::from_hash(user.password_hash.clone()),
            None => Password::from_hash(DUMMY_HASH.to_string()),
        };
        let password_valid = stored.verify(&password);

        match user {
            Some(user) if password_valid => generate_token(&user, &self.config),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    async fn me(&self, user_id: Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(user_id).await?.ok_or_not_found("User")
    }

    async fn provision_barber(&self, email: String, password: String, name: String) -> AppResult<User> {
        let password = Password::new(&password)?;
        self.uow
            .users()
            .upsert(CreateUser {
                name,
                surname: String::new(),
                phone_number: String::new(),
                email,
                password_hash: password.into(),
                role: UserRole::Barber,
            })
            .await
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}
