//! Redis-backed rate limiting.
//!
//! Fixed-window counters keyed by client identifier. The limiter fails
//! closed: callers treat an `Err` as "deny".

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};

use super::health::HealthCheck;
use crate::config::{Config, CACHE_HEALTH_KEY, CACHE_PREFIX_RATE_LIMIT};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Outcome of one rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Requests seen in the current window, this one included
    pub count: u64,
    pub allowed: bool,
}

/// Counts requests per identifier within a fixed window.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn check(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<RateLimitDecision>;
}

/// Redis connection wrapper.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    /// Connect to Redis using `REDIS_URL`.
    pub async fn connect(config: &Config) -> Result<Self, RedisError> {
        let client = Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis cache connected");

        Ok(Self { connection })
    }
}

#[async_trait]
impl RateLimiter for Cache {
    async fn check(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<RateLimitDecision> {
        let key = format!("{}{}", CACHE_PREFIX_RATE_LIMIT, identifier);
        let mut conn = self.connection.clone();

        let count: i64 = conn.incr(&key, 1).await.map_err(cache_error)?;
        if count == 1 {
            // first hit opens the window
            let _: () = conn
                .expire(&key, window_seconds as i64)
                .await
                .map_err(cache_error)?;
        }

        let count = count.max(0) as u64;
        Ok(RateLimitDecision {
            count,
            allowed: count <= max_requests,
        })
    }
}

#[async_trait]
impl HealthCheck for Cache {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn ping(&self) -> Result<(), String> {
        let mut conn = self.connection.clone();
        let _: bool = conn
            .exists(CACHE_HEALTH_KEY)
            .await
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

fn cache_error(e: RedisError) -> AppError {
    tracing::error!("Redis error: {}", e);
    AppError::internal(format!("Cache error: {}", e))
}
