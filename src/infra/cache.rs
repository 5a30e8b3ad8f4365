//! Redis cache: login sessions, profile settings and rate-limit counters.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{
    Config, CACHE_PREFIX_PROFILE, CACHE_PREFIX_RATE_LIMIT, CACHE_PREFIX_SESSION,
    PROFILE_CACHE_TTL_SECONDS,
};
use crate::domain::ProfileSettings;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// What the server remembers about a live login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user_id: Uuid,
    pub username: String,
}

/// What the HTTP layer keeps in Redis.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get_profile(&self, user_id: &Uuid) -> AppResult<Option<ProfileSettings>>;

    async fn set_profile(&self, user_id: &Uuid, settings: &ProfileSettings) -> AppResult<()>;

    async fn invalidate_profile(&self, user_id: &Uuid) -> AppResult<()>;

    async fn set_session(
        &self,
        session_id: &str,
        record: &SessionRecord,
        ttl_seconds: u64,
    ) -> AppResult<()>;

    async fn get_session(&self, session_id: &str) -> AppResult<Option<SessionRecord>>;

    async fn delete_session(&self, session_id: &str) -> AppResult<()>;

    /// Count one request against `identifier`'s fixed window.
    /// Returns `(count_in_window, allowed)`.
    async fn check_rate_limit(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)>;

    /// Round-trip a `PING` (health checks).
    async fn ping(&self) -> AppResult<()>;
}

/// Redis cache wrapper with connection pooling.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    /// Connect to Redis.
    pub async fn connect(config: &Config) -> Result<Self, RedisError> {
        let client = Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client).await?;
        tracing::info!("Redis cache connected");
        Ok(Self { connection })
    }

    // =========================================================================
    // Generic Cache Operations
    // =========================================================================

    async fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await?;

        value
            .map(|json| {
                serde_json::from_str(&json).map_err(|e| {
                    AppError::internal(format!("Cache deserialization error: {}", e))
                })
            })
            .transpose()
    }

    /// Set a value with a TTL in seconds.
    async fn set_with_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: u64,
    ) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::internal(format!("Cache serialization error: {}", e)))?;

        conn.set_ex::<_, _, ()>(key, json, ttl_seconds).await?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }
}

#[async_trait]
impl CacheBackend for Cache {
    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Profile Cache Operations
    // =========================================================================

    async fn get_profile(&self, user_id: &Uuid) -> AppResult<Option<ProfileSettings>> {
        self.get(&profile_key(user_id)).await
    }

    async fn set_profile(&self, user_id: &Uuid, settings: &ProfileSettings) -> AppResult<()> {
        self.set_with_ttl(&profile_key(user_id), settings, PROFILE_CACHE_TTL_SECONDS)
            .await
    }

    async fn invalidate_profile(&self, user_id: &Uuid) -> AppResult<()> {
        self.delete(&profile_key(user_id)).await
    }

    // =========================================================================
    // Session Operations
    // =========================================================================

    async fn set_session(
        &self,
        session_id: &str,
        record: &SessionRecord,
        ttl_seconds: u64,
    ) -> AppResult<()> {
        self.set_with_ttl(&session_key(session_id), record, ttl_seconds)
            .await
    }

    async fn get_session(&self, session_id: &str) -> AppResult<Option<SessionRecord>> {
        self.get(&session_key(session_id)).await
    }

    async fn delete_session(&self, session_id: &str) -> AppResult<()> {
        self.delete(&session_key(session_id)).await
    }

    // =========================================================================
    // Rate Limiting Operations
    // =========================================================================

    async fn check_rate_limit(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        let key = format!("{}{}", CACHE_PREFIX_RATE_LIMIT, identifier);
        let mut conn = self.connection.clone();

        let count: i64 = conn.incr(&key, 1).await?;
        if count == 1 {
            let _: () = conn.expire(&key, window_seconds as i64).await?;
        }

        let count = count.max(0) as u64;
        Ok((count, count <= max_requests))
    }
}

fn profile_key(user_id: &Uuid) -> String {
    format!("{}{}", CACHE_PREFIX_PROFILE, user_id)
}

fn session_key(session_id: &str) -> String {
    format!("{}{}", CACHE_PREFIX_SESSION, session_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_prefixed() {
        assert_eq!(session_key("abc"), "session:abc");
        assert_eq!(
            profile_key(&Uuid::nil()),
            "profile:00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn session_record_round_trips_through_json() {
        let record = SessionRecord {
            user_id: Uuid::nil(),
            username: "alice".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: SessionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
