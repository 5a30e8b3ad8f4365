//! Runtime settings read from the environment (and `.env` when present).
//!
//! | Variable | Default |
//! |---|---|
//! | `DATABASE_URL` | local Postgres |
//! | `REDIS_URL` | local Redis |
//! | `JWT_SECRET` | required in release builds, at least 32 bytes |
//! | `JWT_EXPIRATION_HOURS` | 24 |
//! | `SESSION_COOKIE_SECURE` | `false` |
//!
//! The listen address is taken by `serve` itself (`SERVER_HOST`, `SERVER_PORT`).

use std::env;
use std::str::FromStr;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_REDIS_URL, MIN_JWT_SECRET_LENGTH,
    SECONDS_PER_HOUR,
};

const DEV_JWT_SECRET: &str = "dev-secret-key-minimum-32-chars!!";

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    jwt_secret: String,
    /// Lifetime of a login: token expiry, cookie and Redis record alike
    pub jwt_expiration_hours: i64,
    /// Mark the session cookie `Secure` (HTTPS deployments)
    pub session_cookie_secure: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("session_cookie_secure", &self.session_cookie_secure)
            .finish()
    }
}

/// Parse `key`, falling back to `default` when unset or unparsable.
fn env_parsed<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring unparsable setting");
            default
        }),
        Err(_) => default,
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// When `JWT_SECRET` is missing in a release build, or shorter than
    /// `MIN_JWT_SECRET_LENGTH`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                DEV_JWT_SECRET.to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        Self {
            database_url: env_parsed("DATABASE_URL", DEFAULT_DATABASE_URL.to_string()),
            redis_url: env_parsed("REDIS_URL", DEFAULT_REDIS_URL.to_string()),
            jwt_secret,
            jwt_expiration_hours: env_parsed("JWT_EXPIRATION_HOURS", DEFAULT_JWT_EXPIRATION_HOURS),
            session_cookie_secure: env_parsed("SESSION_COOKIE_SECURE", false),
        }
    }

    /// Build a configuration directly (tests and embedding).
    pub fn new(database_url: String, redis_url: String, jwt_secret: String) -> Self {
        Self {
            database_url,
            redis_url,
            jwt_secret,
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            session_cookie_secure: false,
        }
    }

    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    pub fn session_ttl_seconds(&self) -> u64 {
        (self.jwt_expiration_hours * SECONDS_PER_HOUR).max(0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_secrets() {
        let config = Config::new(
            "postgres://u:p@localhost/db".to_string(),
            "redis://localhost".to_string(),
            "a-very-long-secret-that-is-over-32-chars".to_string(),
        );
        let printed = format!("{:?}", config);
        assert!(!printed.contains("a-very-long-secret"));
        assert!(!printed.contains("u:p@localhost"));
        assert!(printed.contains("[REDACTED]"));
    }

    #[test]
    fn session_ttl_follows_jwt_expiration() {
        let mut config = Config::new(String::new(), String::new(), String::new());
        config.jwt_expiration_hours = 2;
        assert_eq!(config.session_ttl_seconds(), 7200);

        config.jwt_expiration_hours = -1;
        assert_eq!(config.session_ttl_seconds(), 0);
    }

    #[test]
    fn unset_variable_uses_default() {
        assert_eq!(env_parsed("SOCIAL_NETWORK_TEST_UNSET_VAR", 42u16), 42);
    }
}
