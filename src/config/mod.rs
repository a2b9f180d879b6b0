use crate::core::{AppError, Result};
use serde::Deserialize;
use std::env;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub outbox: OutboxConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

/// Token issuance settings for the admin session model
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_ttl_seconds: i64,
    pub refresh_ttl_days: i64,
}

/// Notification outbox delivery loop settings
#[derive(Debug, Clone, Deserialize)]
pub struct OutboxConfig {
    pub poll_interval_seconds: u64,
    pub batch_size: i64,
    pub max_attempts: i32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET")
                    .map_err(|_| AppError::Configuration("JWT_SECRET not set".to_string()))?,
                access_ttl_seconds: env::var("JWT_ACCESS_TTL_SECONDS")
                    .unwrap_or_else(|_| "900".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid JWT_ACCESS_TTL_SECONDS".to_string())
                    })?,
                refresh_ttl_days: env::var("JWT_REFRESH_TTL_DAYS")
                    .unwrap_or_else(|_| "7".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid JWT_REFRESH_TTL_DAYS".to_string())
                    })?,
            },
            outbox: OutboxConfig {
                poll_interval_seconds: env::var("OUTBOX_POLL_INTERVAL_SECONDS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid OUTBOX_POLL_INTERVAL_SECONDS".to_string())
                    })?,
                batch_size: env::var("OUTBOX_BATCH_SIZE")
                    .unwrap_or_else(|_| "50".to_string())
                    .parse()
                    .map_err(|_| AppError::Configuration("Invalid OUTBOX_BATCH_SIZE".to_string()))?,
                max_attempts: env::var("OUTBOX_MAX_ATTEMPTS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid OUTBOX_MAX_ATTEMPTS".to_string())
                    })?,
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.jwt.secret.len() < 32 {
            return Err(AppError::Configuration(
                "JWT_SECRET must be at least 32 characters".to_string(),
            ));
        }

        if self.jwt.access_ttl_seconds <= 0 || self.jwt.refresh_ttl_days <= 0 {
            return Err(AppError::Configuration(
                "Token TTLs must be greater than 0".to_string(),
            ));
        }

        if self.outbox.batch_size <= 0 || self.outbox.max_attempts <= 0 {
            return Err(AppError::Configuration(
                "Outbox batch size and max attempts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
