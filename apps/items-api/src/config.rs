//! Configuration for Items API

use core_config::{
    AppInfo, FromEnv, app_info, rate_limit::RateLimitConfig, server::ServerConfig,
    tracing::LogConfig,
};
use database::postgres::PostgresConfig;

pub use core_config::Environment;

/// Application configuration, read once at startup
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: PostgresConfig,
    pub rate_limit: RateLimitConfig,
    pub log: LogConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            database: PostgresConfig::from_env()?,
            rate_limit: RateLimitConfig::from_env()?,
            log: LogConfig::from_env()?,
        })
    }
}
