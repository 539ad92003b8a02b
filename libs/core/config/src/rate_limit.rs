use crate::{env_parse_or_default, ConfigError, FromEnv};
use std::time::Duration;

pub const DEFAULT_WINDOW_MS: u64 = 900_000;
pub const DEFAULT_MAX_REQUESTS: u32 = 100;

/// Per-client request ceiling: at most `max_requests` within `window`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
}

impl RateLimitConfig {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_WINDOW_MS), DEFAULT_MAX_REQUESTS)
    }
}

impl FromEnv for RateLimitConfig {
    /// Reads:
    /// - RATE_LIMIT_WINDOW_MS: defaults to 900000 (15 minutes)
    /// - RATE_LIMIT_MAX_REQUESTS: defaults to 100
    ///
    /// Both must be greater than zero.
    fn from_env() -> Result<Self, ConfigError> {
        let window_ms: u64 = env_parse_or_default("RATE_LIMIT_WINDOW_MS", DEFAULT_WINDOW_MS)?;
        let max_requests: u32 =
            env_parse_or_default("RATE_LIMIT_MAX_REQUESTS", DEFAULT_MAX_REQUESTS)?;

        if window_ms == 0 {
            return Err(ConfigError::ParseError {
                key: "RATE_LIMIT_WINDOW_MS".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }
        if max_requests == 0 {
            return Err(ConfigError::ParseError {
                key: "RATE_LIMIT_MAX_REQUESTS".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }

        Ok(Self::new(Duration::from_millis(window_ms), max_requests))
    }
}
