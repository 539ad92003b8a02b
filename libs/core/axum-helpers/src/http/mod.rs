//! HTTP middleware module.
//!
//! - Per-client-IP rate limiting
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::http::{IpRateLimiter, rate_limit_middleware};
//!
//! let app = Router::new()
//!     .layer(axum::middleware::from_fn_with_state(
//!         IpRateLimiter::new(&config.rate_limit),
//!         rate_limit_middleware,
//!     ));
//! ```

pub mod rate_limit;

pub use rate_limit::{IpRateLimiter, rate_limit_middleware, spawn_limiter_cleanup};
