//! Per-client-IP request rate limiting backed by `governor`.

use crate::errors::AppError;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use core_config::rate_limit::RateLimitConfig;
use governor::{
    DefaultKeyedRateLimiter, Quota, RateLimiter,
    clock::{Clock, DefaultClock},
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Keyed limiter allowing `max_requests` per `window` for each client address.
///
/// The whole allowance is available as a burst and refills at one request
/// per `window`, so any `max_requests + 1` admitted requests span at least
/// one full window.
#[derive(Clone)]
pub struct IpRateLimiter {
    limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
    clock: DefaultClock,
}

impl IpRateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        let burst = NonZeroU32::new(config.max_requests).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(config.window)
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);

        Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
            clock: DefaultClock::default(),
        }
    }

    /// Admit one request from `ip`, or return how long it has to wait.
    pub fn check(&self, ip: IpAddr) -> Result<(), Duration> {
        self.limiter
            .check_key(&ip)
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }

    /// Drop state for clients whose allowance has fully refilled.
    pub fn retain_recent(&self) {
        self.limiter.retain_recent();
    }

    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

/// Peer address from `ConnectInfo`, or a shared bucket when the server was
/// not started with `into_make_service_with_connect_info`.
fn client_ip(req: &Request) -> IpAddr {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Axum middleware rejecting over-limit clients with 429 and `Retry-After`.
///
/// ```ignore
/// use axum::middleware;
/// use axum_helpers::http::{IpRateLimiter, rate_limit_middleware};
///
/// let limiter = IpRateLimiter::new(&config.rate_limit);
/// let app = Router::new()
///     .route("/items", get(list))
///     .layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
/// ```
pub async fn rate_limit_middleware(
    State(limiter): State<IpRateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    let ip = client_ip(&req);

    match limiter.check(ip) {
        Ok(()) => next.run(req).await,
        Err(wait) => {
            tracing::debug!(client = %ip, wait_ms = wait.as_millis() as u64, "Request rejected by rate limiter");
            let retry_after_secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
            AppError::TooManyRequests {
                retry_after_secs: retry_after_secs.max(1),
            }
            .into_response()
        }
    }
}

/// Spawn a task that prunes idle client state every `interval`.
pub fn spawn_limiter_cleanup(limiter: IpRateLimiter, interval: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            limiter.retain_recent();
            tracing::trace!(clients = limiter.tracked_clients(), "Pruned rate limiter state");
        }
    })
}
