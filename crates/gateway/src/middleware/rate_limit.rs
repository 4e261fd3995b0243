//! Rate limiting middleware using token bucket algorithm

use aicif_common::AppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use governor::{
    clock::QuantaClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Rate limiter using governor crate
pub type GlobalRateLimiter = RateLimiter<NotKeyed, InMemoryState, QuantaClock>;

/// Limiter plus the configured rate, reported back on rejection
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<GlobalRateLimiter>,
    requests_per_second: u32,
}

/// Create a new rate limiter
///
/// A zero rate is raised to one; a zero burst falls back to the rate.
pub fn create_rate_limiter(requests_per_second: u32, burst: u32) -> RateLimit {
    let rate = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
    let burst = NonZeroU32::new(burst).unwrap_or(rate);

    RateLimit {
        limiter: Arc::new(RateLimiter::direct(Quota::per_second(rate).allow_burst(burst))),
        requests_per_second: rate.get(),
    }
}

/// Rate limiting middleware
pub async fn rate_limit_middleware(
    State(limit): State<RateLimit>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match limit.limiter.check() {
        Ok(_) => Ok(next.run(request).await),
        Err(_) => {
            tracing::warn!(path = %request.uri().path(), "Rate limit exceeded");
            Err(AppError::RateLimited {
                limit: limit.requests_per_second,
            })
        }
    }
}
