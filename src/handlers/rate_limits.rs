//! Rate limit policy listing.

use crate::{
    models::{RateLimitPolicyStatus, RateLimitStatusResponse},
    services::RateLimiterRegistry,
};
use actix_web::{Error, HttpRequest, Result, web};
use paperclip::actix::api_v2_operation;

/// Rate limit policy listing
///
/// Lists every registered policy with its quota and the number of counters
/// it currently holds. Counts include expired windows the sweeper has not
/// evicted yet.
#[api_v2_operation(
    summary = "Rate Limit Policies",
    description = "Lists configured rate limit policies and the number of tracked counters.",
    tags("Rate Limiting"),
    responses(
        (status = 200, description = "Successful response", body = RateLimitStatusResponse),
        (status = 503, description = "No rate limiters registered")
    )
)]
pub async fn rate_limit_status(req: HttpRequest) -> Result<web::Json<RateLimitStatusResponse>, Error> {
    let registry = req
        .app_data::<web::Data<RateLimiterRegistry>>()
        .ok_or_else(|| actix_web::error::ErrorServiceUnavailable("Rate limiting not configured"))?;

    let policies = registry
        .limiters()
        .iter()
        .map(|limiter| {
            let config = limiter.config();
            RateLimitPolicyStatus {
                policy: limiter.name().to_string(),
                limit: config.limit,
                window_ms: config.window_ms,
                tracked_keys: limiter.store().len() as u64,
            }
        })
        .collect();

    Ok(web::Json(RateLimitStatusResponse { policies }))
}
