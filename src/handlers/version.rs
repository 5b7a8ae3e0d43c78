//! Version information endpoint handler.

use crate::{
    models::VersionResponse,
    services::rate_limit::{RATE_LIMIT_REMAINING_HEADER, RateLimiter, check_request},
    utils::build_info,
};
use actix_web::{Error, HttpRequest, HttpResponse, Result, web};
use paperclip::actix::api_v2_operation;

/// Version information endpoint
///
/// Returns the current API version, commit hash, and build time.
/// Guarded inline by the default rate limiter when one is registered.
#[api_v2_operation(
    summary = "Version Information Endpoint",
    description = "Returns the current API version, commit hash, and build time.",
    tags("Version"),
    responses(
        (status = 200, description = "Successful response", body = VersionResponse),
        (status = 429, description = "Too Many Requests", body = ErrorResponse)
    )
)]
pub async fn version(req: HttpRequest) -> Result<HttpResponse, Error> {
    let mut remaining = None;

    if let Some(limiter) = req.app_data::<web::Data<RateLimiter>>() {
        match check_request(&req, limiter) {
            Ok(decision) => remaining = Some(decision.remaining),
            Err(rejection) => return Ok(rejection),
        }
    }

    let body = VersionResponse {
        version: build_info::VERSION.to_string(),
        commit: build_info::GIT_SHA.to_string(),
        build_time: build_info::BUILD_TIMESTAMP.to_string(),
    };

    let mut response = HttpResponse::Ok();
    if let Some(remaining) = remaining {
        response.insert_header((RATE_LIMIT_REMAINING_HEADER, remaining.to_string()));
    }

    Ok(response.json(body))
}
