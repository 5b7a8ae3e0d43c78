//! Rate limit guard middleware.

use crate::services::rate_limit::{RateLimiter, check_request};
use actix_web::{
    Error,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderName, HeaderValue},
};
use std::{
    future::{Ready, ready},
    pin::Pin,
    sync::Arc,
};

/// Rate limit guard factory
///
/// Wraps a resource or scope so every request is checked against `limiter`
/// before the inner service runs. Rejected requests never reach the inner
/// service; admitted responses gain an `X-RateLimit-Remaining` header.
pub struct RateLimitGuard {
    limiter: Arc<RateLimiter>,
}

impl RateLimitGuard {
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitGuardService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitGuardService {
            service,
            limiter: Arc::clone(&self.limiter),
        }))
    }
}

/// The actual rate limit guard service
pub struct RateLimitGuardService<S> {
    service: S,
    limiter: Arc<RateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let decision = match check_request(req.request(), &self.limiter) {
            Ok(decision) => decision,
            Err(rejection) => {
                let res = req.into_response(rejection).map_into_right_body();
                return Box::pin(async move { Ok(res) });
            }
        };

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;

            res.headers_mut().insert(
                HeaderName::from_static("x-ratelimit-remaining"),
                HeaderValue::from(decision.remaining),
            );

            Ok(res.map_into_left_body())
        })
    }
}
