//! OpenAPI specification generation and app factory.

use crate::{
    handlers::{get_metrics, health, rate_limit_status, version},
    middleware::{MetricsMiddleware, RequestIdMiddleware},
    state::AppState,
};
use actix_web::App;
use paperclip::actix::{OpenApiExt, web};
use paperclip::v2::models::{DefaultApiRaw, Info};

/// Creates the shared OpenAPI specification for the API
pub fn create_openapi_spec() -> DefaultApiRaw {
    DefaultApiRaw {
        info: Info {
            title: "Repurpose API".into(),
            version: "1.0.0".into(),
            description: Some(
                "Backend API of the content repurposing dashboard.\n\n\
                ## Rate Limiting\n\
                Guarded endpoints allow a fixed number of requests per client and path \
                within a fixed window. The client is identified by the full \
                `X-Forwarded-For` value, then `X-Real-IP`.\n\
                \n\
                **Admitted responses:**\n\
                - `X-RateLimit-Remaining`: requests left in the current window\n\
                \n\
                **Rejected responses (429):**\n\
                - Body: `{\"error\": \"Too many requests. Please try again later.\"}`\n\
                - `Retry-After`: whole seconds until the window resets (rounded up)\n\
                - `X-RateLimit-Reset`: window end in milliseconds since the Unix epoch\n\
                \n\
                **Configuration:**\n\
                - `RATE_LIMIT_LIMIT` / `RATE_LIMIT_WINDOW_MS`: default quota (60 per 60000 ms)\n\
                - `RATE_LIMIT_SWEEP_INTERVAL_MS`: eviction interval for expired counters"
                    .into(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Creates the app around shared state
///
/// The app carries:
/// - Health, version, rate limit listing and metrics endpoints
/// - OpenAPI specification at `/api/spec/v2`
/// - Request ID and metrics middleware
///
/// `state` must be built once and cloned per worker so every worker counts
/// against the same limiter stores.
pub fn create_app(
    state: AppState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let metrics_endpoint = state.metrics_config.endpoint.clone();

    App::new()
        .wrap(RequestIdMiddleware)
        .wrap(MetricsMiddleware)
        .wrap_api_with_spec(create_openapi_spec())
        .app_data(web::Data::from(state.default_limiter))
        .app_data(web::Data::new(state.registry))
        .app_data(web::Data::new(state.metrics_config))
        .app_data(web::Data::new(state.metrics))
        .service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api/version").route(web::get().to(version)))
        .service(web::resource("/api/rate-limits").route(web::get().to(rate_limit_status)))
        .service(web::resource(metrics_endpoint.as_str()).route(web::get().to(get_metrics)))
        .with_json_spec_at("/api/spec/v2")
        .build()
}
