use actix_web::HttpServer;
use repurpose_api::{
    AppState, ServerConfig, SweepConfig, create_app, logging::init_tracing, spawn_sweeper,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let server_config = ServerConfig::from_env();
    init_tracing(server_config.log_format)?;

    // One state for all workers: limiters must share their stores
    let state = AppState::from_env()?;
    let sweep_config = SweepConfig::from_env();

    let sweeper = spawn_sweeper(
        state.registry.limiters(),
        sweep_config.interval(),
        Some(state.metrics.clone()),
    );

    tracing::info!(
        bind_address = %server_config.bind_address,
        default_limit = state.default_limiter.config().limit,
        default_window_ms = state.default_limiter.config().window_ms,
        policies = state.registry.len(),
        "Server starting"
    );

    let result = HttpServer::new(move || create_app(state.clone()))
        .bind(&server_config.bind_address)?
        .run()
        .await;

    sweeper.abort();
    tracing::info!("Server stopped");

    result
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};
    use repurpose_api::{health, version};

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(App::new().route("/api/health", web::get().to(health))).await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());

        let body = test::read_body(resp).await;
        let body_str = std::str::from_utf8(&body).unwrap();
        assert!(body_str.contains("healthy"));
    }

    #[actix_web::test]
    async fn test_version_without_limiter() {
        let app = test::init_service(App::new().route("/api/version", web::get().to(version))).await;

        let req = test::TestRequest::get().uri("/api/version").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        assert!(resp.headers().get("x-ratelimit-remaining").is_none());

        let body = test::read_body(resp).await;
        let body_str = std::str::from_utf8(&body).unwrap();
        assert!(body_str.contains("version"));
        assert!(body_str.contains("commit"));
        assert!(body_str.contains("build_time"));
    }
}
