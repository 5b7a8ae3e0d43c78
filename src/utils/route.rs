//! Route identity and route pattern extraction.

use actix_web::HttpRequest;

/// Route half of a rate limit key: the literal request path
pub fn route_identity(req: &HttpRequest) -> String {
    req.path().to_string()
}

/// Extract the matched route pattern for metric labels
///
/// Uses the registered resource pattern when the router matched one, so
/// path parameters don't explode label cardinality. Unmatched requests are
/// grouped under `/unknown`.
pub fn extract_route_pattern(req: &HttpRequest) -> String {
    req.match_pattern()
        .unwrap_or_else(|| "/unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_route_identity_is_path_without_query() {
        let req = TestRequest::get()
            .uri("/api/videos?page=2")
            .to_http_request();
        assert_eq!(route_identity(&req), "/api/videos");
    }

    #[test]
    fn test_unmatched_route_pattern() {
        let req = TestRequest::get().uri("/nowhere").to_http_request();
        assert_eq!(extract_route_pattern(&req), "/unknown");
    }
}
