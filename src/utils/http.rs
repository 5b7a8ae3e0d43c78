//! HTTP utility functions for extracting request information.

use actix_web::HttpRequest;

/// Identity used for requests that carry no proxy address header
pub const ANONYMOUS_CLIENT: &str = "anonymous";

/// Extract the client identity used to key rate limit counters
///
/// Takes the whole trimmed `X-Forwarded-For` value, then `X-Real-IP`, and
/// falls back to [`ANONYMOUS_CLIENT`]. The forwarded chain is not split, so
/// the same origin reaching the API through different proxies is counted
/// separately. Clients behind no proxy share one quota per route.
pub fn extract_client_identity(req: &HttpRequest) -> String {
    let ip_headers = ["X-Forwarded-For", "X-Real-IP"];

    for header_name in &ip_headers {
        if let Some(header_value) = req.headers().get(*header_name)
            && let Ok(header_str) = header_value.to_str()
        {
            let identity = header_str.trim();
            if !identity.is_empty() {
                return identity.to_string();
            }
        }
    }

    ANONYMOUS_CLIENT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_forwarded_for_keeps_whole_chain() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", " 203.0.113.7, 10.0.0.1 "))
            .insert_header(("X-Real-IP", "198.51.100.2"))
            .to_http_request();

        assert_eq!(extract_client_identity(&req), "203.0.113.7, 10.0.0.1");
    }

    #[test]
    fn test_different_proxy_chains_are_distinct() {
        let first = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .to_http_request();
        let second = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.2"))
            .to_http_request();

        assert_ne!(extract_client_identity(&first), extract_client_identity(&second));
    }

    #[test]
    fn test_real_ip_used_when_forwarded_for_missing() {
        let req = TestRequest::default()
            .insert_header(("X-Real-IP", "198.51.100.2"))
            .to_http_request();

        assert_eq!(extract_client_identity(&req), "198.51.100.2");
    }

    #[test]
    fn test_blank_forwarded_for_falls_through() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", " "))
            .insert_header(("X-Real-IP", "198.51.100.2"))
            .to_http_request();

        assert_eq!(extract_client_identity(&req), "198.51.100.2");
    }

    #[test]
    fn test_anonymous_fallback() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(extract_client_identity(&req), ANONYMOUS_CLIENT);
    }
}
