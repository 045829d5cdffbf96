//! Security headers middleware.
//!
//! Adds security-related HTTP headers to all responses.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;

/// Security header names.
pub mod headers {
    pub const X_CONTENT_TYPE_OPTIONS: &str = "x-content-type-options";
    pub const X_FRAME_OPTIONS: &str = "x-frame-options";
    pub const X_XSS_PROTECTION: &str = "x-xss-protection";
}

const HSTS_VALUE: &str = "max-age=31536000; includeSubDomains";

/// Middleware that adds security headers to all responses.
///
/// Headers added:
/// - `X-Content-Type-Options: nosniff`
/// - `X-Frame-Options: DENY`
/// - `X-XSS-Protection: 1; mode=block`
/// - `Strict-Transport-Security`, only when `security.hsts_enabled` is set.
///   Enable it only behind proper TLS termination.
pub async fn security_headers_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;
    apply(response.headers_mut(), state.config.security.hsts_enabled);
    response
}

fn apply(headers: &mut header::HeaderMap, hsts_enabled: bool) {
    headers.insert(
        header::HeaderName::from_static(headers::X_CONTENT_TYPE_OPTIONS),
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::HeaderName::from_static(headers::X_FRAME_OPTIONS),
        HeaderValue::from_static("DENY"),
    );
    headers.insert(
        header::HeaderName::from_static(headers::X_XSS_PROTECTION),
        HeaderValue::from_static("1; mode=block"),
    );
    if hsts_enabled {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(HSTS_VALUE),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;

    #[test]
    fn test_headers_without_hsts() {
        let mut map = HeaderMap::new();
        apply(&mut map, false);
        assert_eq!(map[headers::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(map[headers::X_FRAME_OPTIONS], "DENY");
        assert_eq!(map[headers::X_XSS_PROTECTION], "1; mode=block");
        assert!(map.get(header::STRICT_TRANSPORT_SECURITY).is_none());
    }

    #[test]
    fn test_headers_with_hsts() {
        let mut map = HeaderMap::new();
        apply(&mut map, true);
        assert_eq!(map[header::STRICT_TRANSPORT_SECURITY], HSTS_VALUE);
    }

    #[test]
    fn test_existing_header_is_overwritten() {
        let mut map = HeaderMap::new();
        map.insert(
            header::HeaderName::from_static(headers::X_FRAME_OPTIONS),
            HeaderValue::from_static("SAMEORIGIN"),
        );
        apply(&mut map, false);
        assert_eq!(map[headers::X_FRAME_OPTIONS], "DENY");
    }
}
