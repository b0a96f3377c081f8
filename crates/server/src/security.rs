//! Response headers applied to every route

use axum::http::header::{self, HeaderName, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

pub const HSTS_POLICY: &str = "max-age=31536000; includeSubDomains";
pub const CSP_POLICY: &str = "default-src 'self'; \
    style-src 'self' 'unsafe-inline' https://cdn.jsdelivr.net; \
    script-src 'self' 'unsafe-inline'; \
    img-src 'self' data:; \
    font-src 'self' data:; \
    connect-src 'self'; \
    form-action 'self'; \
    frame-ancestors 'none'; \
    base-uri 'self'";
pub const PERMISSIONS_POLICY: &str = "geolocation=(), microphone=(), camera=()";

const PERMISSIONS_POLICY_HEADER: HeaderName = HeaderName::from_static("permissions-policy");

fn security_headers() -> [(HeaderName, HeaderValue); 7] {
    [
        (
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(HSTS_POLICY),
        ),
        (
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CSP_POLICY),
        ),
        (
            PERMISSIONS_POLICY_HEADER,
            HeaderValue::from_static(PERMISSIONS_POLICY),
        ),
        (
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ),
        (header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY")),
        (
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ),
        (
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ),
    ]
}

/// Wrap `router` so every response, errors and redirects included,
/// carries the security headers.
pub fn with_security_headers(router: Router) -> Router {
    security_headers()
        .into_iter()
        .fold(router, |router, (name, value)| {
            router.layer(SetResponseHeaderLayer::overriding(name, value))
        })
}
