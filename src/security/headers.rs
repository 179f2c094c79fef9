//! Security headers for HTTP responses
//!
//! Every API response is JSON, so the strictest policies apply everywhere.

use warp::http::header::{HeaderMap, HeaderValue};

/// Strict Content Security Policy for API endpoints
const STRICT_CSP: &str = "default-src 'none'; frame-ancestors 'none';";

const PERMISSIONS_POLICY: &str =
    "geolocation=(), microphone=(), camera=(), payment=(), usb=(), magnetometer=(), gyroscope=(), accelerometer=()";

/// Headers added to every API response
pub fn api_security_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();

    // Prevent clickjacking
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));

    // Prevent MIME type sniffing
    headers.insert("X-Content-Type-Options", HeaderValue::from_static("nosniff"));

    // Responses may carry tokens; never let them leak through referrers or caches
    headers.insert("Referrer-Policy", HeaderValue::from_static("no-referrer"));
    headers.insert(
        "Cache-Control",
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );

    headers.insert("Content-Security-Policy", HeaderValue::from_static(STRICT_CSP));
    headers.insert("Permissions-Policy", HeaderValue::from_static(PERMISSIONS_POLICY));

    headers
}
