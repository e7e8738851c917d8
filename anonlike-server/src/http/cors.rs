//! Shared CORS header set
//!
//! Attached to every response of the like endpoint, preflight included.

use axum::http::{header, HeaderName};

/// Headers browsers need to call the endpoint from any origin.
pub fn headers() -> [(HeaderName, &'static str); 3] {
    [
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        (
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            "authorization, x-client-info, apikey, content-type",
        ),
        (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
    ]
}
