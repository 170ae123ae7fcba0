//! CORS response headers for the browser frontend.
//!
//! Note:
//! - tower-http's `CorsLayer` refuses `Allow-Origin: *` together with
//!   `Allow-Credentials: true`; the frontend contract needs both, so the headers are set
//!   directly with `SetResponseHeaderLayer`.
//! - Preflight (`OPTIONS`) is answered by the auth gate; this layer only decorates responses.
//!
//! Responsibility:
//! - Every response of a wrapped route (success, error, preflight) carries the same headers.
//! - `Content-Type: application/json` unless the response already set one.

use axum::http::header::{self, HeaderValue};
use axum::routing::MethodRouter;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;

pub const ALLOWED_HEADERS: &str = "Content-Type, Authorization, Email";
pub const ALLOWED_METHODS: &str = "POST, GET, OPTIONS, PUT, DELETE";
// Keep in sync with `handlers::segments::CONTACT_ID_HEADER`
pub const EXPOSED_HEADERS: &str = "X-Contact-Id";

/// Apply the CORS / content-type headers to the given route.
pub fn apply<S>(route: MethodRouter<S>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    let headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ))
        // Browsers hide non-safelisted response headers unless exposed
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_EXPOSE_HEADERS,
            HeaderValue::from_static(EXPOSED_HEADERS),
        ));

    route.layer(headers)
}
