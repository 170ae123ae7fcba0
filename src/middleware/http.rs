//! Outer middleware stack shared by every route of the gateway.
//!
//! Layers, outermost first:
//! - errors from the inner layers become status codes (timeout → 408)
//! - `x-request-id` is taken from the caller or generated, and echoed back
//! - request bodies are capped; the gateway only serves GET so anything large is refused
//! - the whole request, Keycloak and Mautic round trips included, runs under one deadline
//! - per-request spans for the access log
//!
//! When the deadline fires the handler future is dropped, which also drops any in-flight
//! Keycloak / Mautic call.

use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::http::{StatusCode, header::HeaderName};
use tower::timeout::{TimeoutLayer, error::Elapsed};
use tower::{BoxError, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

// No route takes a body; headers-only requests fit easily.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Wrap `router` with the gateway's HTTP stack. `request_timeout` bounds each request.
pub fn apply(router: Router, request_timeout: Duration) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let layers = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(middleware_error_status))
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http());

    router.layer(layers)
}

async fn middleware_error_status(err: BoxError) -> StatusCode {
    if err.is::<Elapsed>() {
        tracing::warn!("request exceeded the gateway deadline");
        return StatusCode::REQUEST_TIMEOUT;
    }

    tracing::error!(error = %err, "unhandled middleware error");
    StatusCode::INTERNAL_SERVER_ERROR
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    use super::*;

    fn ping_app(timeout: Duration) -> Router {
        apply(
            Router::new()
                .route("/ping", get(|| async { "pong" }))
                .route(
                    "/slow",
                    get(|| async {
                        tokio::time::sleep(Duration::from_secs(5)).await;
                        "late"
                    }),
                ),
            timeout,
        )
    }

    #[tokio::test]
    async fn request_id_is_generated_and_propagated() {
        let app = ping_app(Duration::from_secs(5));

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/ping")
                    .header(REQUEST_ID_HEADER, "req-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-123");
    }

    #[tokio::test]
    async fn slow_handlers_time_out() {
        let response = ping_app(Duration::from_millis(50))
            .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn oversized_bodies_are_refused() {
        let response = ping_app(Duration::from_secs(5))
            .oneshot(
                Request::builder()
                    .uri("/ping")
                    .header("content-length", (MAX_BODY_BYTES + 1).to_string())
                    .body(Body::from(vec![b'x'; MAX_BODY_BYTES + 1]))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
