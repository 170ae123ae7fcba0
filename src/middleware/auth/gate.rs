//! Auth gate for `/segments`: bearer token introspection → VerifiedCaller を extensions に入れる
//!
//! Order:
//! 1. `OPTIONS` (CORS preflight) → 204, never reaches the handler
//!    Other methods without a handler go straight to the 405 fallback
//! 2. `Authorization: Bearer <token>` syntax → 400 on failure
//! 3. `Email` header syntax → 400 on failure (checked here so no upstream call is made)
//! 4. Token introspection via `TokenVerifier` → 401 on failure
//!
//! Nothing is cached: every request is verified against the identity provider.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
};

use crate::api::extractors::parse_email_header;
use crate::error::AppError;
use crate::state::AppState;

/// Wrap a route with the auth gate.
///
/// Applied on the `MethodRouter` (not the whole Router) so the 405 fallback of the route
/// is wrapped too; that is what lets `OPTIONS` be answered here.
pub fn apply(route: MethodRouter<AppState>, state: AppState) -> MethodRouter<AppState> {
    route.layer(middleware::from_fn_with_state(state, gate_middleware))
}

async fn gate_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == Method::OPTIONS {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    // Only GET/HEAD have a handler; the route's own fallback answers 405.
    if req.method() != Method::GET && req.method() != Method::HEAD {
        return Ok(next.run(req).await);
    }

    let token = bearer_token(req.headers())?;
    parse_email_header(req.headers())?;

    let caller = match state.verifier.verify(&token).await {
        Ok(caller) => caller,
        Err(err) => {
            tracing::warn!(
                provider = state.verifier.provider_name(),
                error = %err,
                "bearer token rejected"
            );
            return Err(err.into());
        }
    };

    tracing::debug!(
        subject = caller.subject.as_deref().unwrap_or("-"),
        client_id = caller.client_id.as_deref().unwrap_or("-"),
        "bearer token active"
    );

    // middleware → handler への受け渡し
    req.extensions_mut().insert(caller);

    Ok(next.run(req).await)
}

/// `Authorization` must be exactly two whitespace-separated fields: `Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let invalid = || {
        AppError::bad_request(
            "INVALID_AUTHORIZATION_HEADER",
            "Invalid authorization header",
        )
    };

    let raw = match headers.get(header::AUTHORIZATION) {
        Some(value) => value.to_str().map_err(|_| invalid())?,
        None => "",
    };

    let mut fields = raw.split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => {
            Ok(token.to_string())
        }
        _ => Err(invalid()),
    }
}
