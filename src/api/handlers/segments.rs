/*
 * Responsibility
 * - GET /segments
 * - Sequencer: fetch the segment catalog, then resolve the caller-supplied email to a contact id
 * - Body is the segment list; the contact id (if any) goes out in `X-Contact-Id`
 * - Token verification already happened in the auth gate
 */
use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
};

use crate::{
    api::{dto::segments::SegmentAndId, extractors::ContactEmail},
    error::AppError,
    services::identity::VerifiedCaller,
    state::AppState,
};

pub const CONTACT_ID_HEADER: &str = "x-contact-id";

pub async fn list_segments(
    State(state): State<AppState>,
    Extension(caller): Extension<VerifiedCaller>,
    ContactEmail(email): ContactEmail,
) -> Result<Response, AppError> {
    let segments = state.mautic.fetch_segments().await.map_err(|err| {
        tracing::warn!(error = %err, "segment fetch failed");
        AppError::from(err)
    })?;

    let body: Vec<SegmentAndId> = segments.iter().map(SegmentAndId::from).collect();

    let contact_id = state
        .mautic
        .resolve_contact_id(&email)
        .await
        .map_err(|err| {
            tracing::warn!(error = %err, "contact resolution failed");
            AppError::from(err)
        })?;

    tracing::info!(
        username = caller.username.as_deref().unwrap_or("-"),
        segments = body.len(),
        contact_id = contact_id.as_deref().unwrap_or("-"),
        "segments served"
    );

    let mut response = Json(body).into_response();
    if let Some(id) = contact_id {
        match HeaderValue::from_str(&id) {
            Ok(value) => {
                response
                    .headers_mut()
                    .insert(HeaderName::from_static(CONTACT_ID_HEADER), value);
            }
            Err(_) => tracing::warn!(contact_id = %id, "contact id is not a valid header value"),
        }
    }

    Ok(response)
}
