/*
 * Responsibility
 * - The single ApiError type returned by middleware and handlers
 * - IntoResponse: HTTP status + JSON error body, mapped in one place
 * - Convert identity / Mautic errors into the HTTP taxonomy
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::identity::IdentityError;
use crate::services::mautic::MauticError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },
    #[error("email matches {count} contacts")]
    AmbiguousContact { count: usize },
    #[error("bad gateway: {message}")]
    BadGateway { message: String },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::AmbiguousContact { .. } => StatusCode::CONFLICT,
            AppError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match self {
            AppError::BadRequest { code, message } => (code, message),
            AppError::Unauthorized { message } => ("UNAUTHORIZED", message),
            AppError::AmbiguousContact { count } => (
                "AMBIGUOUS_CONTACT",
                format!("email matches {count} contacts, expected exactly one"),
            ),
            AppError::BadGateway { message } => ("BAD_GATEWAY", message),
            AppError::Internal => ("INTERNAL_SERVER_ERROR", "internal server error".into()),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<IdentityError> for AppError {
    fn from(e: IdentityError) -> Self {
        match e {
            // Misconfigured client is our problem, not the caller's token
            IdentityError::Setup(_) => AppError::Internal,
            IdentityError::Login(_) | IdentityError::Introspection(_) | IdentityError::Inactive => {
                AppError::unauthorized(e.to_string())
            }
        }
    }
}

impl From<MauticError> for AppError {
    fn from(e: MauticError) -> Self {
        match e {
            MauticError::Transport { .. } | MauticError::Rejected { .. } => {
                AppError::unauthorized(e.to_string())
            }
            MauticError::Status { .. } | MauticError::Decode { .. } => AppError::BadGateway {
                message: e.to_string(),
            },
            MauticError::AmbiguousContact { count } => AppError::AmbiguousContact { count },
            MauticError::Setup(_) => AppError::Internal,
        }
    }
}
