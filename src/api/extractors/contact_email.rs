/*
 * Responsibility
 * - `Email` request header -> ContactEmail
 * - exactly one whitespace-delimited token, otherwise 400
 */
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};

use crate::error::AppError;

pub const EMAIL_HEADER: &str = "email";

/// The contact email supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEmail(pub String);

/// Shared with the auth gate so a malformed header is rejected before any upstream call.
pub fn parse_email_header(headers: &HeaderMap) -> Result<ContactEmail, AppError> {
    let invalid = || {
        AppError::bad_request(
            "INVALID_EMAIL_HEADER",
            "Invalid Email header. Only one email is accepted",
        )
    };

    let raw = match headers.get(EMAIL_HEADER) {
        Some(value) => value.to_str().map_err(|_| invalid())?,
        None => "",
    };

    let mut fields = raw.split_whitespace();
    match (fields.next(), fields.next()) {
        (Some(email), None) => Ok(ContactEmail(email.to_string())),
        _ => Err(invalid()),
    }
}

impl<S> FromRequestParts<S> for ContactEmail
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parse_email_header(&parts.headers)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with(email: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(email) = email {
            headers.insert(EMAIL_HEADER, HeaderValue::from_static(email));
        }
        headers
    }

    #[test]
    fn single_email_is_accepted_and_trimmed() {
        let email = parse_email_header(&headers_with(Some("  alice@example.com "))).unwrap();
        assert_eq!(email, ContactEmail("alice@example.com".to_string()));
    }

    #[test]
    fn zero_or_many_tokens_are_rejected() {
        for value in [None, Some(""), Some("   "), Some("a@example.com b@example.com")] {
            let err = parse_email_header(&headers_with(value)).unwrap_err();
            assert!(
                matches!(err, AppError::BadRequest { code: "INVALID_EMAIL_HEADER", .. }),
                "{value:?} should be rejected"
            );
        }
    }
}
