//! Mautic client error types.

/// Errors from Mautic API calls.
#[derive(Debug, thiserror::Error)]
pub enum MauticError {
    /// Client could not be constructed.
    #[error("mautic client setup failed: {0}")]
    Setup(String),
    /// Connection / timeout / body read failure.
    #[error("Mautic HTTP request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        source: reqwest::Error,
    },
    /// Mautic refused the service account (401/403).
    #[error("Mautic rejected credentials for {endpoint} ({status})")]
    Rejected { endpoint: &'static str, status: u16 },
    /// Any other non-2xx status.
    #[error("Mautic {endpoint} returned {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },
    /// Body was not the JSON we expect.
    #[error("Decode failed for {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        source: serde_json::Error,
    },
    /// Contact search matched more than one contact.
    #[error("email matches {count} contacts")]
    AmbiguousContact { count: usize },
}
