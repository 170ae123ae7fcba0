//! Shared outbound HTTP plumbing for upstream clients (Keycloak, Mautic).
use std::time::Duration;

/// Longest upstream body excerpt carried into error messages.
const BODY_EXCERPT_CHARS: usize = 200;

/// Build a pooled `reqwest::Client` with a per-request timeout.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
}

/// Shorten an upstream body so it can be logged / returned without flooding.
pub fn body_excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= BODY_EXCERPT_CHARS {
        return trimmed.to_string();
    }

    let mut excerpt: String = trimmed.chars().take(BODY_EXCERPT_CHARS).collect();
    excerpt.push_str("...");
    excerpt
}
