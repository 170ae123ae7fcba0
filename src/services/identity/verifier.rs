//! Token verifier interface used by the auth gate.
use async_trait::async_trait;
use thiserror::Error;

use crate::services::identity::types::VerifiedCaller;

/// Identity-layer errors.
///
/// Kept independent from `AppError`; every variant ends the request as 401.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity client setup failed: {0}")]
    Setup(String),
    #[error("identity provider login failed: {0}")]
    Login(String),
    #[error("token introspection failed: {0}")]
    Introspection(String),
    #[error("token is not active")]
    Inactive,
}

/// Confirms that a bearer token is currently active.
///
/// Implementations hold their provider settings (realm, client credentials) from
/// construction time and must not keep any per-token state between calls.
#[async_trait]
pub trait TokenVerifier: std::fmt::Debug + Send + Sync + 'static {
    // Provider name (for logging).
    fn provider_name(&self) -> &'static str;

    // Returns the caller described by the introspection response when the token is active.
    async fn verify(&self, token: &str) -> Result<VerifiedCaller, IdentityError>;
}
