use serde::Deserialize;

/// Result of the client-credentials login. Lives for one `verify` call only.
#[derive(Clone, Deserialize)]
pub struct IdentitySession {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: String,
}

impl std::fmt::Debug for IdentitySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print the access token
        let access_token = if self.access_token.is_empty() {
            "<empty>"
        } else {
            "<redacted>"
        };
        f.debug_struct("IdentitySession")
            .field("access_token", &access_token)
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Introspection response (RFC 7662). Only `active` drives the decision.
///
/// A missing `active` flag is treated as inactive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenIntrospectionResult {
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
}

impl TokenIntrospectionResult {
    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(false)
    }
}

/// Caller information attached to request extensions by the auth gate.
///
/// Used for log correlation only; authorization decisions stop at "token is active".
#[derive(Debug, Clone, Default)]
pub struct VerifiedCaller {
    pub subject: Option<String>,
    pub username: Option<String>,
    pub client_id: Option<String>,
}

impl From<TokenIntrospectionResult> for VerifiedCaller {
    fn from(result: TokenIntrospectionResult) -> Self {
        Self {
            subject: result.sub,
            username: result.username,
            client_id: result.client_id,
        }
    }
}
