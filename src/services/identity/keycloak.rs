//! Keycloak-backed token verifier.
//!
//! Every call does a fresh confidential-client login followed by token introspection.
//! Nothing is cached between requests.
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::config::KeycloakConfig;
use crate::services::http_client::{body_excerpt, build_client};
use crate::services::identity::types::{
    IdentitySession, TokenIntrospectionResult, VerifiedCaller,
};
use crate::services::identity::verifier::{IdentityError, TokenVerifier};

#[derive(Clone)]
pub struct KeycloakVerifier {
    http: reqwest::Client,
    realm: String,
    client_id: String,
    client_secret: String,
    token_url: Url,
    introspect_url: Url,
}

impl std::fmt::Debug for KeycloakVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print the client secret
        f.debug_struct("KeycloakVerifier")
            .field("realm", &self.realm)
            .field("client_id", &self.client_id)
            .field("token_url", &self.token_url.as_str())
            .finish()
    }
}

impl KeycloakVerifier {
    pub fn new(config: &KeycloakConfig, timeout: Duration) -> Result<Self, IdentityError> {
        let http = build_client(timeout).map_err(|e| IdentityError::Setup(e.to_string()))?;

        let token_url = realm_endpoint(&config.base_url, &config.realm, &["token"])?;
        let introspect_url =
            realm_endpoint(&config.base_url, &config.realm, &["token", "introspect"])?;

        Ok(Self {
            http,
            realm: config.realm.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token_url,
            introspect_url,
        })
    }

    /// Step 1: authenticate as the confidential client.
    async fn login_client(&self) -> Result<IdentitySession, IdentityError> {
        let response = self
            .http
            .post(self.token_url.clone())
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| IdentityError::Login(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IdentityError::Login(format!(
                "{} {}",
                status,
                body_excerpt(&body)
            )));
        }

        response
            .json::<IdentitySession>()
            .await
            .map_err(|e| IdentityError::Login(e.to_string()))
    }

    /// Step 2: ask the provider whether `token` is active.
    async fn introspect(&self, token: &str) -> Result<TokenIntrospectionResult, IdentityError> {
        let response = self
            .http
            .post(self.introspect_url.clone())
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("token_type_hint", "requesting_party_token"),
                ("token", token),
            ])
            .send()
            .await
            .map_err(|e| IdentityError::Introspection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IdentityError::Introspection(format!(
                "{} {}",
                status,
                body_excerpt(&body)
            )));
        }

        response
            .json::<TokenIntrospectionResult>()
            .await
            .map_err(|e| IdentityError::Introspection(e.to_string()))
    }
}

#[async_trait]
impl TokenVerifier for KeycloakVerifier {
    fn provider_name(&self) -> &'static str {
        "keycloak"
    }

    async fn verify(&self, token: &str) -> Result<VerifiedCaller, IdentityError> {
        let session = self.login_client().await?;
        tracing::debug!(realm = %self.realm, ?session, "keycloak client login succeeded");

        let result = self.introspect(token).await?;
        if !result.is_active() {
            return Err(IdentityError::Inactive);
        }

        Ok(result.into())
    }
}

/// `{base}/realms/{realm}/protocol/openid-connect/{suffix..}` with the realm percent-encoded.
fn realm_endpoint(base: &Url, realm: &str, suffix: &[&str]) -> Result<Url, IdentityError> {
    let mut url = base.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| IdentityError::Setup(format!("invalid provider url: {}", base)))?;
        segments
            .pop_if_empty()
            .extend(["realms", realm, "protocol", "openid-connect"])
            .extend(suffix);
    }
    Ok(url)
}
