/// Factory: build upstream clients from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::identity::{IdentityError, KeycloakVerifier, TokenVerifier};
use crate::services::mautic::{MauticClient, MauticError};

pub fn build_token_verifier(config: &Config) -> Result<Arc<dyn TokenVerifier>, IdentityError> {
    let verifier = KeycloakVerifier::new(&config.keycloak, config.upstream_timeout)?;

    Ok(Arc::new(verifier))
}

pub fn build_mautic_client(config: &Config) -> Result<Arc<MauticClient>, MauticError> {
    let client = MauticClient::new(&config.mautic, config.upstream_timeout)?;

    Ok(Arc::new(client))
}
