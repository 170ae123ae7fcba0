//! Shared fixtures for router-level tests: one wiremock server plays both Keycloak and Mautic.
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::{KeycloakConfig, MauticConfig};
use crate::services::identity::KeycloakVerifier;
use crate::services::mautic::MauticClient;
use crate::state::AppState;

pub const TOKEN_PATH: &str = "/realms/marketing/protocol/openid-connect/token";
pub const INTROSPECT_PATH: &str = "/realms/marketing/protocol/openid-connect/token/introspect";

pub fn state_for(server: &MockServer) -> AppState {
    let base_url = Url::parse(&format!("{}/", server.uri())).unwrap();
    state_with(server, base_url)
}

/// Keycloak on `identity`, Mautic at `mautic_url`.
pub fn state_with(identity: &MockServer, mautic_url: Url) -> AppState {
    let verifier = KeycloakVerifier::new(
        &KeycloakConfig {
            base_url: Url::parse(&format!("{}/", identity.uri())).unwrap(),
            realm: "marketing".to_string(),
            client_id: "segments-gateway".to_string(),
            client_secret: "s3cret".to_string(),
        },
        Duration::from_secs(5),
    )
    .unwrap();

    let mautic = MauticClient::new(
        &MauticConfig {
            base_url: mautic_url,
            username: "api-user".to_string(),
            password: "api-password".to_string(),
            page_size: 100,
        },
        Duration::from_secs(5),
    )
    .unwrap();

    AppState::new(Arc::new(verifier), Arc::new(mautic))
}

/// Base URL on a local port nothing listens on (bound, then released).
pub fn closed_port_url() -> Url {
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    Url::parse(&format!("http://{addr}/")).unwrap()
}

/// Client login always succeeds; introspection answers with `active`.
pub async fn mount_identity(server: &MockServer, active: bool) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "service-token",
            "expires_in": 300,
            "token_type": "Bearer"
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(INTROSPECT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "active": active,
            "username": "alice"
        })))
        .mount(server)
        .await;
}

pub fn segment_json(id: i64, name: &str) -> serde_json::Value {
    json!({
        "isPublished": true,
        "dateAdded": "2021-03-01T10:15:00+00:00",
        "dateModified": "2021-03-02T09:00:00+00:00",
        "createdBy": 1,
        "createdByUser": "Admin User",
        "modifiedBy": 1,
        "modifiedByUser": "Admin User",
        "id": id,
        "name": name,
        "alias": name.to_lowercase().replace(' ', "-"),
        "description": null,
        "filters": [],
        "isGlobal": false,
        "isPreferenceCenter": false
    })
}
