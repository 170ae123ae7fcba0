/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - token verifier (Keycloak), Mautic client
 * - Clone 前提で持つ (内部は Arc)
 * - Nothing in here is mutated after startup
 */
use std::sync::Arc;

use crate::services::{identity::TokenVerifier, mautic::MauticClient};

#[derive(Clone, Debug)]
pub struct AppState {
    pub verifier: Arc<dyn TokenVerifier>,
    pub mautic: Arc<MauticClient>,
}

impl AppState {
    pub fn new(verifier: Arc<dyn TokenVerifier>, mautic: Arc<MauticClient>) -> Self {
        Self { verifier, mautic }
    }
}
