/*
 * Responsibility
 * - URL 構造を定義 (/health, /segments)
 * - /segments は auth gate + CORS headers で包む (route 単位で適用)
 */
use axum::{Router, routing::get};

use crate::api::handlers::{health::health, segments::list_segments};
use crate::middleware::{auth::gate, cors};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let segments = cors::apply(gate::apply(get(list_segments), state));

    Router::new()
        .route("/health", get(health))
        .route("/segments", segments)
}
