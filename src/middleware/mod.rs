/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth gate (token introspection), CORS headers, HTTP infrastructure
 */
pub mod auth;
pub mod cors;
pub mod http;
