pub mod keycloak;
pub mod types;
pub mod verifier;

pub use keycloak::KeycloakVerifier;
pub use types::VerifiedCaller;
pub use verifier::{IdentityError, TokenVerifier};
