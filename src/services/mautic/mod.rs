pub mod client;
pub mod error;
pub mod types;

pub use client::MauticClient;
pub use error::MauticError;
pub use types::Segment;
