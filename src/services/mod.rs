pub mod factory;
pub mod http_client;
pub mod identity;
pub mod mautic;
