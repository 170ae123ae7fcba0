/*
 * Responsibility
 * - Request extractors used by handlers (and re-used by middleware for early checks)
 */
mod contact_email;

pub use contact_email::{ContactEmail, parse_email_header};
