//! HTTP middleware and request extractors

pub mod auth;
pub mod security_headers;

pub use auth::{AuthError, Guarded, Principal};
pub use security_headers::security_headers;
