pub mod auth;
pub mod security_headers;

pub use auth::{auth_state, AuthMiddleware, TokenVerifier};
pub use security_headers::SecurityHeaders;
