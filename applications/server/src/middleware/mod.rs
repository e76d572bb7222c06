/// Server middleware
pub mod auth;

pub use auth::{auth_middleware, AuthenticatedUser, AUTH_COOKIE};
