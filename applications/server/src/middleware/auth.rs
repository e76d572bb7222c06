/// Authentication middleware
use crate::{error::ServerError, services::AuthService};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use mixtape_core::{Role, UserId};
use std::sync::Arc;

/// Name of the cookie carrying the signed token
pub const AUTH_COOKIE: &str = "mixtape_token";

/// Extension type to store the authenticated user in the request.
/// Can be used as an extractor in handlers.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Reject the request unless the user holds at least `required`
    pub fn require_role(&self, required: Role) -> Result<(), ServerError> {
        if self.role.meets(required) {
            Ok(())
        } else {
            Err(ServerError::Forbidden(format!(
                "{} role required",
                required.as_str()
            )))
        }
    }
}

/// Pull the token out of the Cookie header
fn token_from_cookies(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == AUTH_COOKIE).then(|| value.to_string())
    })
}

/// Fallback for clients without a cookie jar (CLI, tests)
fn token_from_bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

/// Middleware that extracts and validates the JWT from the auth cookie
/// (or an Authorization header), then stashes the acting user in the
/// request extensions.
pub async fn auth_middleware(
    State(auth_service): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let token = token_from_cookies(request.headers())
        .or_else(|| token_from_bearer(request.headers()))
        .ok_or_else(|| ServerError::Auth("Not authenticated".to_string()))?;

    let (user_id, role) = auth_service.verify_token(&token).map_err(|e| {
        tracing::warn!("Token verification failed: {}", e);
        ServerError::Auth("Invalid token".to_string())
    })?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser { user_id, role });

    Ok(next.run(request).await)
}

/// Implement FromRequestParts so AuthenticatedUser can be used as an extractor
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ServerError::Auth("Not authenticated".to_string()))
    }
}
