/// Authentication API routes
use crate::{
    error::{Result, ServerError},
    middleware::{AuthenticatedUser, AUTH_COOKIE},
    state::AppState,
};
use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use mixtape_core::{CreateUser, Role, User};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginData {
    pub user: User,
    pub token: String,
}

fn auth_cookie(token: &str, max_age_secs: i64) -> String {
    format!("{AUTH_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

fn clear_auth_cookie() -> String {
    format!("{AUTH_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// POST /api/auth/register
/// Create an account and sign the caller in
pub async fn register(
    State(app_state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    if req.username.trim().len() < 3 {
        return Err(ServerError::BadRequest(
            "username must be at least 3 characters".to_string(),
        ));
    }
    if !req.email.contains('@') {
        return Err(ServerError::BadRequest("invalid email address".to_string()));
    }
    if req.password.len() < 8 {
        return Err(ServerError::BadRequest(
            "password must be at least 8 characters".to_string(),
        ));
    }

    let password_hash = app_state.auth_service.hash_password(&req.password)?;

    let user = mixtape_storage::users::create(
        &app_state.pool,
        CreateUser {
            username: req.username.trim().to_string(),
            email: req.email,
            role: Role::User,
        },
        &password_hash,
    )
    .await?;

    let token = app_state.auth_service.create_token(user.id, user.role)?;
    let cookie = auth_cookie(&token, app_state.auth_service.token_max_age_secs());

    Ok((
        StatusCode::CREATED,
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(json!({ "success": true, "data": LoginData { user, token } })),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let invalid = || ServerError::Auth("Invalid username or password".to_string());

    let user = mixtape_storage::users::find_by_username(&app_state.pool, &req.username)
        .await?
        .ok_or_else(invalid)?;

    let password_hash = mixtape_storage::users::get_password_hash(&app_state.pool, user.id)
        .await?
        .ok_or_else(invalid)?;

    if !app_state
        .auth_service
        .verify_password(&req.password, &password_hash)?
    {
        return Err(invalid());
    }

    let token = app_state.auth_service.create_token(user.id, user.role)?;
    let cookie = auth_cookie(&token, app_state.auth_service.token_max_age_secs());

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(json!({ "success": true, "data": LoginData { user, token } })),
    ))
}

/// POST /api/auth/logout
/// Clears the auth cookie
pub async fn logout() -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, clear_auth_cookie())]),
        Json(json!({ "success": true, "data": { "message": "Logged out" } })),
    )
}

/// GET /api/auth/me
/// The currently authenticated user
pub async fn me(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<User>> {
    let user = mixtape_storage::users::get_by_id(&app_state.pool, auth.user_id())
        .await?
        .ok_or_else(|| ServerError::Auth("Account no longer exists".to_string()))?;

    Ok(Json(user))
}
