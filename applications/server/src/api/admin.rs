/// Admin API routes
use crate::{error::Result, error::ServerError, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use mixtape_core::{CreateUser, Role, User, UserId};
use mixtape_storage::stats::Overview;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

/// GET /api/admin/users
/// List all user accounts
pub async fn list_users(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<User>>> {
    auth.require_role(Role::Admin)?;

    let users = mixtape_storage::users::get_all(&app_state.pool).await?;
    Ok(Json(users))
}

/// POST /api/admin/users
/// Create a user account, optionally with an elevated role
pub async fn create_user(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse> {
    auth.require_role(Role::Admin)?;

    if req.password.len() < 8 {
        return Err(ServerError::BadRequest(
            "password must be at least 8 characters".to_string(),
        ));
    }

    let password_hash = app_state.auth_service.hash_password(&req.password)?;

    let user = mixtape_storage::users::create(
        &app_state.pool,
        CreateUser {
            username: req.username,
            email: req.email,
            role: req.role.unwrap_or(Role::User),
        },
        &password_hash,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /api/admin/users/:id/role
/// Change a user's role
pub async fn update_user_role(
    Path(id): Path<UserId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<UpdateRoleRequest>,
) -> Result<Json<User>> {
    auth.require_role(Role::Admin)?;

    if id == auth.user_id() {
        return Err(ServerError::Conflict(
            "cannot change your own role".to_string(),
        ));
    }

    let user = mixtape_storage::users::update_role(&app_state.pool, id, req.role).await?;
    Ok(Json(user))
}

/// DELETE /api/admin/users/:id
/// Delete a user account
pub async fn delete_user(
    Path(id): Path<UserId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    auth.require_role(Role::Admin)?;

    if id == auth.user_id() {
        return Err(ServerError::Conflict(
            "cannot delete your own account".to_string(),
        ));
    }

    mixtape_storage::users::delete(&app_state.pool, id).await?;
    Ok(Json(
        json!({ "success": true, "data": { "message": "User deleted" } }),
    ))
}

/// GET /api/admin/stats
/// Back office dashboard aggregates
pub async fn stats(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Overview>> {
    auth.require_role(Role::Manager)?;

    let overview = mixtape_storage::stats::get_overview(&app_state.pool).await?;
    Ok(Json(overview))
}
