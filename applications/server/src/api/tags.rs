/// Tag API routes
use crate::{error::Result, error::ServerError, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use mixtape_core::{CreateTag, Role, Song, Tag, TagId};
use serde_json::json;

/// GET /api/tags
pub async fn list_tags(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
) -> Result<Json<Vec<Tag>>> {
    let tags = mixtape_storage::tags::get_all(&app_state.pool).await?;
    Ok(Json(tags))
}

/// GET /api/tags/:id/songs
/// Songs carrying a tag
pub async fn get_tag_songs(
    Path(id): Path<TagId>,
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
) -> Result<Json<Vec<Song>>> {
    mixtape_storage::tags::get_by_id(&app_state.pool, id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Tag not found".to_string()))?;

    let songs = mixtape_storage::songs::get_by_tag(&app_state.pool, id).await?;
    Ok(Json(songs))
}

/// POST /api/tags
/// Create a tag (manager back office)
pub async fn create_tag(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreateTag>,
) -> Result<impl IntoResponse> {
    auth.require_role(Role::Manager)?;

    if req.name.trim().is_empty() {
        return Err(ServerError::BadRequest(
            "tag name must not be empty".to_string(),
        ));
    }

    let tag = mixtape_storage::tags::create(&app_state.pool, req).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// DELETE /api/tags/:id
/// Delete a tag (manager back office)
pub async fn delete_tag(
    Path(id): Path<TagId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    auth.require_role(Role::Manager)?;

    mixtape_storage::tags::delete(&app_state.pool, id).await?;
    Ok(Json(
        json!({ "success": true, "data": { "message": "Tag deleted" } }),
    ))
}
