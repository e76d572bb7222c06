/// Song catalog API routes
use crate::{error::Result, error::ServerError, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use mixtape_core::{CreateSong, Role, Song, SongId, Tag, TagId, UpdateSong};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct SongsQuery {
    pub search: Option<String>,
}

/// GET /api/songs
/// List songs, optionally filtered by ?search=
pub async fn list_songs(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
    Query(query): Query<SongsQuery>,
) -> Result<Json<Vec<Song>>> {
    let songs = mixtape_storage::songs::get_all(&app_state.pool, query.search.as_deref()).await?;
    Ok(Json(songs))
}

/// GET /api/songs/:id
pub async fn get_song(
    Path(id): Path<SongId>,
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
) -> Result<Json<Song>> {
    let song = mixtape_storage::songs::get_by_id(&app_state.pool, id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Song not found".to_string()))?;

    Ok(Json(song))
}

/// GET /api/songs/:id/tags
pub async fn get_song_tags(
    Path(id): Path<SongId>,
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
) -> Result<Json<Vec<Tag>>> {
    mixtape_storage::songs::get_by_id(&app_state.pool, id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Song not found".to_string()))?;

    let tags = mixtape_storage::songs::get_tags(&app_state.pool, id).await?;
    Ok(Json(tags))
}

/// POST /api/songs
/// Add a song to the catalog (manager back office)
pub async fn create_song(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreateSong>,
) -> Result<impl IntoResponse> {
    auth.require_role(Role::Manager)?;

    let song = mixtape_storage::songs::create(&app_state.pool, req).await?;
    Ok((StatusCode::CREATED, Json(song)))
}

/// PUT /api/songs/:id
/// Update a song (manager back office)
pub async fn update_song(
    Path(id): Path<SongId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(changes): Json<UpdateSong>,
) -> Result<Json<Song>> {
    auth.require_role(Role::Manager)?;

    let song = mixtape_storage::songs::update(&app_state.pool, id, changes).await?;
    Ok(Json(song))
}

/// DELETE /api/songs/:id
/// Remove a song from the catalog (manager back office)
pub async fn delete_song(
    Path(id): Path<SongId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    auth.require_role(Role::Manager)?;

    mixtape_storage::songs::delete(&app_state.pool, id).await?;
    Ok(Json(
        json!({ "success": true, "data": { "message": "Song deleted" } }),
    ))
}

/// PUT /api/songs/:id/tags/:tag_id
/// Attach a tag to a song (manager back office)
pub async fn add_song_tag(
    Path((id, tag_id)): Path<(SongId, TagId)>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    auth.require_role(Role::Manager)?;

    mixtape_storage::songs::add_tag(&app_state.pool, id, tag_id).await?;
    Ok(Json(
        json!({ "success": true, "data": { "message": "Tag attached" } }),
    ))
}

/// DELETE /api/songs/:id/tags/:tag_id
/// Detach a tag from a song (manager back office)
pub async fn remove_song_tag(
    Path((id, tag_id)): Path<(SongId, TagId)>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    auth.require_role(Role::Manager)?;

    mixtape_storage::songs::remove_tag(&app_state.pool, id, tag_id).await?;
    Ok(Json(
        json!({ "success": true, "data": { "message": "Tag detached" } }),
    ))
}
