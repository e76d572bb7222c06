/// Playlists API routes
use crate::{error::Result, error::ServerError, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use mixtape_core::{CreatePlaylist, Playlist, PlaylistId, SongId, UpdatePlaylist};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Deserialize)]
pub struct AddSongRequest {
    #[serde(rename = "songId")]
    pub song_id: SongId,
    pub order: Option<i64>,
}

/// GET /api/playlists
/// The authenticated user's own playlists
pub async fn list_playlists(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Playlist>>> {
    let playlists =
        mixtape_storage::playlists::get_user_playlists(&app_state.pool, auth.user_id()).await?;
    Ok(Json(playlists))
}

/// GET /api/playlists/public
/// Browse everyone's public playlists
pub async fn list_public_playlists(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
) -> Result<Json<Vec<Playlist>>> {
    let playlists = mixtape_storage::playlists::get_public(&app_state.pool).await?;
    Ok(Json(playlists))
}

/// GET /api/playlists/followed
/// Public playlists the user follows
pub async fn list_followed_playlists(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Playlist>>> {
    let playlists =
        mixtape_storage::playlists::get_followed(&app_state.pool, auth.user_id()).await?;
    Ok(Json(playlists))
}

/// POST /api/playlists
/// Create a new playlist
pub async fn create_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreatePlaylistRequest>,
) -> Result<impl IntoResponse> {
    if req.name.trim().is_empty() {
        return Err(ServerError::BadRequest(
            "playlist name must not be empty".to_string(),
        ));
    }

    let playlist = mixtape_storage::playlists::create(
        &app_state.pool,
        CreatePlaylist {
            name: req.name.trim().to_string(),
            description: req.description,
            cover_url: req.cover_url,
            is_public: req.is_public,
            owner_id: auth.user_id(),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(playlist)))
}

/// GET /api/playlists/:id
/// Get playlist details with songs in position order
pub async fn get_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Playlist>> {
    let playlist = mixtape_storage::playlists::get_with_songs(&app_state.pool, id, auth.user_id())
        .await?
        .ok_or_else(|| ServerError::NotFound("Playlist not found".to_string()))?;

    Ok(Json(playlist))
}

/// PUT /api/playlists/:id
/// Update playlist metadata (owner only)
pub async fn update_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(changes): Json<UpdatePlaylist>,
) -> Result<Json<Playlist>> {
    if let Some(name) = &changes.name {
        if name.trim().is_empty() {
            return Err(ServerError::BadRequest(
                "playlist name must not be empty".to_string(),
            ));
        }
    }

    let playlist =
        mixtape_storage::playlists::update(&app_state.pool, id, auth.user_id(), changes).await?;
    Ok(Json(playlist))
}

/// DELETE /api/playlists/:id
/// Delete a playlist (owner only)
pub async fn delete_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    mixtape_storage::playlists::delete(&app_state.pool, id, auth.user_id()).await?;
    Ok(Json(
        json!({ "success": true, "data": { "message": "Playlist deleted" } }),
    ))
}

/// POST /api/playlists/:id/songs
/// Add a song to a playlist at an optional 1-based position (owner only)
pub async fn add_song_to_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<AddSongRequest>,
) -> Result<impl IntoResponse> {
    let entry = mixtape_storage::playlists::add_song(
        &app_state.pool,
        id,
        req.song_id,
        req.order,
        auth.user_id(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": entry })),
    ))
}

/// DELETE /api/playlists/:id/songs/:song_id
/// Remove a song from a playlist (owner only)
pub async fn remove_song_from_playlist(
    Path((id, song_id)): Path<(PlaylistId, SongId)>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    mixtape_storage::playlists::remove_song(&app_state.pool, id, song_id, auth.user_id()).await?;

    Ok(Json(
        json!({ "success": true, "data": { "message": "Song removed from playlist" } }),
    ))
}

/// POST /api/playlists/:id/follow
/// Follow another user's public playlist
pub async fn follow_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    let follow = mixtape_storage::playlists::follow(&app_state.pool, id, auth.user_id()).await?;
    Ok(Json(json!({ "success": true, "data": follow })))
}

/// DELETE /api/playlists/:id/follow
/// Stop following a playlist
pub async fn unfollow_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    mixtape_storage::playlists::unfollow(&app_state.pool, id, auth.user_id()).await?;
    Ok(Json(
        json!({ "success": true, "data": { "message": "Playlist unfollowed" } }),
    ))
}
