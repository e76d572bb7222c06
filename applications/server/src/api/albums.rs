/// Album catalog API routes
use crate::{error::Result, error::ServerError, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use mixtape_core::{Album, AlbumId, ArtistId, CreateAlbum, Role};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct AlbumsQuery {
    pub artist_id: Option<ArtistId>,
}

/// GET /api/albums
/// List albums, optionally filtered by ?artist_id=
pub async fn list_albums(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
    Query(query): Query<AlbumsQuery>,
) -> Result<Json<Vec<Album>>> {
    let albums = match query.artist_id {
        Some(artist_id) => mixtape_storage::albums::get_by_artist(&app_state.pool, artist_id).await?,
        None => mixtape_storage::albums::get_all(&app_state.pool).await?,
    };
    Ok(Json(albums))
}

/// GET /api/albums/:id
pub async fn get_album(
    Path(id): Path<AlbumId>,
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
) -> Result<Json<Album>> {
    let album = mixtape_storage::albums::get_by_id(&app_state.pool, id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Album not found".to_string()))?;

    Ok(Json(album))
}

/// POST /api/albums
/// Create an album (manager back office)
pub async fn create_album(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreateAlbum>,
) -> Result<impl IntoResponse> {
    auth.require_role(Role::Manager)?;

    if req.title.trim().is_empty() {
        return Err(ServerError::BadRequest(
            "album title must not be empty".to_string(),
        ));
    }

    let album = mixtape_storage::albums::create(&app_state.pool, req).await?;
    Ok((StatusCode::CREATED, Json(album)))
}

/// PUT /api/albums/:id
/// Update an album (manager back office)
pub async fn update_album(
    Path(id): Path<AlbumId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreateAlbum>,
) -> Result<Json<Album>> {
    auth.require_role(Role::Manager)?;

    let album = mixtape_storage::albums::update(&app_state.pool, id, req).await?;
    Ok(Json(album))
}

/// DELETE /api/albums/:id
/// Delete an album (manager back office); fails while songs reference it
pub async fn delete_album(
    Path(id): Path<AlbumId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    auth.require_role(Role::Manager)?;

    mixtape_storage::albums::delete(&app_state.pool, id).await?;
    Ok(Json(
        json!({ "success": true, "data": { "message": "Album deleted" } }),
    ))
}
