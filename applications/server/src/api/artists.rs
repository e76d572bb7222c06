/// Artist catalog API routes
use crate::{error::Result, error::ServerError, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use mixtape_core::{Artist, ArtistId, CreateArtist, Role};
use serde_json::json;

/// GET /api/artists
pub async fn list_artists(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
) -> Result<Json<Vec<Artist>>> {
    let artists = mixtape_storage::artists::get_all(&app_state.pool).await?;
    Ok(Json(artists))
}

/// GET /api/artists/:id
pub async fn get_artist(
    Path(id): Path<ArtistId>,
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
) -> Result<Json<Artist>> {
    let artist = mixtape_storage::artists::get_by_id(&app_state.pool, id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Artist not found".to_string()))?;

    Ok(Json(artist))
}

/// POST /api/artists
/// Create an artist (manager back office)
pub async fn create_artist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreateArtist>,
) -> Result<impl IntoResponse> {
    auth.require_role(Role::Manager)?;

    if req.name.trim().is_empty() {
        return Err(ServerError::BadRequest(
            "artist name must not be empty".to_string(),
        ));
    }

    let artist = mixtape_storage::artists::create(&app_state.pool, req).await?;
    Ok((StatusCode::CREATED, Json(artist)))
}

/// PUT /api/artists/:id
/// Update an artist (manager back office)
pub async fn update_artist(
    Path(id): Path<ArtistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<CreateArtist>,
) -> Result<Json<Artist>> {
    auth.require_role(Role::Manager)?;

    let artist = mixtape_storage::artists::update(&app_state.pool, id, req).await?;
    Ok(Json(artist))
}

/// DELETE /api/artists/:id
/// Delete an artist (manager back office); fails while songs reference it
pub async fn delete_artist(
    Path(id): Path<ArtistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<serde_json::Value>> {
    auth.require_role(Role::Manager)?;

    mixtape_storage::artists::delete(&app_state.pool, id).await?;
    Ok(Json(
        json!({ "success": true, "data": { "message": "Artist deleted" } }),
    ))
}
