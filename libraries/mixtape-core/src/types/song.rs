//! Song types

use super::{album::AlbumId, artist::ArtistId};
use serde::{Deserialize, Serialize};

pub type SongId = i64;

/// A song in the catalog
///
/// Songs have an independent lifecycle; playlists reference them but never
/// own them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub duration_seconds: i64,
    pub artist_id: ArtistId,
    pub album_id: Option<AlbumId>,
    pub created_at: String,
    pub updated_at: String,

    /// Denormalized fields for display
    pub artist_name: Option<String>,
    pub album_title: Option<String>,
}

/// Data for creating a new song
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSong {
    pub title: String,
    pub duration_seconds: i64,
    pub artist_id: ArtistId,
    pub album_id: Option<AlbumId>,
}

/// Data for updating a song (all fields optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateSong {
    pub title: Option<String>,
    pub duration_seconds: Option<i64>,
    pub artist_id: Option<ArtistId>,
    pub album_id: Option<Option<AlbumId>>,
}
