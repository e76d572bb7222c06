//! Album types

use super::artist::ArtistId;
use serde::{Deserialize, Serialize};

pub type AlbumId = i64;

/// An album
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub title: String,
    pub artist_id: Option<ArtistId>,
    pub year: Option<i64>,
    pub cover_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,

    /// Denormalized for display
    pub artist_name: Option<String>,
}

/// Data for creating a new album
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAlbum {
    pub title: String,
    pub artist_id: Option<ArtistId>,
    pub year: Option<i64>,
    pub cover_url: Option<String>,
}
