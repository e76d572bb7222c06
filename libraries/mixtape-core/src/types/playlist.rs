//! Playlist and membership types

use super::{song::SongId, user::UserId};
use serde::{Deserialize, Serialize};

pub type PlaylistId = i64;

/// Playlist owned by a single user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub is_public: bool,
    pub owner_id: UserId,
    pub created_at: String,
    pub updated_at: String,

    /// Songs in playlist (optional, populated when requested)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub songs: Option<Vec<PlaylistSong>>,
}

/// Data for creating a new playlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylist {
    pub name: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub is_public: bool,
    pub owner_id: UserId,
}

/// Data for updating a playlist (all fields optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdatePlaylist {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub cover_url: Option<Option<String>>,
    pub is_public: Option<bool>,
}

/// Membership record: a song belongs to a playlist at a specific position
///
/// Positions are 1-based and dense: for a playlist with N members the
/// positions are exactly 1..=N, no gaps, no duplicates. A (playlist, song)
/// pair appears at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistSong {
    pub id: i64,
    pub playlist_id: PlaylistId,
    pub song_id: SongId,
    pub position: i64,
    pub added_at: String,

    /// Denormalized fields for display
    pub title: Option<String>,
    pub artist_name: Option<String>,
    pub duration_seconds: Option<i64>,
}

/// A user following another user's public playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistFollow {
    pub playlist_id: PlaylistId,
    pub user_id: UserId,
    pub followed_at: String,
}
