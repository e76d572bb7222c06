//! Mixtape Core
//!
//! Domain types and error handling for the Mixtape playlist server.
//!
//! This crate is the shared vocabulary between the storage layer and the
//! HTTP application: entity types, the request payload types used to create
//! and update them, and the unified `MixtapeError` taxonomy that both layers
//! propagate unchanged to the HTTP boundary.

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{MixtapeError, Result};

// Export all types
pub use types::{
    // User and access control
    CreateUser, Role, User, UserId,
    // Catalog (i64-based IDs)
    Album, AlbumId, Artist, ArtistId, CreateAlbum, CreateArtist, CreateSong, CreateTag, Song,
    SongId, Tag, TagId, UpdateSong,
    // Playlists and membership
    CreatePlaylist, Playlist, PlaylistFollow, PlaylistId, PlaylistSong, UpdatePlaylist,
};
