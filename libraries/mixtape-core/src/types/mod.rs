mod album;
mod artist;
mod playlist;
mod song;
mod tag;
mod user;

pub use album::{Album, AlbumId, CreateAlbum};
pub use artist::{Artist, ArtistId, CreateArtist};
pub use playlist::{
    CreatePlaylist, Playlist, PlaylistFollow, PlaylistId, PlaylistSong, UpdatePlaylist,
};
pub use song::{CreateSong, Song, SongId, UpdateSong};
pub use tag::{CreateTag, Tag, TagId};
pub use user::{CreateUser, Role, User, UserId};
