/// API route modules
pub mod admin;
pub mod albums;
pub mod artists;
pub mod auth;
pub mod health;
pub mod playlists;
pub mod songs;
pub mod tags;
