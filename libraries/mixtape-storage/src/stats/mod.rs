//! Admin dashboard aggregates.
//!
//! A sequence of aggregate queries over the catalog and playlist tables;
//! nothing here mutates state.

use mixtape_core::error::Result;
use serde::Serialize;
use sqlx::{Row, SqlitePool};

/// Entity counts plus the most followed public playlists
#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub users: i64,
    pub artists: i64,
    pub albums: i64,
    pub songs: i64,
    pub tags: i64,
    pub playlists: i64,
    pub public_playlists: i64,
    pub follows: i64,
    pub top_playlists: Vec<TopPlaylist>,
}

/// A public playlist ranked by follower count
#[derive(Debug, Clone, Serialize)]
pub struct TopPlaylist {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub followers: i64,
}

async fn count(pool: &SqlitePool, sql: &str) -> Result<i64> {
    let n: i64 = sqlx::query_scalar(sql).fetch_one(pool).await?;
    Ok(n)
}

/// Collect the admin dashboard overview
pub async fn get_overview(pool: &SqlitePool) -> Result<Overview> {
    let users = count(pool, "SELECT COUNT(*) FROM users").await?;
    let artists = count(pool, "SELECT COUNT(*) FROM artists").await?;
    let albums = count(pool, "SELECT COUNT(*) FROM albums").await?;
    let songs = count(pool, "SELECT COUNT(*) FROM songs").await?;
    let tags = count(pool, "SELECT COUNT(*) FROM tags").await?;
    let playlists = count(pool, "SELECT COUNT(*) FROM playlists").await?;
    let public_playlists =
        count(pool, "SELECT COUNT(*) FROM playlists WHERE is_public = 1").await?;
    let follows = count(pool, "SELECT COUNT(*) FROM playlist_follows").await?;

    let top_rows = sqlx::query(
        r#"
        SELECT p.id, p.name, p.owner_id, COUNT(pf.user_id) AS followers
        FROM playlists p
        INNER JOIN playlist_follows pf ON p.id = pf.playlist_id
        WHERE p.is_public = 1
        GROUP BY p.id
        ORDER BY followers DESC, p.name
        LIMIT 5
        "#,
    )
    .fetch_all(pool)
    .await?;

    let top_playlists = top_rows
        .into_iter()
        .map(|row| TopPlaylist {
            id: row.get("id"),
            name: row.get("name"),
            owner_id: row.get("owner_id"),
            followers: row.get("followers"),
        })
        .collect();

    Ok(Overview {
        users,
        artists,
        albums,
        songs,
        tags,
        playlists,
        public_playlists,
        follows,
        top_playlists,
    })
}
