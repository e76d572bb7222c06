//! Song catalog vertical slice, including the song/tag many-to-many.

use mixtape_core::{
    error::Result, CreateSong, MixtapeError, Song, SongId, Tag, TagId, UpdateSong,
};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

const SONG_SELECT: &str = r#"
    SELECT s.id, s.title, s.duration_seconds, s.artist_id, s.album_id,
           s.created_at, s.updated_at,
           ar.name AS artist_name,
           al.title AS album_title
    FROM songs s
    INNER JOIN artists ar ON s.artist_id = ar.id
    LEFT JOIN albums al ON s.album_id = al.id
"#;

fn song_from_row(row: &SqliteRow) -> Song {
    Song {
        id: row.get("id"),
        title: row.get("title"),
        duration_seconds: row.get("duration_seconds"),
        artist_id: row.get("artist_id"),
        album_id: row.get("album_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        artist_name: row.get("artist_name"),
        album_title: row.get("album_title"),
    }
}

/// List songs, optionally filtered by a search term over title, artist
/// and album names
pub async fn get_all(pool: &SqlitePool, search: Option<&str>) -> Result<Vec<Song>> {
    let rows = match search {
        Some(query) => {
            let pattern = format!("%{}%", query);
            sqlx::query(&format!(
                "{SONG_SELECT} WHERE s.title LIKE ? OR ar.name LIKE ? OR al.title LIKE ? ORDER BY s.title"
            ))
            .bind(&pattern)
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query(&format!("{SONG_SELECT} ORDER BY s.title"))
                .fetch_all(pool)
                .await?
        }
    };

    Ok(rows.iter().map(song_from_row).collect())
}

pub async fn get_by_id(pool: &SqlitePool, id: SongId) -> Result<Option<Song>> {
    let row = sqlx::query(&format!("{SONG_SELECT} WHERE s.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| song_from_row(&row)))
}

async fn require_artist(pool: &SqlitePool, artist_id: i64) -> Result<()> {
    let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM artists WHERE id = ?")
        .bind(artist_id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(MixtapeError::not_found("Artist", artist_id));
    }
    Ok(())
}

async fn require_album(pool: &SqlitePool, album_id: i64) -> Result<()> {
    let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM albums WHERE id = ?")
        .bind(album_id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(MixtapeError::not_found("Album", album_id));
    }
    Ok(())
}

pub async fn create(pool: &SqlitePool, song: CreateSong) -> Result<Song> {
    if song.duration_seconds <= 0 {
        return Err(MixtapeError::invalid_input("duration must be positive"));
    }
    require_artist(pool, song.artist_id).await?;
    if let Some(album_id) = song.album_id {
        require_album(pool, album_id).await?;
    }

    let result = sqlx::query(
        "INSERT INTO songs (title, duration_seconds, artist_id, album_id) VALUES (?, ?, ?, ?)",
    )
    .bind(&song.title)
    .bind(song.duration_seconds)
    .bind(song.artist_id)
    .bind(song.album_id)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| MixtapeError::storage("Failed to retrieve created song"))
}

pub async fn update(pool: &SqlitePool, id: SongId, changes: UpdateSong) -> Result<Song> {
    let Some(mut song) = get_by_id(pool, id).await? else {
        return Err(MixtapeError::not_found("Song", id));
    };

    if let Some(title) = changes.title {
        song.title = title;
    }
    if let Some(duration_seconds) = changes.duration_seconds {
        if duration_seconds <= 0 {
            return Err(MixtapeError::invalid_input("duration must be positive"));
        }
        song.duration_seconds = duration_seconds;
    }
    if let Some(artist_id) = changes.artist_id {
        require_artist(pool, artist_id).await?;
        song.artist_id = artist_id;
    }
    if let Some(album_id) = changes.album_id {
        if let Some(album_id) = album_id {
            require_album(pool, album_id).await?;
        }
        song.album_id = album_id;
    }

    sqlx::query(
        "UPDATE songs SET title = ?, duration_seconds = ?, artist_id = ?, album_id = ?,
                updated_at = datetime('now')
         WHERE id = ?",
    )
    .bind(&song.title)
    .bind(song.duration_seconds)
    .bind(song.artist_id)
    .bind(song.album_id)
    .bind(id)
    .execute(pool)
    .await?;

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| MixtapeError::storage("Failed to retrieve updated song"))
}

/// Delete a song. Refused while the song is a member of any playlist, so
/// deletion can never punch a gap into a playlist's ordering.
pub async fn delete(pool: &SqlitePool, id: SongId) -> Result<()> {
    let member_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM playlist_songs WHERE song_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await?;
    if member_count > 0 {
        return Err(MixtapeError::conflict("song is used in playlists"));
    }

    let result = sqlx::query("DELETE FROM songs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(MixtapeError::not_found("Song", id));
    }

    Ok(())
}

/// Attach a tag to a song
pub async fn add_tag(pool: &SqlitePool, song_id: SongId, tag_id: TagId) -> Result<()> {
    let song_exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM songs WHERE id = ?")
        .bind(song_id)
        .fetch_optional(pool)
        .await?;
    if song_exists.is_none() {
        return Err(MixtapeError::not_found("Song", song_id));
    }

    let tag_exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM tags WHERE id = ?")
        .bind(tag_id)
        .fetch_optional(pool)
        .await?;
    if tag_exists.is_none() {
        return Err(MixtapeError::not_found("Tag", tag_id));
    }

    let already: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM song_tags WHERE song_id = ? AND tag_id = ?")
            .bind(song_id)
            .bind(tag_id)
            .fetch_optional(pool)
            .await?;
    if already.is_some() {
        return Err(MixtapeError::conflict("tag already attached to song"));
    }

    sqlx::query("INSERT INTO song_tags (song_id, tag_id) VALUES (?, ?)")
        .bind(song_id)
        .bind(tag_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Detach a tag from a song
pub async fn remove_tag(pool: &SqlitePool, song_id: SongId, tag_id: TagId) -> Result<()> {
    let result = sqlx::query("DELETE FROM song_tags WHERE song_id = ? AND tag_id = ?")
        .bind(song_id)
        .bind(tag_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(MixtapeError::not_found("SongTag", tag_id));
    }

    Ok(())
}

/// Tags attached to a song
pub async fn get_tags(pool: &SqlitePool, song_id: SongId) -> Result<Vec<Tag>> {
    let rows = sqlx::query(
        r#"
        SELECT t.id, t.name, t.created_at
        FROM tags t
        INNER JOIN song_tags st ON t.id = st.tag_id
        WHERE st.song_id = ?
        ORDER BY t.name
        "#,
    )
    .bind(song_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| Tag {
            id: row.get("id"),
            name: row.get("name"),
            created_at: row.get("created_at"),
        })
        .collect())
}

/// Songs carrying a given tag
pub async fn get_by_tag(pool: &SqlitePool, tag_id: TagId) -> Result<Vec<Song>> {
    let rows = sqlx::query(&format!(
        "{SONG_SELECT} INNER JOIN song_tags st ON s.id = st.song_id WHERE st.tag_id = ? ORDER BY s.title"
    ))
    .bind(tag_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(song_from_row).collect())
}
