//! Playlists vertical slice: CRUD, ordered membership, follows.
//!
//! Membership positions are 1-based and dense per playlist (1..=N). Both
//! mutation paths (add at position, remove) renumber siblings inside a
//! single transaction; nothing else ever touches `position`.

use mixtape_core::{
    error::Result, CreatePlaylist, MixtapeError, Playlist, PlaylistFollow, PlaylistId,
    PlaylistSong, SongId, UpdatePlaylist, UserId,
};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};

fn playlist_from_row(row: &SqliteRow) -> Playlist {
    Playlist {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        cover_url: row.get("cover_url"),
        is_public: row.get::<i64, _>("is_public") != 0,
        owner_id: row.get("owner_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        songs: None,
    }
}

/// Resolve the playlist's owner; `NotFound` if the playlist is missing,
/// `PermissionDenied` if `user_id` is not the owner.
async fn require_owner(
    conn: &mut SqliteConnection,
    playlist_id: PlaylistId,
    user_id: UserId,
) -> Result<()> {
    let owner: Option<i64> = sqlx::query_scalar("SELECT owner_id FROM playlists WHERE id = ?")
        .bind(playlist_id)
        .fetch_optional(&mut *conn)
        .await?;

    match owner {
        None => Err(MixtapeError::not_found("Playlist", playlist_id)),
        Some(owner_id) if owner_id != user_id => Err(MixtapeError::permission_denied(
            "only the playlist owner may modify it",
        )),
        Some(_) => Ok(()),
    }
}

/// Get playlist by ID (visible to the owner, or to anyone if public)
pub async fn get_by_id(
    pool: &SqlitePool,
    id: PlaylistId,
    user_id: UserId,
) -> Result<Option<Playlist>> {
    let row = sqlx::query(
        r#"
        SELECT id, name, description, cover_url, is_public, owner_id, created_at, updated_at
        FROM playlists
        WHERE id = ? AND (owner_id = ? OR is_public = 1)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| playlist_from_row(&row)))
}

/// Get playlist with all songs in position order
pub async fn get_with_songs(
    pool: &SqlitePool,
    id: PlaylistId,
    user_id: UserId,
) -> Result<Option<Playlist>> {
    let Some(mut playlist) = get_by_id(pool, id, user_id).await? else {
        return Ok(None);
    };

    let song_rows = sqlx::query(
        r#"
        SELECT
            ps.id, ps.playlist_id, ps.song_id, ps.position, ps.added_at,
            s.title, s.duration_seconds,
            ar.name AS artist_name
        FROM playlist_songs ps
        INNER JOIN songs s ON ps.song_id = s.id
        INNER JOIN artists ar ON s.artist_id = ar.id
        WHERE ps.playlist_id = ?
        ORDER BY ps.position
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let songs = song_rows
        .into_iter()
        .map(|row| PlaylistSong {
            id: row.get("id"),
            playlist_id: row.get("playlist_id"),
            song_id: row.get("song_id"),
            position: row.get("position"),
            added_at: row.get("added_at"),
            title: Some(row.get("title")),
            artist_name: Some(row.get("artist_name")),
            duration_seconds: row.get("duration_seconds"),
        })
        .collect();

    playlist.songs = Some(songs);

    Ok(Some(playlist))
}

/// Get a user's own playlists, most recently updated first
pub async fn get_user_playlists(pool: &SqlitePool, user_id: UserId) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, description, cover_url, is_public, owner_id, created_at, updated_at
        FROM playlists
        WHERE owner_id = ?
        ORDER BY updated_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(playlist_from_row).collect())
}

/// Browse public playlists, newest first
pub async fn get_public(pool: &SqlitePool) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, description, cover_url, is_public, owner_id, created_at, updated_at
        FROM playlists
        WHERE is_public = 1
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(playlist_from_row).collect())
}

/// Create new playlist
pub async fn create(pool: &SqlitePool, playlist: CreatePlaylist) -> Result<Playlist> {
    let result = sqlx::query(
        r#"
        INSERT INTO playlists (name, description, cover_url, is_public, owner_id)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&playlist.name)
    .bind(&playlist.description)
    .bind(&playlist.cover_url)
    .bind(playlist.is_public)
    .bind(playlist.owner_id)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();

    get_by_id(pool, id, playlist.owner_id)
        .await?
        .ok_or_else(|| MixtapeError::storage("Failed to retrieve created playlist"))
}

/// Update playlist metadata (owner only)
pub async fn update(
    pool: &SqlitePool,
    id: PlaylistId,
    user_id: UserId,
    changes: UpdatePlaylist,
) -> Result<Playlist> {
    let mut conn = pool.acquire().await?;
    require_owner(&mut conn, id, user_id).await?;

    let mut playlist = get_by_id(pool, id, user_id)
        .await?
        .ok_or_else(|| MixtapeError::not_found("Playlist", id))?;

    if let Some(name) = changes.name {
        playlist.name = name;
    }
    if let Some(description) = changes.description {
        playlist.description = description;
    }
    if let Some(cover_url) = changes.cover_url {
        playlist.cover_url = cover_url;
    }
    if let Some(is_public) = changes.is_public {
        playlist.is_public = is_public;
    }

    sqlx::query(
        r#"
        UPDATE playlists
        SET name = ?, description = ?, cover_url = ?, is_public = ?, updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(&playlist.name)
    .bind(&playlist.description)
    .bind(&playlist.cover_url)
    .bind(playlist.is_public)
    .bind(id)
    .execute(pool)
    .await?;

    get_by_id(pool, id, user_id)
        .await?
        .ok_or_else(|| MixtapeError::storage("Failed to retrieve updated playlist"))
}

/// Delete playlist (owner only)
pub async fn delete(pool: &SqlitePool, id: PlaylistId, user_id: UserId) -> Result<()> {
    let mut conn = pool.acquire().await?;
    require_owner(&mut conn, id, user_id).await?;

    sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Add a song to a playlist at an optional 1-based position (owner only)
///
/// Without an explicit position the song is appended. Every sibling at or
/// after the target position shifts up by one, so positions stay dense.
/// Fails with `Conflict` if the song is already a member and with
/// `InvalidInput` if the position is outside 1..=N+1.
pub async fn add_song(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    song_id: SongId,
    position: Option<i64>,
    user_id: UserId,
) -> Result<PlaylistSong> {
    let mut tx = pool.begin().await?;

    require_owner(&mut tx, playlist_id, user_id).await?;

    let song_exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM songs WHERE id = ?")
        .bind(song_id)
        .fetch_optional(&mut *tx)
        .await?;
    if song_exists.is_none() {
        return Err(MixtapeError::not_found("Song", song_id));
    }

    let already_member: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM playlist_songs WHERE playlist_id = ? AND song_id = ?")
            .bind(playlist_id)
            .bind(song_id)
            .fetch_optional(&mut *tx)
            .await?;
    if already_member.is_some() {
        return Err(MixtapeError::conflict("song is already in the playlist"));
    }

    let member_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM playlist_songs WHERE playlist_id = ?")
            .bind(playlist_id)
            .fetch_one(&mut *tx)
            .await?;

    let target = position.unwrap_or(member_count + 1);
    if target < 1 || target > member_count + 1 {
        return Err(MixtapeError::invalid_input(format!(
            "position must be between 1 and {}",
            member_count + 1
        )));
    }

    // Shift members at or after the target up by one. The unique index on
    // (playlist_id, position) is checked per statement, so the shift goes
    // through negated values and flips back in a second statement.
    sqlx::query(
        "UPDATE playlist_songs SET position = -(position + 1)
         WHERE playlist_id = ? AND position >= ?",
    )
    .bind(playlist_id)
    .bind(target)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE playlist_songs SET position = -position WHERE playlist_id = ? AND position < 0")
        .bind(playlist_id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query(
        "INSERT INTO playlist_songs (playlist_id, song_id, position) VALUES (?, ?, ?)",
    )
    .bind(playlist_id)
    .bind(song_id)
    .bind(target)
    .execute(&mut *tx)
    .await?;

    let entry_id = result.last_insert_rowid();

    sqlx::query("UPDATE playlists SET updated_at = datetime('now') WHERE id = ?")
        .bind(playlist_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    get_entry(pool, entry_id)
        .await?
        .ok_or_else(|| MixtapeError::storage("Failed to retrieve created playlist entry"))
}

/// Remove a song from a playlist (owner only)
///
/// Members after the removed position shift down by one, restoring the
/// dense 1..=N-1 range.
pub async fn remove_song(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    song_id: SongId,
    user_id: UserId,
) -> Result<()> {
    let mut tx = pool.begin().await?;

    require_owner(&mut tx, playlist_id, user_id).await?;

    let removed_position: Option<i64> = sqlx::query_scalar(
        "SELECT position FROM playlist_songs WHERE playlist_id = ? AND song_id = ?",
    )
    .bind(playlist_id)
    .bind(song_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(removed_position) = removed_position else {
        return Err(MixtapeError::not_found("PlaylistSong", song_id));
    };

    sqlx::query("DELETE FROM playlist_songs WHERE playlist_id = ? AND song_id = ?")
        .bind(playlist_id)
        .bind(song_id)
        .execute(&mut *tx)
        .await?;

    // Same negate-then-flip shift as add_song, downwards this time.
    sqlx::query(
        "UPDATE playlist_songs SET position = -(position - 1)
         WHERE playlist_id = ? AND position > ?",
    )
    .bind(playlist_id)
    .bind(removed_position)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE playlist_songs SET position = -position WHERE playlist_id = ? AND position < 0")
        .bind(playlist_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE playlists SET updated_at = datetime('now') WHERE id = ?")
        .bind(playlist_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

/// Get a single membership record by its row ID
pub async fn get_entry(pool: &SqlitePool, entry_id: i64) -> Result<Option<PlaylistSong>> {
    let row = sqlx::query(
        r#"
        SELECT
            ps.id, ps.playlist_id, ps.song_id, ps.position, ps.added_at,
            s.title, s.duration_seconds,
            ar.name AS artist_name
        FROM playlist_songs ps
        INNER JOIN songs s ON ps.song_id = s.id
        INNER JOIN artists ar ON s.artist_id = ar.id
        WHERE ps.id = ?
        "#,
    )
    .bind(entry_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| PlaylistSong {
        id: row.get("id"),
        playlist_id: row.get("playlist_id"),
        song_id: row.get("song_id"),
        position: row.get("position"),
        added_at: row.get("added_at"),
        title: Some(row.get("title")),
        artist_name: Some(row.get("artist_name")),
        duration_seconds: row.get("duration_seconds"),
    }))
}

/// Follow another user's public playlist
pub async fn follow(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    user_id: UserId,
) -> Result<PlaylistFollow> {
    let row = sqlx::query("SELECT owner_id, is_public FROM playlists WHERE id = ?")
        .bind(playlist_id)
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        return Err(MixtapeError::not_found("Playlist", playlist_id));
    };

    if row.get::<i64, _>("owner_id") == user_id {
        return Err(MixtapeError::conflict("cannot follow your own playlist"));
    }
    if row.get::<i64, _>("is_public") == 0 {
        return Err(MixtapeError::permission_denied("playlist is private"));
    }

    let already: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM playlist_follows WHERE playlist_id = ? AND user_id = ?")
            .bind(playlist_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    if already.is_some() {
        return Err(MixtapeError::conflict("already following this playlist"));
    }

    sqlx::query("INSERT INTO playlist_follows (playlist_id, user_id) VALUES (?, ?)")
        .bind(playlist_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    let row = sqlx::query(
        "SELECT playlist_id, user_id, followed_at FROM playlist_follows
         WHERE playlist_id = ? AND user_id = ?",
    )
    .bind(playlist_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(PlaylistFollow {
        playlist_id: row.get("playlist_id"),
        user_id: row.get("user_id"),
        followed_at: row.get("followed_at"),
    })
}

/// Stop following a playlist
pub async fn unfollow(pool: &SqlitePool, playlist_id: PlaylistId, user_id: UserId) -> Result<()> {
    let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM playlists WHERE id = ?")
        .bind(playlist_id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(MixtapeError::not_found("Playlist", playlist_id));
    }

    let result = sqlx::query("DELETE FROM playlist_follows WHERE playlist_id = ? AND user_id = ?")
        .bind(playlist_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(MixtapeError::not_found("Follow", playlist_id));
    }

    Ok(())
}

/// Playlists the user follows, most recently followed first
pub async fn get_followed(pool: &SqlitePool, user_id: UserId) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT p.id, p.name, p.description, p.cover_url, p.is_public, p.owner_id,
               p.created_at, p.updated_at
        FROM playlists p
        INNER JOIN playlist_follows pf ON p.id = pf.playlist_id
        WHERE pf.user_id = ?
        ORDER BY pf.followed_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(playlist_from_row).collect())
}
