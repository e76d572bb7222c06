use mixtape_core::{error::Result, Album, AlbumId, ArtistId, CreateAlbum, MixtapeError};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

fn album_from_row(row: &SqliteRow) -> Album {
    Album {
        id: row.get("id"),
        title: row.get("title"),
        artist_id: row.get("artist_id"),
        year: row.get("year"),
        cover_url: row.get("cover_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        artist_name: row.get("artist_name"),
    }
}

pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Album>> {
    let rows = sqlx::query(
        r#"
        SELECT a.id, a.title, a.artist_id, a.year, a.cover_url, a.created_at, a.updated_at,
               ar.name AS artist_name
        FROM albums a
        LEFT JOIN artists ar ON a.artist_id = ar.id
        ORDER BY a.title
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(album_from_row).collect())
}

pub async fn get_by_id(pool: &SqlitePool, id: AlbumId) -> Result<Option<Album>> {
    let row = sqlx::query(
        r#"
        SELECT a.id, a.title, a.artist_id, a.year, a.cover_url, a.created_at, a.updated_at,
               ar.name AS artist_name
        FROM albums a
        LEFT JOIN artists ar ON a.artist_id = ar.id
        WHERE a.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| album_from_row(&row)))
}

pub async fn get_by_artist(pool: &SqlitePool, artist_id: ArtistId) -> Result<Vec<Album>> {
    let rows = sqlx::query(
        r#"
        SELECT a.id, a.title, a.artist_id, a.year, a.cover_url, a.created_at, a.updated_at,
               ar.name AS artist_name
        FROM albums a
        LEFT JOIN artists ar ON a.artist_id = ar.id
        WHERE a.artist_id = ?
        ORDER BY a.year, a.title
        "#,
    )
    .bind(artist_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(album_from_row).collect())
}

pub async fn create(pool: &SqlitePool, album: CreateAlbum) -> Result<Album> {
    if let Some(artist_id) = album.artist_id {
        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM artists WHERE id = ?")
            .bind(artist_id)
            .fetch_optional(pool)
            .await?;
        if exists.is_none() {
            return Err(MixtapeError::not_found("Artist", artist_id));
        }
    }

    let result =
        sqlx::query("INSERT INTO albums (title, artist_id, year, cover_url) VALUES (?, ?, ?, ?)")
            .bind(&album.title)
            .bind(album.artist_id)
            .bind(album.year)
            .bind(&album.cover_url)
            .execute(pool)
            .await?;

    let id = result.last_insert_rowid();

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| MixtapeError::storage("Failed to retrieve created album"))
}

pub async fn update(pool: &SqlitePool, id: AlbumId, album: CreateAlbum) -> Result<Album> {
    if let Some(artist_id) = album.artist_id {
        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM artists WHERE id = ?")
            .bind(artist_id)
            .fetch_optional(pool)
            .await?;
        if exists.is_none() {
            return Err(MixtapeError::not_found("Artist", artist_id));
        }
    }

    let result = sqlx::query(
        "UPDATE albums SET title = ?, artist_id = ?, year = ?, cover_url = ?, updated_at = datetime('now')
         WHERE id = ?",
    )
    .bind(&album.title)
    .bind(album.artist_id)
    .bind(album.year)
    .bind(&album.cover_url)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(MixtapeError::not_found("Album", id));
    }

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| MixtapeError::storage("Failed to retrieve updated album"))
}

/// Delete an album. Refused while songs still reference it.
pub async fn delete(pool: &SqlitePool, id: AlbumId) -> Result<()> {
    let song_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM songs WHERE album_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if song_count > 0 {
        return Err(MixtapeError::conflict("album still has songs"));
    }

    let result = sqlx::query("DELETE FROM albums WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(MixtapeError::not_found("Album", id));
    }

    Ok(())
}
