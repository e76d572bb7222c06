use mixtape_core::{error::Result, Artist, ArtistId, CreateArtist, MixtapeError};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

fn artist_from_row(row: &SqliteRow) -> Artist {
    Artist {
        id: row.get("id"),
        name: row.get("name"),
        sort_name: row.get("sort_name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Artist>> {
    let rows = sqlx::query(
        "SELECT id, name, sort_name, created_at, updated_at
         FROM artists
         ORDER BY sort_name, name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(artist_from_row).collect())
}

pub async fn get_by_id(pool: &SqlitePool, id: ArtistId) -> Result<Option<Artist>> {
    let row = sqlx::query(
        "SELECT id, name, sort_name, created_at, updated_at
         FROM artists
         WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| artist_from_row(&row)))
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Artist>> {
    let row = sqlx::query(
        "SELECT id, name, sort_name, created_at, updated_at
         FROM artists
         WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| artist_from_row(&row)))
}

pub async fn create(pool: &SqlitePool, artist: CreateArtist) -> Result<Artist> {
    let result = sqlx::query("INSERT INTO artists (name, sort_name) VALUES (?, ?)")
        .bind(&artist.name)
        .bind(&artist.sort_name)
        .execute(pool)
        .await?;

    let id = result.last_insert_rowid();

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| MixtapeError::storage("Failed to retrieve created artist"))
}

pub async fn update(pool: &SqlitePool, id: ArtistId, artist: CreateArtist) -> Result<Artist> {
    let result = sqlx::query(
        "UPDATE artists SET name = ?, sort_name = ?, updated_at = datetime('now') WHERE id = ?",
    )
    .bind(&artist.name)
    .bind(&artist.sort_name)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(MixtapeError::not_found("Artist", id));
    }

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| MixtapeError::storage("Failed to retrieve updated artist"))
}

/// Delete an artist. Refused while songs still reference it.
pub async fn delete(pool: &SqlitePool, id: ArtistId) -> Result<()> {
    let song_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM songs WHERE artist_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if song_count > 0 {
        return Err(MixtapeError::conflict("artist still has songs"));
    }

    let result = sqlx::query("DELETE FROM artists WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(MixtapeError::not_found("Artist", id));
    }

    Ok(())
}
