use mixtape_core::{error::Result, CreateTag, MixtapeError, Tag, TagId};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

fn tag_from_row(row: &SqliteRow) -> Tag {
    Tag {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
    }
}

pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Tag>> {
    let rows = sqlx::query("SELECT id, name, created_at FROM tags ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(tag_from_row).collect())
}

pub async fn get_by_id(pool: &SqlitePool, id: TagId) -> Result<Option<Tag>> {
    let row = sqlx::query("SELECT id, name, created_at FROM tags WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| tag_from_row(&row)))
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Tag>> {
    let row = sqlx::query("SELECT id, name, created_at FROM tags WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| tag_from_row(&row)))
}

pub async fn create(pool: &SqlitePool, tag: CreateTag) -> Result<Tag> {
    if find_by_name(pool, &tag.name).await?.is_some() {
        return Err(MixtapeError::conflict("tag name already exists"));
    }

    let result = sqlx::query("INSERT INTO tags (name) VALUES (?)")
        .bind(&tag.name)
        .execute(pool)
        .await?;

    let id = result.last_insert_rowid();

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| MixtapeError::storage("Failed to retrieve created tag"))
}

pub async fn delete(pool: &SqlitePool, id: TagId) -> Result<()> {
    let result = sqlx::query("DELETE FROM tags WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(MixtapeError::not_found("Tag", id));
    }

    Ok(())
}
