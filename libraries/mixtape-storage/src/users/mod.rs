//! User management and authentication queries

use mixtape_core::{error::Result, CreateUser, MixtapeError, Role, User, UserId};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

fn user_from_row(row: &SqliteRow) -> Result<User> {
    let role_str: String = row.get("role");
    let role = Role::from_str(&role_str)
        .ok_or_else(|| MixtapeError::storage(format!("Invalid role: {}", role_str)))?;

    Ok(User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        role,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// Create a user and its credentials in one transaction
pub async fn create(pool: &SqlitePool, user: CreateUser, password_hash: &str) -> Result<User> {
    let taken: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE username = ? OR email = ?")
        .bind(&user.username)
        .bind(&user.email)
        .fetch_optional(pool)
        .await?;
    if taken.is_some() {
        return Err(MixtapeError::conflict("username or email already in use"));
    }

    let mut tx = pool.begin().await?;

    let result = sqlx::query("INSERT INTO users (username, email, role) VALUES (?, ?, ?)")
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.role.as_str())
        .execute(&mut *tx)
        .await?;

    let id = result.last_insert_rowid();

    sqlx::query("INSERT INTO user_credentials (user_id, password_hash) VALUES (?, ?)")
        .bind(id)
        .bind(password_hash)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| MixtapeError::storage("Failed to retrieve created user"))
}

/// Get user by ID
pub async fn get_by_id(pool: &SqlitePool, id: UserId) -> Result<Option<User>> {
    let row = sqlx::query(
        "SELECT id, username, email, role, created_at, updated_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(|row| user_from_row(&row)).transpose()
}

/// Find user by username (login lookup)
pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let row = sqlx::query(
        "SELECT id, username, email, role, created_at, updated_at FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    row.map(|row| user_from_row(&row)).transpose()
}

/// Get all users (admin back office)
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query(
        "SELECT id, username, email, role, created_at, updated_at FROM users ORDER BY username",
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(user_from_row).collect()
}

/// Change a user's role (admin back office)
pub async fn update_role(pool: &SqlitePool, id: UserId, role: Role) -> Result<User> {
    let result =
        sqlx::query("UPDATE users SET role = ?, updated_at = datetime('now') WHERE id = ?")
            .bind(role.as_str())
            .bind(id)
            .execute(pool)
            .await?;

    if result.rows_affected() == 0 {
        return Err(MixtapeError::not_found("User", id));
    }

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| MixtapeError::storage("Failed to retrieve updated user"))
}

/// Delete a user account (admin back office)
pub async fn delete(pool: &SqlitePool, id: UserId) -> Result<()> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(MixtapeError::not_found("User", id));
    }

    Ok(())
}

/// Get user's password hash for authentication
///
/// Returns the password hash if found, or None if the user has no
/// credentials
pub async fn get_password_hash(pool: &SqlitePool, user_id: UserId) -> Result<Option<String>> {
    let hash: Option<String> =
        sqlx::query_scalar("SELECT password_hash FROM user_credentials WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    Ok(hash)
}

/// Create or update user credentials
///
/// The hash must already be computed (bcrypt) by the caller.
pub async fn set_password_hash(
    pool: &SqlitePool,
    user_id: UserId,
    password_hash: &str,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO user_credentials (user_id, password_hash, updated_at)
         VALUES (?, ?, datetime('now'))
         ON CONFLICT(user_id)
         DO UPDATE SET password_hash = excluded.password_hash, updated_at = datetime('now')",
    )
    .bind(user_id)
    .bind(password_hash)
    .execute(pool)
    .await?;

    Ok(())
}
