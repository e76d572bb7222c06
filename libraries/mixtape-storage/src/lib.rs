//! Mixtape Storage
//!
//! `SQLite` database layer for the Mixtape playlist server.
//!
//! This crate provides persistent storage for users, the song catalog
//! (artists, albums, songs, tags), and playlists with ordered membership.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each feature owns its own queries and logic
//! - **Multi-User**: all playlist data is owned and access-checked per user
//! - **Transactional Ordering**: playlist membership positions are kept
//!   dense (1..=N) through atomic transactions plus unique-index backstops
//!
//! # Example
//!
//! ```rust,no_run
//! use mixtape_storage::{create_pool, run_migrations};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create database connection
//! let pool = create_pool("sqlite://mixtape.db").await?;
//! run_migrations(&pool).await?;
//!
//! // Browse public playlists
//! let playlists = mixtape_storage::playlists::get_public(&pool).await?;
//! # Ok(())
//! # }
//! ```

mod error;

// Vertical slices
pub mod albums;
pub mod artists;
pub mod playlists;
pub mod songs;
pub mod stats;
pub mod tags;
pub mod users;

pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a pool and bring the schema up to date in one call
///
/// # Errors
///
/// Returns an error if the connection or a migration fails
pub async fn connect(database_url: &str) -> Result<SqlitePool, StorageError> {
    let pool = create_pool(database_url).await?;
    run_migrations(&pool)
        .await
        .map_err(|e| StorageError::Migration(e.to_string()))?;
    Ok(pool)
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://mixtape.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}
