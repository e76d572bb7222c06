/// Common test utilities and fixtures
use anyhow::Result;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Test database with migrations applied; the temp dir cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

pub async fn create_test_database() -> Result<TestDb> {
    let temp_dir = tempfile::tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite://{}", db_path.display());

    let pool = mixtape_storage::create_pool(&db_url).await?;
    mixtape_storage::run_migrations(&pool).await?;

    Ok(TestDb {
        pool,
        _temp_dir: temp_dir,
    })
}

/// Test user credentials
pub mod fixtures {
    pub const TEST_USERNAME: &str = "testuser";
    pub const TEST_EMAIL: &str = "testuser@example.com";
    pub const TEST_PASSWORD: &str = "TestPassword123!";
}
