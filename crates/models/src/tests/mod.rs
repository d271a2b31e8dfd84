use anyhow::Result;
use configs::DatabaseConfig;
use sea_orm::DatabaseConnection;

/// Database connection and configuration tests
pub mod db_tests;


/// Fresh in-memory sqlite database with every migration applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let cfg = DatabaseConfig { url: "sqlite::memory:".into(), ..Default::default() };
    crate::db::connect_and_migrate(&cfg).await
}
