use std::time::Duration;

use configs::DatabaseConfig;
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::info;

/// Connect using the validated application config (`config.toml` / env).
pub async fn connect() -> anyhow::Result<DatabaseConnection> {
    let cfg = configs::AppConfig::load_and_validate()?;
    connect_with_config(&cfg.database).await
}

pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    opts.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .sqlx_logging(cfg.sqlx_logging);
    // An in-memory sqlite database lives only as long as its single connection
    if cfg.url.contains(":memory:") {
        opts.max_connections(1).min_connections(1);
    }
    let db = Database::connect(opts).await?;
    info!(backend = ?db.get_database_backend(), "database connected");
    Ok(db)
}

/// Connect and bring the schema up to date.
pub async fn connect_and_migrate(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let db = connect_with_config(cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Describe where the data lives: the sqlite file path, `postgresql`, or `unknown`.
pub fn database_path(url: &str) -> String {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("sqlite:") {
        let rest = &url["sqlite:".len()..];
        let rest = rest.trim_start_matches("//");
        rest.split('?').next().unwrap_or_default().to_string()
    } else if lower.starts_with("postgres://") || lower.starts_with("postgresql://") {
        "postgresql".to_string()
    } else {
        "unknown".to_string()
    }
}
