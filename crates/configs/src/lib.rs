use std::path::{Path, PathBuf};

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub deployment: DeploymentConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

/// Filesystem locations the device reports on.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_home_dir")]
    pub home_dir: PathBuf,
    /// Defaults to `<home_dir>/content` when left empty.
    #[serde(default)]
    pub content_dir: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self { home_dir: default_home_dir(), content_dir: None }
    }
}

fn default_home_dir() -> PathBuf { PathBuf::from("data") }

impl PathsConfig {
    pub fn content_dir(&self) -> PathBuf {
        self.content_dir
            .clone()
            .unwrap_or_else(|| self.home_dir.join("content"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentConfig {
    #[serde(default = "default_url_path_prefix")]
    pub url_path_prefix: String,
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default)]
    pub installer: Option<String>,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            url_path_prefix: default_url_path_prefix(),
            time_zone: default_time_zone(),
            installer: None,
        }
    }
}

fn default_url_path_prefix() -> String { "/".into() }
fn default_time_zone() -> String { "UTC".into() }

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: String::new(), token_ttl_hours: default_token_ttl_hours() }
    }
}

fn default_token_ttl_hours() -> i64 { 12 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `$CONFIG_PATH`), falling back to defaults when the
    /// file is absent, then apply env overrides and validate.
    pub fn load_and_validate() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = if Path::new(&path).exists() {
            load_from_file(&path)?
        } else {
            AppConfig::default()
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env(&self.paths.home_dir);
        self.database.validate()?;
        self.deployment.normalize()?;
        self.auth.normalize_from_env();
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            self.port = port.parse().map_err(|_| anyhow!("SERVER_PORT is not a valid port"))?;
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// Fill the URL from `DATABASE_URL`, or a sqlite file under the home directory.
    pub fn normalize_from_env(&mut self, home_dir: &Path) {
        if self.url.trim().is_empty() {
            self.url = match std::env::var("DATABASE_URL") {
                Ok(url) => url,
                Err(_) => format!("sqlite://{}?mode=rwc", home_dir.join("db.sqlite3").display()),
            };
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://")
            || lower.starts_with("postgres://")
            || lower.starts_with("sqlite:"))
        {
            return Err(anyhow!("database.url must start with postgres://, postgresql:// or sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive"));
        }
        Ok(())
    }
}

impl DeploymentConfig {
    fn normalize(&mut self) -> Result<()> {
        let trimmed = self.url_path_prefix.trim().trim_matches('/');
        self.url_path_prefix = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{trimmed}/")
        };
        self.time_zone
            .parse::<chrono_tz::Tz>()
            .map_err(|_| anyhow!("deployment.time_zone '{}' is not an IANA time zone", self.time_zone))?;
        if let Some(installer) = &self.installer {
            if installer.trim().is_empty() {
                self.installer = None;
            }
        }
        Ok(())
    }
}

impl AuthConfig {
    fn normalize_from_env(&mut self) {
        if self.jwt_secret.trim().is_empty() {
            self.jwt_secret =
                std::env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".to_string());
        }
        if self.token_ttl_hours <= 0 {
            self.token_ttl_hours = default_token_ttl_hours();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> AppConfig {
        toml::from_str(src).unwrap()
    }

    #[test]
    fn defaults_are_filled_in() {
        let mut cfg = parse("");
        cfg.database.url = "sqlite::memory:".into();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.deployment.url_path_prefix, "/");
        assert_eq!(cfg.paths.content_dir(), PathBuf::from("data").join("content"));
    }

    #[test]
    fn url_prefix_is_wrapped_in_slashes() {
        let mut cfg = parse("[deployment]\nurl_path_prefix = \"kolibri\"\n");
        cfg.database.url = "sqlite::memory:".into();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.deployment.url_path_prefix, "/kolibri/");
    }

    #[test]
    fn rejects_unknown_time_zone() {
        let mut cfg = parse("[deployment]\ntime_zone = \"Mars/Olympus\"\n");
        cfg.database.url = "sqlite::memory:".into();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn rejects_unsupported_database_scheme() {
        let cfg = DatabaseConfig { url: "mysql://localhost/db".into(), ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_inverted_pool_bounds() {
        let cfg = DatabaseConfig {
            url: "postgres://localhost/db".into(),
            min_connections: 5,
            max_connections: 2,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\nhost = \"0.0.0.0\"\nport = 9000\n[paths]\nhome_dir = \"/srv/device\"\ncontent_dir = \"/mnt/content\"\n",
        )
        .unwrap();
        let cfg = load_from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.paths.content_dir(), PathBuf::from("/mnt/content"));
    }
}
