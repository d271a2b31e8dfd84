use std::net::SocketAddr;

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::AppConfig;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::metrics;
use crate::routes::{self, auth::ServerState};
use service::runtime;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Resolve `server.host`, which may be an IP literal or a name such as `localhost`.
async fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    let target = format!("{}:{}", cfg.server.host, cfg.server.port);
    let addr = tokio::net::lookup_host(&target)
        .await
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {target}: {e}")))?
        .next()
        .ok_or_else(|| StartupError::InvalidConfig(format!("bind address {target} resolved to nothing")));
    addr
}

/// Router with CORS and tracing attached, ready to serve or to drive from tests.
pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

/// Prepare directories, connect and migrate the database, then serve until the
/// listener fails.
pub async fn run_with_config(cfg: AppConfig) -> Result<(), StartupError> {
    runtime::ensure_env(&cfg.paths)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;

    let db = models::db::connect_and_migrate(&cfg.database).await?;
    metrics::init();

    let addr = bind_addr(&cfg).await?;
    let state = ServerState::new(db, cfg);
    let app = build_app(state);

    info!(%addr, version = service::VERSION, "starting device server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| StartupError::Runtime(format!("bind {addr}: {e}")))?;
    axum::serve(listener, app)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    Ok(())
}

/// Public entry: load `.env` and config, initialise logging, run the HTTP server.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();
    let cfg = AppConfig::load_and_validate()
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    run_with_config(cfg).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bind_addr_from_ip_literal() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "0.0.0.0".into();
        cfg.server.port = 9090;
        assert_eq!(bind_addr(&cfg).await.unwrap().to_string(), "0.0.0.0:9090");
    }

    #[tokio::test]
    async fn bind_addr_resolves_localhost() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "localhost".into();
        cfg.server.port = 9091;
        let addr = bind_addr(&cfg).await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 9091);
    }

    #[tokio::test]
    async fn bind_addr_rejects_malformed_hosts() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "not a host".into();
        assert!(matches!(bind_addr(&cfg).await, Err(StartupError::InvalidConfig(_))));
    }
}
