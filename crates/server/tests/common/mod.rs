#![allow(dead_code)]
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use configs::{AppConfig, DatabaseConfig};
use server::routes::auth::ServerState;
use server::startup::build_app;

pub const ADMIN_PASSWORD: &str = "S3curePass!";

pub struct TestApp {
    pub app: Router,
    pub db: DatabaseConnection,
    pub home: tempfile::TempDir,
}

/// Router over a fresh in-memory database with the home directory in a tempdir.
pub async fn spawn_app() -> anyhow::Result<TestApp> {
    let home = tempfile::tempdir()?;
    let mut cfg = AppConfig::default();
    cfg.database = DatabaseConfig { url: "sqlite::memory:".into(), ..Default::default() };
    cfg.paths.home_dir = home.path().to_path_buf();
    cfg.auth.jwt_secret = "test-secret".into();
    std::fs::create_dir_all(cfg.paths.content_dir())?;

    let db = models::db::connect_and_migrate(&cfg.database).await?;
    let app = build_app(ServerState::new(db.clone(), cfg));
    Ok(TestApp { app, db, home })
}

pub fn provision_body() -> Value {
    json!({
        "facility": {"name": "Riverside School"},
        "preset": "formal",
        "superuser": {"username": "admin", "full_name": "Site Admin", "password": ADMIN_PASSWORD},
        "language_id": "en",
        "device_name": "classroom-box",
        "settings": {"learner_can_sign_up": false}
    })
}

pub async fn send(app: &Router, req: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, body))
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).unwrap()
}

/// Provision the device, then log the superuser in and return its token.
pub async fn provision_and_login(app: &Router) -> anyhow::Result<(Value, String)> {
    let (status, provisioned) =
        send(app, json_request("POST", "/api/device/deviceprovision", None, Some(provision_body()))).await?;
    assert_eq!(status, StatusCode::CREATED, "{provisioned}");
    let token = login(app, "admin", ADMIN_PASSWORD).await?;
    Ok((provisioned, token))
}

pub async fn login(app: &Router, username: &str, password: &str) -> anyhow::Result<String> {
    let (status, body) = send(
        app,
        json_request("POST", "/auth/login", None, Some(json!({"username": username, "password": password}))),
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    Ok(body["token"].as_str().unwrap_or_default().to_string())
}

/// Add a plain learner to `facility_id` with a password, no device permissions.
pub async fn seed_learner(
    db: &DatabaseConnection,
    facility_id: Uuid,
    username: &str,
    password: &str,
) -> anyhow::Result<Uuid> {
    let user = models::facility_user::create(db, facility_id, username, username).await?;
    let hash = service::auth::service::hash_password(password)?;
    models::user_credentials::upsert_password(db, user.id, hash, service::auth::service::PASSWORD_ALGORITHM).await?;
    Ok(user.id)
}
