mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use common::{json_request, provision_and_login, send, spawn_app, ADMIN_PASSWORD};

#[tokio::test]
async fn login_sets_cookie_and_session_reports_permissions() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    common::send(&t.app, json_request("POST", "/api/device/deviceprovision", None, Some(common::provision_body()))).await?;

    let req = json_request("POST", "/auth/login", None, Some(json!({"username": "admin", "password": ADMIN_PASSWORD})));
    let resp = t.app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or_default().to_string())
        .expect("login must set a cookie");
    assert!(cookie.starts_with("auth_token="));

    // the cookie alone is enough to authenticate
    let req = Request::builder()
        .uri("/auth/session")
        .header(header::COOKIE, cookie)
        .body(Body::empty())?;
    let (status, body) = send(&t.app, req).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "admin");
    assert_eq!(body["is_superuser"], true);
    assert_eq!(body["can_manage_content"], true);
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_unauthorized() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    provision_and_login(&t.app).await?;
    let (status, body) = send(
        &t.app,
        json_request("POST", "/auth/login", None, Some(json!({"username": "admin", "password": "nope"}))),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");
    Ok(())
}

#[tokio::test]
async fn login_before_provisioning_has_no_default_facility() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let (status, _) = send(
        &t.app,
        json_request("POST", "/auth/login", None, Some(json!({"username": "admin", "password": "x"}))),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn protected_routes_need_a_valid_token() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    provision_and_login(&t.app).await?;

    let (status, _) = send(&t.app, json_request("GET", "/api/device/deviceinfo", None, None)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&t.app, json_request("GET", "/api/device/deviceinfo", Some("garbage"), None)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .uri("/api/device/devicename")
        .header(header::AUTHORIZATION, "Token abc")
        .body(Body::empty())?;
    let (status, _) = send(&t.app, req).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn public_routes_skip_the_token_check() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let (status, body) = send(&t.app, json_request("GET", "/health", None, None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let resp = t.app.clone().oneshot(json_request("GET", "/api-docs/openapi.json", None, None)).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = t.app.clone().oneshot(json_request("GET", "/metrics", None, None)).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn logout_expires_the_cookie() -> anyhow::Result<()> {
    let t = spawn_app().await?;
    let (_, token) = provision_and_login(&t.app).await?;
    let req = Request::builder()
        .method("POST")
        .uri("/auth/logout")
        .header(header::COOKIE, format!("auth_token={token}"))
        .body(Body::empty())?;
    let resp = t.app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let cookie = resp.headers().get(header::SET_COOKIE).and_then(|v| v.to_str().ok()).unwrap_or_default();
    assert!(cookie.starts_with("auth_token="));
    Ok(())
}
