use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use configs::AppConfig;
use service::access::{self, Requester};
use service::auth::{
    domain::LoginInput,
    repo::seaorm::SeaOrmAuthRepository,
    service::{decode_token, AuthConfig, AuthService},
};

use crate::errors::JsonApiError;
use crate::extract::JsonBody;
use crate::metrics::AUTH_FAILURES_TOTAL;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
    pub config: Arc<AppConfig>,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        let auth = ServerAuthConfig {
            jwt_secret: config.auth.jwt_secret.clone(),
        };
        Self { db, auth, config: Arc::new(config) }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub facility: Option<Uuid>,
}

#[derive(Serialize)]
pub struct LoginOutput { pub user_id: Uuid, pub username: String, pub full_name: String, pub token: String }

#[derive(Serialize)]
pub struct SessionOutput {
    pub user_id: Uuid,
    pub facility_id: Uuid,
    pub username: String,
    pub full_name: String,
    pub is_superuser: bool,
    pub can_manage_content: bool,
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequestDoc, responses((status = 200, description = "Logged In", body = crate::openapi::LoginResponseDoc), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    JsonBody(input): JsonBody<LoginRequest>,
) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let facility_id = match input.facility {
        Some(id) => id,
        None => service::device::default_facility_id(&state.db)
            .await?
            .ok_or_else(|| JsonApiError::unauthorized("no facility given and the device has no default facility"))?,
    };
    let repo = Arc::new(SeaOrmAuthRepository { db: &state.db });
    let svc = AuthService::new(repo, AuthConfig::from_app(&state.config.auth));
    let session = svc
        .login(LoginInput { facility_id, username: input.username, password: input.password })
        .await
        .map_err(|e| {
            AUTH_FAILURES_TOTAL.inc();
            tracing::warn!(code = e.code(), err = %e, "login failed");
            JsonApiError::unauthorized(&e.to_string())
        })?;
    let user = session.user;
    let token = session
        .token
        .ok_or_else(|| JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Token Error", Some("token generation failed".into())))?;

    let mut cookie = Cookie::new(AUTH_COOKIE, token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    let jar = jar.add(cookie);
    let out = LoginOutput { user_id: user.id, username: user.username, full_name: user.full_name, token };
    Ok((jar, Json(out)))
}

#[utoipa::path(post, path = "/auth/logout", tag = "auth", responses((status = 204, description = "Logged Out")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    let jar = jar.remove(cookie);
    (jar, StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/auth/session", tag = "auth", responses((status = 200, description = "Current user", body = crate::openapi::SessionDoc), (status = 401, description = "Unauthorized")))]
pub async fn session(Extension(requester): Extension<Requester>) -> Json<SessionOutput> {
    Json(SessionOutput {
        user_id: requester.user_id,
        facility_id: requester.facility_id,
        is_superuser: requester.is_superuser(),
        can_manage_content: requester.can_manage_content(),
        username: requester.username,
        full_name: requester.full_name,
    })
}

fn is_public(path: &str, method: &Method) -> bool {
    method == Method::OPTIONS
        || path == "/health"
        || path == "/metrics"
        || path == "/auth/login"
        || path == "/api/device/deviceprovision"
        || path.starts_with("/docs")
        || path.starts_with("/api-docs")
}

/// Read the token from `Authorization: Bearer`, falling back to the `auth_token` cookie.
fn extract_token(req: &Request) -> Result<Option<String>, JsonApiError> {
    if let Some(h) = req.headers().get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return match h.strip_prefix("Bearer ") {
            Some(token) if !token.is_empty() => Ok(Some(token.to_string())),
            _ => Err(JsonApiError::unauthorized("invalid Authorization format (expect Bearer)")),
        };
    }
    let jar = CookieJar::from_headers(req.headers());
    Ok(jar.get(AUTH_COOKIE).map(|c| c.value().to_string()).filter(|t| !t.is_empty()))
}

/// Global middleware: every route outside the public list needs a valid token.
/// The resolved `Requester` is stored in the request extensions.
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();
    if is_public(&path, req.method()) {
        return Ok(next.run(req).await);
    }

    let token = match extract_token(&req) {
        Ok(Some(token)) => token,
        Ok(None) => {
            AUTH_FAILURES_TOTAL.inc();
            tracing::warn!(path = %path, "missing Authorization header and auth_token cookie");
            return Err(JsonApiError::unauthorized("authentication credentials were not provided"));
        }
        Err(e) => {
            AUTH_FAILURES_TOTAL.inc();
            tracing::warn!(path = %path, "malformed Authorization header");
            return Err(e);
        }
    };

    let claims = decode_token(&state.auth.jwt_secret, &token).map_err(|e| {
        AUTH_FAILURES_TOTAL.inc();
        tracing::error!(path = %path, err = %e, "token validation failed");
        JsonApiError::unauthorized("invalid or expired token")
    })?;

    let requester = access::load_requester(&state.db, claims.sub)
        .await?
        .ok_or_else(|| {
            AUTH_FAILURES_TOTAL.inc();
            tracing::warn!(path = %path, user_id = %claims.sub, "token refers to a missing user");
            JsonApiError::unauthorized("user no longer exists")
        })?;
    req.extensions_mut().insert(requester);
    Ok(next.run(req).await)
}
