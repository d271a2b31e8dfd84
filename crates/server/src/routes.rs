use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::openapi::ApiDoc;

pub mod auth;
pub mod device;
pub mod health;
pub mod permissions;
pub mod sync_status;

use auth::ServerState;

/// Build the full application router. Everything outside the public list in
/// `auth::is_public` passes through the token middleware.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health::health))
        .route("/metrics", get(health::metrics))
        .route("/auth/login", post(auth::login));

    let device_api = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/session", get(auth::session))
        .route("/api/device/deviceprovision", post(device::provision))
        .route("/api/device/freespace", get(device::free_space))
        .route("/api/device/deviceinfo", get(device::device_info))
        .route(
            "/api/device/devicesettings",
            get(device::get_settings).patch(device::patch_settings),
        )
        .route(
            "/api/device/devicename",
            get(device::get_name).patch(device::patch_name),
        )
        .route(
            "/api/device/devicepermissions",
            get(permissions::list).post(permissions::create),
        )
        .route(
            "/api/device/devicepermissions/:user_id",
            get(permissions::retrieve)
                .put(permissions::replace)
                .patch(permissions::update)
                .delete(permissions::delete),
        )
        .route("/api/device/usersyncstatus", get(sync_status::list))
        .route("/api/device/usersyncstatus/:id", get(sync_status::retrieve));

    public
        .merge(device_api)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer_token_state,
        ))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
