use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use tracing::info;
use uuid::Uuid;

use service::access::Requester;
use service::permissions::{self, DevicePermissionsInput, DevicePermissionsPatch, DevicePermissionsView};

use crate::errors::JsonApiError;
use crate::extract::{JsonBody, PathParam};
use crate::routes::auth::ServerState;

#[utoipa::path(
    get, path = "/api/device/devicepermissions", tag = "permissions",
    responses((status = 200, description = "List OK", body = [crate::openapi::DevicePermissionsDoc]))
)]
pub async fn list(
    State(state): State<ServerState>,
    Extension(requester): Extension<Requester>,
) -> Result<Json<Vec<DevicePermissionsView>>, JsonApiError> {
    let rows = permissions::list(&state.db, &requester).await?;
    info!(count = rows.len(), "list device permissions");
    Ok(Json(rows))
}

#[utoipa::path(
    post, path = "/api/device/devicepermissions", tag = "permissions",
    request_body = crate::openapi::DevicePermissionsDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::DevicePermissionsDoc),
        (status = 400, description = "Validation Error"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(requester): Extension<Requester>,
    JsonBody(input): JsonBody<DevicePermissionsInput>,
) -> Result<(StatusCode, Json<DevicePermissionsView>), JsonApiError> {
    let created = permissions::create(&state.db, &requester, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/api/device/devicepermissions/{user_id}", tag = "permissions",
    params(("user_id" = Uuid, Path, description = "User the permissions belong to")),
    responses((status = 200, description = "Found", body = crate::openapi::DevicePermissionsDoc), (status = 404, description = "Not Found"))
)]
pub async fn retrieve(
    State(state): State<ServerState>,
    Extension(requester): Extension<Requester>,
    PathParam(user_id): PathParam<Uuid>,
) -> Result<Json<DevicePermissionsView>, JsonApiError> {
    Ok(Json(permissions::retrieve(&state.db, &requester, user_id).await?))
}

#[utoipa::path(
    put, path = "/api/device/devicepermissions/{user_id}", tag = "permissions",
    params(("user_id" = Uuid, Path, description = "User the permissions belong to")),
    request_body = crate::openapi::DevicePermissionsDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::DevicePermissionsDoc),
        (status = 400, description = "Validation Error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn replace(
    State(state): State<ServerState>,
    Extension(requester): Extension<Requester>,
    PathParam(user_id): PathParam<Uuid>,
    JsonBody(input): JsonBody<DevicePermissionsInput>,
) -> Result<Json<DevicePermissionsView>, JsonApiError> {
    Ok(Json(permissions::replace(&state.db, &requester, user_id, input).await?))
}

#[utoipa::path(
    patch, path = "/api/device/devicepermissions/{user_id}", tag = "permissions",
    params(("user_id" = Uuid, Path, description = "User the permissions belong to")),
    request_body = crate::openapi::DevicePermissionsPatchDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::DevicePermissionsDoc),
        (status = 400, description = "Validation Error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Extension(requester): Extension<Requester>,
    PathParam(user_id): PathParam<Uuid>,
    JsonBody(patch): JsonBody<DevicePermissionsPatch>,
) -> Result<Json<DevicePermissionsView>, JsonApiError> {
    Ok(Json(permissions::update(&state.db, &requester, user_id, patch).await?))
}

#[utoipa::path(
    delete, path = "/api/device/devicepermissions/{user_id}", tag = "permissions",
    params(("user_id" = Uuid, Path, description = "User the permissions belong to")),
    responses((status = 204, description = "Deleted"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found"))
)]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(requester): Extension<Requester>,
    PathParam(user_id): PathParam<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    permissions::delete(&state.db, &requester, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
