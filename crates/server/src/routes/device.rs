use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use service::access::{ensure, Requester};
use service::device::{self, DeviceSettingsView};
use service::device_info::{self, DeviceInfo};
use service::provision::{self, ProvisionInput, ProvisionOutput};
use service::freespace;

use crate::errors::JsonApiError;
use crate::extract::JsonBody;
use crate::metrics::{DEVICE_INFO_REQUESTS_TOTAL, PROVISION_ATTEMPTS_TOTAL};
use crate::routes::auth::ServerState;

const DEVICE_PERMISSION_REQUIRED: &str = "access device settings";

#[utoipa::path(
    post, path = "/api/device/deviceprovision", tag = "device",
    request_body = crate::openapi::ProvisionRequestDoc,
    responses(
        (status = 201, description = "Provisioned"),
        (status = 400, description = "Validation Error"),
        (status = 403, description = "Already Provisioned")
    )
)]
pub async fn provision(
    State(state): State<ServerState>,
    JsonBody(body): JsonBody<Value>,
) -> Result<(StatusCode, Json<ProvisionOutput>), JsonApiError> {
    if provision::is_provisioned(&state.db).await? {
        PROVISION_ATTEMPTS_TOTAL.with_label_values(&["rejected"]).inc();
        return Err(JsonApiError::forbidden("device is already provisioned"));
    }
    let input: ProvisionInput = serde_json::from_value(body).map_err(|e| {
        PROVISION_ATTEMPTS_TOTAL.with_label_values(&["invalid"]).inc();
        JsonApiError::bad_request(e.to_string())
    })?;
    match provision::provision_device(&state.db, input).await {
        Ok(out) => {
            PROVISION_ATTEMPTS_TOTAL.with_label_values(&["success"]).inc();
            Ok((StatusCode::CREATED, Json(out)))
        }
        Err(e) => {
            PROVISION_ATTEMPTS_TOTAL.with_label_values(&["invalid"]).inc();
            Err(e.into())
        }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct FreeSpaceQuery {
    /// `Content` for the content directory; omitted for the home directory.
    pub path: Option<String>,
}

#[derive(Serialize)]
pub struct FreeSpaceOutput { pub freespace: u64 }

#[utoipa::path(
    get, path = "/api/device/freespace", tag = "device",
    params(FreeSpaceQuery),
    responses(
        (status = 200, description = "Free bytes", body = crate::openapi::FreeSpaceDoc),
        (status = 400, description = "Unknown Path"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn free_space(
    State(state): State<ServerState>,
    Extension(requester): Extension<Requester>,
    Query(q): Query<FreeSpaceQuery>,
) -> Result<Json<FreeSpaceOutput>, JsonApiError> {
    ensure(requester.can_manage_content(), "manage content")?;
    let freespace = freespace::free_space_for(&state.config.paths, q.path.as_deref())?;
    Ok(Json(FreeSpaceOutput { freespace }))
}

#[utoipa::path(
    get, path = "/api/device/deviceinfo", tag = "device",
    responses(
        (status = 200, description = "Device info", body = crate::openapi::DeviceInfoDoc),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn device_info(
    State(state): State<ServerState>,
    Extension(requester): Extension<Requester>,
    headers: HeaderMap,
) -> Result<Json<DeviceInfo>, JsonApiError> {
    ensure(requester.has_any_device_permissions(), DEVICE_PERMISSION_REQUIRED)?;
    DEVICE_INFO_REQUESTS_TOTAL.inc();
    let host = headers.get(header::HOST).and_then(|v| v.to_str().ok());
    let info = device_info::device_info(&state.db, &state.config, host, &requester).await?;
    Ok(Json(info))
}

#[utoipa::path(
    get, path = "/api/device/devicesettings", tag = "device",
    responses((status = 200, description = "Settings", body = crate::openapi::DeviceSettingsDoc), (status = 403, description = "Forbidden"))
)]
pub async fn get_settings(
    State(state): State<ServerState>,
    Extension(requester): Extension<Requester>,
) -> Result<Json<DeviceSettingsView>, JsonApiError> {
    ensure(requester.has_any_device_permissions(), DEVICE_PERMISSION_REQUIRED)?;
    Ok(Json(device::get_settings(&state.db).await?))
}

#[utoipa::path(
    patch, path = "/api/device/devicesettings", tag = "device",
    request_body = crate::openapi::DeviceSettingsDoc,
    responses(
        (status = 200, description = "Saved", body = crate::openapi::DeviceSettingsDoc),
        (status = 400, description = "Validation Error"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn patch_settings(
    State(state): State<ServerState>,
    Extension(requester): Extension<Requester>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<DeviceSettingsView>, JsonApiError> {
    ensure(requester.has_any_device_permissions(), DEVICE_PERMISSION_REQUIRED)?;
    let saved = device::update_settings(&state.db, &body).await?;
    info!(user_id = %requester.user_id, "device settings patched");
    Ok(Json(saved))
}

#[derive(Serialize)]
pub struct DeviceNameOutput { pub name: String }

#[utoipa::path(
    get, path = "/api/device/devicename", tag = "device",
    responses((status = 200, description = "Device name", body = crate::openapi::DeviceNameDoc), (status = 403, description = "Forbidden"))
)]
pub async fn get_name(
    State(state): State<ServerState>,
    Extension(requester): Extension<Requester>,
) -> Result<Json<DeviceNameOutput>, JsonApiError> {
    ensure(requester.has_any_device_permissions(), DEVICE_PERMISSION_REQUIRED)?;
    Ok(Json(DeviceNameOutput { name: device::get_name(&state.db).await? }))
}

#[utoipa::path(
    patch, path = "/api/device/devicename", tag = "device",
    request_body = crate::openapi::DeviceNameDoc,
    responses(
        (status = 200, description = "Renamed", body = crate::openapi::DeviceNameDoc),
        (status = 400, description = "Validation Error"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn patch_name(
    State(state): State<ServerState>,
    Extension(requester): Extension<Requester>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<DeviceNameOutput>, JsonApiError> {
    ensure(requester.has_any_device_permissions(), DEVICE_PERMISSION_REQUIRED)?;
    let name = device::update_name(&state.db, body.get("name").and_then(Value::as_str)).await?;
    Ok(Json(DeviceNameOutput { name }))
}
