use axum::{
    extract::{Query, State},
    Extension, Json,
};
use uuid::Uuid;

use service::access::Requester;
use service::sync_status::{self, SyncStatusFilter, UserSyncStatusView};

use crate::errors::JsonApiError;
use crate::extract::PathParam;
use crate::metrics::SYNC_STATUS_QUERIES_TOTAL;
use crate::routes::auth::ServerState;

#[utoipa::path(
    get, path = "/api/device/usersyncstatus", tag = "sync",
    params(
        ("user" = Option<Uuid>, Query, description = "Only this user"),
        ("member_of" = Option<Uuid>, Query, description = "Users in this collection or facility")
    ),
    responses((status = 200, description = "List OK", body = [crate::openapi::UserSyncStatusDoc]), (status = 400, description = "Bad Filter"))
)]
pub async fn list(
    State(state): State<ServerState>,
    Extension(requester): Extension<Requester>,
    Query(filter): Query<SyncStatusFilter>,
) -> Result<Json<Vec<UserSyncStatusView>>, JsonApiError> {
    SYNC_STATUS_QUERIES_TOTAL.inc();
    Ok(Json(sync_status::list(&state.db, &requester, &filter).await?))
}

#[utoipa::path(
    get, path = "/api/device/usersyncstatus/{id}", tag = "sync",
    params(("id" = Uuid, Path, description = "Sync status id")),
    responses((status = 200, description = "Found", body = crate::openapi::UserSyncStatusDoc), (status = 404, description = "Not Found"))
)]
pub async fn retrieve(
    State(state): State<ServerState>,
    Extension(requester): Extension<Requester>,
    PathParam(id): PathParam<Uuid>,
) -> Result<Json<UserSyncStatusView>, JsonApiError> {
    SYNC_STATUS_QUERIES_TOTAL.inc();
    Ok(Json(sync_status::retrieve(&state.db, &requester, id).await?))
}
