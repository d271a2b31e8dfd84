//! Per-user sync status with a four-bucket summary for the frontend.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, FixedOffset, Utc};
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use models::{collection, device_settings, facility_user, membership, network_location, sync_session, transfer_session, user_sync_status};

use crate::access::{readable_user_ids, Requester};
use crate::errors::ServiceError;

/// A sync newer than this counts as recent.
pub fn recent_window() -> Duration {
    Duration::minutes(15)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStatus {
    RecentlySynced,
    Syncing,
    Queued,
    NotRecentlySynced,
}

/// Summarize a status row. `None` when the user has never synced and nothing is pending.
pub fn classify(
    active: bool,
    queued: bool,
    last_synced: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<SyncStatus> {
    if active {
        return Some(SyncStatus::Syncing);
    }
    if queued {
        return Some(SyncStatus::Queued);
    }
    last_synced.map(|ts| {
        if now - ts < recent_window() {
            SyncStatus::RecentlySynced
        } else {
            SyncStatus::NotRecentlySynced
        }
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSyncStatusView {
    pub id: Uuid,
    pub user: Uuid,
    pub queued: bool,
    pub last_synced: Option<DateTime<FixedOffset>>,
    pub active: bool,
    pub status: Option<SyncStatus>,
}

/// Query-string filters; kept as text so a malformed id is a validation error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncStatusFilter {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub member_of: Option<String>,
}

fn parse_uuid(field: &str, raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw).map_err(|_| ServiceError::Validation(format!("{field}: '{raw}' is not a valid id")))
}

/// A subset-of-users device with no full-facility peer to sync with reports nothing.
async fn nothing_to_report(db: &DatabaseConnection) -> Result<bool, ServiceError> {
    let subset = device_settings::Entity::find_by_id(device_settings::SINGLETON_ID)
        .one(db)
        .await?
        .map(|s| s.subset_of_users_device)
        .unwrap_or(false);
    Ok(subset && !network_location::any_full_facility_peer(db).await?)
}

/// Users belonging to `collection_id`, by membership or by facility.
async fn members_of(db: &DatabaseConnection, collection_id: Uuid) -> Result<HashSet<Uuid>, ServiceError> {
    if collection::Entity::find_by_id(collection_id).one(db).await?.is_none() {
        return Err(ServiceError::Validation(format!(
            "member_of: collection {collection_id} does not exist"
        )));
    }
    let mut ids: HashSet<Uuid> = membership::Entity::find()
        .filter(membership::Column::CollectionId.eq(collection_id))
        .all(db)
        .await?
        .into_iter()
        .map(|m| m.user_id)
        .collect();
    let by_facility = facility_user::Entity::find()
        .filter(facility_user::Column::FacilityId.eq(collection_id))
        .all(db)
        .await?;
    ids.extend(by_facility.into_iter().map(|u| u.id));
    Ok(ids)
}

async fn query(
    db: &DatabaseConnection,
    requester: &Requester,
    filter: &SyncStatusFilter,
    id: Option<Uuid>,
) -> Result<Vec<UserSyncStatusView>, ServiceError> {
    let user = filter.user.as_deref().map(|raw| parse_uuid("user", raw)).transpose()?;
    let member_of = filter.member_of.as_deref().map(|raw| parse_uuid("member_of", raw)).transpose()?;
    let member_ids = match member_of {
        Some(cid) => Some(members_of(db, cid).await?),
        None => None,
    };

    if nothing_to_report(db).await? {
        debug!("subset-of-users device without a full peer");
        return Ok(Vec::new());
    }

    let mut cond = Condition::all();
    if let Some(id) = id {
        cond = cond.add(user_sync_status::Column::Id.eq(id));
    }
    if let Some(user) = user {
        cond = cond.add(user_sync_status::Column::UserId.eq(user));
    }
    if let Some(ids) = member_ids {
        cond = cond.add(user_sync_status::Column::UserId.is_in(ids));
    }
    if let Some(ids) = readable_user_ids(db, requester).await? {
        cond = cond.add(user_sync_status::Column::UserId.is_in(ids));
    }
    let rows = user_sync_status::Entity::find()
        .filter(cond)
        .order_by_asc(user_sync_status::Column::Id)
        .all(db)
        .await?;

    let session_ids: Vec<Uuid> = rows.iter().filter_map(|r| r.sync_session_id).collect();
    let last_activity: HashMap<Uuid, DateTime<FixedOffset>> = if session_ids.is_empty() {
        HashMap::new()
    } else {
        sync_session::Entity::find()
            .filter(sync_session::Column::Id.is_in(session_ids.clone()))
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.id, s.last_activity_timestamp))
            .collect()
    };
    let active_sessions: HashSet<Uuid> = if session_ids.is_empty() {
        HashSet::new()
    } else {
        transfer_session::Entity::find()
            .filter(transfer_session::Column::SyncSessionId.is_in(session_ids))
            .filter(transfer_session::Column::Active.eq(true))
            .all(db)
            .await?
            .into_iter()
            .map(|t| t.sync_session_id)
            .collect()
    };

    let now = Utc::now();
    Ok(rows
        .into_iter()
        .map(|row| {
            let last_synced = row.sync_session_id.and_then(|sid| last_activity.get(&sid).copied());
            let active = row.sync_session_id.map(|sid| active_sessions.contains(&sid)).unwrap_or(false);
            UserSyncStatusView {
                id: row.id,
                user: row.user_id,
                queued: row.queued,
                last_synced,
                active,
                status: classify(active, row.queued, last_synced.map(|t| t.with_timezone(&Utc)), now),
            }
        })
        .collect())
}

pub async fn list(
    db: &DatabaseConnection,
    requester: &Requester,
    filter: &SyncStatusFilter,
) -> Result<Vec<UserSyncStatusView>, ServiceError> {
    query(db, requester, filter, None).await
}

pub async fn retrieve(
    db: &DatabaseConnection,
    requester: &Requester,
    id: Uuid,
) -> Result<UserSyncStatusView, ServiceError> {
    query(db, requester, &SyncStatusFilter::default(), Some(id))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::not_found("user sync status"))
}
