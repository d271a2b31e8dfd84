//! Device permissions CRUD.
//!
//! Superusers see and write every row; everyone else only reads their own.

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use models::{device_permissions, facility_user};

use crate::access::{ensure, Requester};
use crate::errors::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevicePermissionsView {
    pub user: Uuid,
    pub is_superuser: bool,
    pub can_manage_content: bool,
}

impl From<device_permissions::Model> for DevicePermissionsView {
    fn from(m: device_permissions::Model) -> Self {
        Self { user: m.user_id, is_superuser: m.is_superuser, can_manage_content: m.can_manage_content }
    }
}

/// Body of create and full update.
#[derive(Debug, Clone, Deserialize)]
pub struct DevicePermissionsInput {
    pub user: Uuid,
    pub is_superuser: bool,
    pub can_manage_content: bool,
}

/// Body of partial update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DevicePermissionsPatch {
    #[serde(default)]
    pub user: Option<Uuid>,
    #[serde(default)]
    pub is_superuser: Option<bool>,
    #[serde(default)]
    pub can_manage_content: Option<bool>,
}

pub async fn list(db: &DatabaseConnection, requester: &Requester) -> Result<Vec<DevicePermissionsView>, ServiceError> {
    let rows = if requester.is_superuser() {
        device_permissions::Entity::find()
            .order_by_asc(device_permissions::Column::UserId)
            .all(db)
            .await?
    } else {
        device_permissions::find_by_user(db, requester.user_id).await?.into_iter().collect()
    };
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Rows hidden from the requester read as missing.
async fn find_visible(
    db: &DatabaseConnection,
    requester: &Requester,
    user_id: Uuid,
) -> Result<device_permissions::Model, ServiceError> {
    if !requester.is_superuser() && requester.user_id != user_id {
        return Err(ServiceError::not_found("device permissions"));
    }
    device_permissions::find_by_user(db, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("device permissions"))
}

pub async fn retrieve(
    db: &DatabaseConnection,
    requester: &Requester,
    user_id: Uuid,
) -> Result<DevicePermissionsView, ServiceError> {
    Ok(find_visible(db, requester, user_id).await?.into())
}

#[instrument(skip(db, requester), fields(by = %requester.user_id))]
pub async fn create(
    db: &DatabaseConnection,
    requester: &Requester,
    input: DevicePermissionsInput,
) -> Result<DevicePermissionsView, ServiceError> {
    ensure(requester.is_superuser(), "create device permissions")?;
    if facility_user::Entity::find_by_id(input.user).one(db).await?.is_none() {
        return Err(ServiceError::Validation(format!("user: {} does not exist", input.user)));
    }
    if device_permissions::find_by_user(db, input.user).await?.is_some() {
        return Err(ServiceError::Validation("user: device permissions already exist for this user".into()));
    }
    let created = device_permissions::create(db, input.user, input.is_superuser, input.can_manage_content).await?;
    info!(user_id = %created.user_id, is_superuser = created.is_superuser, "device_permissions_created");
    Ok(created.into())
}

#[instrument(skip(db, requester, patch), fields(by = %requester.user_id))]
pub async fn update(
    db: &DatabaseConnection,
    requester: &Requester,
    user_id: Uuid,
    patch: DevicePermissionsPatch,
) -> Result<DevicePermissionsView, ServiceError> {
    let existing = find_visible(db, requester, user_id).await?;
    ensure(requester.is_superuser(), "change device permissions")?;
    if patch.user.is_some_and(|u| u != user_id) {
        return Err(ServiceError::Validation("user: cannot be changed".into()));
    }
    let mut am: device_permissions::ActiveModel = existing.into();
    if let Some(v) = patch.is_superuser { am.is_superuser = Set(v); }
    if let Some(v) = patch.can_manage_content { am.can_manage_content = Set(v); }
    let saved = am.update(db).await?;
    info!(user_id = %saved.user_id, is_superuser = saved.is_superuser, can_manage_content = saved.can_manage_content, "device_permissions_updated");
    Ok(saved.into())
}

/// Full update: every field must be present.
pub async fn replace(
    db: &DatabaseConnection,
    requester: &Requester,
    user_id: Uuid,
    input: DevicePermissionsInput,
) -> Result<DevicePermissionsView, ServiceError> {
    let patch = DevicePermissionsPatch {
        user: Some(input.user),
        is_superuser: Some(input.is_superuser),
        can_manage_content: Some(input.can_manage_content),
    };
    update(db, requester, user_id, patch).await
}

#[instrument(skip(db, requester), fields(by = %requester.user_id))]
pub async fn delete(db: &DatabaseConnection, requester: &Requester, user_id: Uuid) -> Result<(), ServiceError> {
    let existing = find_visible(db, requester, user_id).await?;
    ensure(requester.is_superuser(), "delete device permissions")?;
    device_permissions::Entity::delete_by_id(existing.user_id).exec(db).await?;
    info!(user_id = %user_id, "device_permissions_deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, seed_facility, seed_user};

    #[tokio::test]
    async fn superuser_manages_rows() -> anyhow::Result<()> {
        let db = get_db().await?;
        let facility = seed_facility(&db, "Hub").await?;
        let root = seed_user(&db, facility.id, "root", Some((true, true))).await?;
        let learner = seed_user(&db, facility.id, "learner", None).await?;

        let created = create(
            &db,
            &root,
            DevicePermissionsInput { user: learner.user_id, is_superuser: false, can_manage_content: true },
        )
        .await?;
        assert!(created.can_manage_content);
        assert_eq!(list(&db, &root).await?.len(), 2);

        let dup = create(
            &db,
            &root,
            DevicePermissionsInput { user: learner.user_id, is_superuser: false, can_manage_content: false },
        )
        .await;
        assert!(matches!(dup, Err(ServiceError::Validation(_))));

        let patched = update(
            &db,
            &root,
            learner.user_id,
            DevicePermissionsPatch { can_manage_content: Some(false), ..Default::default() },
        )
        .await?;
        assert!(!patched.can_manage_content);

        delete(&db, &root, learner.user_id).await?;
        assert!(matches!(retrieve(&db, &root, learner.user_id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn others_read_own_row_and_cannot_write() -> anyhow::Result<()> {
        let db = get_db().await?;
        let facility = seed_facility(&db, "Hub").await?;
        let root = seed_user(&db, facility.id, "root", Some((true, true))).await?;
        let manager = seed_user(&db, facility.id, "manager", Some((false, true))).await?;

        let visible = list(&db, &manager).await?;
        assert_eq!(visible, vec![DevicePermissionsView { user: manager.user_id, is_superuser: false, can_manage_content: true }]);
        assert!(matches!(retrieve(&db, &manager, root.user_id).await, Err(ServiceError::NotFound(_))));

        let escalate = update(
            &db,
            &manager,
            manager.user_id,
            DevicePermissionsPatch { is_superuser: Some(true), ..Default::default() },
        )
        .await;
        assert!(matches!(escalate, Err(ServiceError::PermissionDenied(_))));

        let other = seed_user(&db, facility.id, "other", None).await?;
        let res = create(
            &db,
            &manager,
            DevicePermissionsInput { user: other.user_id, is_superuser: true, can_manage_content: true },
        )
        .await;
        assert!(matches!(res, Err(ServiceError::PermissionDenied(_))));
        Ok(())
    }

    #[tokio::test]
    async fn create_requires_existing_user() -> anyhow::Result<()> {
        let db = get_db().await?;
        let facility = seed_facility(&db, "Hub").await?;
        let root = seed_user(&db, facility.id, "root", Some((true, true))).await?;
        let res = create(
            &db,
            &root,
            DevicePermissionsInput { user: Uuid::new_v4(), is_superuser: false, can_manage_content: true },
        )
        .await;
        assert!(matches!(res, Err(ServiceError::Validation(_))));
        Ok(())
    }
}
