//! Who is asking, and what they may see.
//!
//! The HTTP layer resolves a [`Requester`] once per request; the predicates
//! below back the permission classes on each endpoint.

use std::collections::HashSet;

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::Serialize;
use uuid::Uuid;

use models::{device_permissions, facility_user, membership, role};

use crate::errors::ServiceError;

#[derive(Debug, Clone, Serialize)]
pub struct Requester {
    pub user_id: Uuid,
    pub facility_id: Uuid,
    pub username: String,
    pub full_name: String,
    pub permissions: Option<device_permissions::Model>,
}

impl Requester {
    pub fn is_superuser(&self) -> bool {
        self.permissions.as_ref().map(|p| p.is_superuser).unwrap_or(false)
    }

    /// Superusers implicitly manage content.
    pub fn can_manage_content(&self) -> bool {
        self.permissions
            .as_ref()
            .map(|p| p.is_superuser || p.can_manage_content)
            .unwrap_or(false)
    }

    pub fn has_any_device_permissions(&self) -> bool {
        self.permissions.as_ref().map(|p| p.has_any()).unwrap_or(false)
    }
}

/// Fail with `PermissionDenied` unless `allowed`.
pub fn ensure(allowed: bool, action: &str) -> Result<(), ServiceError> {
    if allowed { Ok(()) } else { Err(ServiceError::denied(action)) }
}

/// Load a user with their device permissions; `None` when the user is gone.
pub async fn load_requester(db: &DatabaseConnection, user_id: Uuid) -> Result<Option<Requester>, ServiceError> {
    let Some(user) = facility_user::Entity::find_by_id(user_id).one(db).await? else {
        return Ok(None);
    };
    let permissions = device_permissions::find_by_user(db, user.id).await?;
    Ok(Some(Requester {
        user_id: user.id,
        facility_id: user.facility_id,
        username: user.username,
        full_name: user.full_name,
        permissions,
    }))
}

/// Users whose data the requester may read. `None` means every user.
///
/// Non-superusers see themselves plus the users of each collection they hold
/// an admin or coach role over, matched by facility or by membership.
pub async fn readable_user_ids(
    db: &DatabaseConnection,
    requester: &Requester,
) -> Result<Option<HashSet<Uuid>>, ServiceError> {
    if requester.is_superuser() {
        return Ok(None);
    }
    let mut ids = HashSet::from([requester.user_id]);

    let collections: Vec<Uuid> = role::Entity::find()
        .filter(role::Column::UserId.eq(requester.user_id))
        .filter(role::Column::Kind.is_in([role::KIND_ADMIN, role::KIND_COACH]))
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.collection_id)
        .collect();
    if collections.is_empty() {
        return Ok(Some(ids));
    }

    let by_facility = facility_user::Entity::find()
        .filter(facility_user::Column::FacilityId.is_in(collections.clone()))
        .all(db)
        .await?;
    ids.extend(by_facility.into_iter().map(|u| u.id));

    let by_membership = membership::Entity::find()
        .filter(membership::Column::CollectionId.is_in(collections))
        .all(db)
        .await?;
    ids.extend(by_membership.into_iter().map(|m| m.user_id));

    Ok(Some(ids))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, seed_facility, seed_user};
    use models::collection;

    #[test]
    fn predicates_follow_flags() {
        let mut r = Requester {
            user_id: Uuid::new_v4(),
            facility_id: Uuid::new_v4(),
            username: "u".into(),
            full_name: "U".into(),
            permissions: None,
        };
        assert!(!r.is_superuser() && !r.can_manage_content() && !r.has_any_device_permissions());

        r.permissions = Some(device_permissions::Model { user_id: r.user_id, is_superuser: false, can_manage_content: true });
        assert!(!r.is_superuser());
        assert!(r.can_manage_content());
        assert!(r.has_any_device_permissions());

        r.permissions = Some(device_permissions::Model { user_id: r.user_id, is_superuser: true, can_manage_content: false });
        assert!(r.can_manage_content());

        r.permissions = Some(device_permissions::Model { user_id: r.user_id, is_superuser: false, can_manage_content: false });
        assert!(!r.has_any_device_permissions());
    }

    #[tokio::test]
    async fn coach_reads_classroom_members_only() -> anyhow::Result<()> {
        let db = get_db().await?;
        let facility = seed_facility(&db, "Hub").await?;
        let other_facility = seed_facility(&db, "Elsewhere").await?;
        let class = collection::create_child(&db, facility.id, "Class A", collection::KIND_CLASSROOM).await?;

        let coach = seed_user(&db, facility.id, "coach", None).await?;
        let member = seed_user(&db, facility.id, "member", None).await?;
        let bystander = seed_user(&db, facility.id, "bystander", None).await?;
        let stranger = seed_user(&db, other_facility.id, "stranger", None).await?;
        membership::create(&db, member.user_id, class.id).await?;
        role::create(&db, coach.user_id, class.id, role::KIND_COACH).await?;

        let ids = readable_user_ids(&db, &coach).await?.unwrap_or_default();
        assert!(ids.contains(&coach.user_id));
        assert!(ids.contains(&member.user_id));
        assert!(!ids.contains(&bystander.user_id));
        assert!(!ids.contains(&stranger.user_id));
        Ok(())
    }

    #[tokio::test]
    async fn facility_admin_reads_whole_facility_and_superuser_reads_all() -> anyhow::Result<()> {
        let db = get_db().await?;
        let facility = seed_facility(&db, "Hub").await?;
        let admin = seed_user(&db, facility.id, "admin", None).await?;
        let learner = seed_user(&db, facility.id, "learner", None).await?;
        role::create(&db, admin.user_id, facility.id, role::KIND_ADMIN).await?;

        let ids = readable_user_ids(&db, &admin).await?.unwrap_or_default();
        assert!(ids.contains(&learner.user_id));

        let root = seed_user(&db, facility.id, "root", Some((true, true))).await?;
        assert!(readable_user_ids(&db, &root).await?.is_none());

        let loaded = load_requester(&db, root.user_id).await?.map(|r| r.is_superuser());
        assert_eq!(loaded, Some(true));
        assert!(load_requester(&db, Uuid::new_v4()).await?.is_none());
        Ok(())
    }
}
