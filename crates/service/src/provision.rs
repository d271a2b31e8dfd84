//! First-run provisioning: facility, superuser, and device settings in one transaction.

use std::sync::Arc;

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use models::{collection, device_permissions, device_settings, facility_user};

use crate::auth::{
    domain::RegisterInput,
    repo::seaorm::SeaOrmAuthRepository,
    service::{AuthConfig, AuthService},
};
use crate::device::{default_device_name, is_supported_language, validate_device_name};
use crate::errors::ServiceError;

pub const PRESETS: [&str; 3] = ["formal", "nonformal", "informal"];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FacilityInput {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuperuserInput {
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProvisionInput {
    #[serde(default)]
    pub facility: Option<FacilityInput>,
    #[serde(default)]
    pub facility_id: Option<Uuid>,
    pub preset: String,
    pub superuser: SuperuserInput,
    pub language_id: String,
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub settings: Option<Value>,
    #[serde(default)]
    pub allow_guest_access: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProvisionedFacility {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProvisionedSuperuser {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProvisionOutput {
    pub facility: ProvisionedFacility,
    pub preset: String,
    pub superuser: ProvisionedSuperuser,
    pub language_id: String,
    pub device_name: String,
    pub settings: Value,
    pub allow_guest_access: bool,
}

/// Everything that can be checked without touching the database.
pub fn validate(input: &ProvisionInput) -> Result<(), ServiceError> {
    let mut errors: Vec<String> = Vec::new();
    if !PRESETS.contains(&input.preset.as_str()) {
        errors.push(format!("preset: must be one of {}", PRESETS.join(", ")));
    }
    if !is_supported_language(&input.language_id) {
        errors.push(format!("language_id: '{}' is not a supported language", input.language_id));
    }
    match (&input.facility, input.facility_id) {
        (Some(_), Some(_)) => errors.push("facility: give either facility or facility_id, not both".into()),
        (None, None) => errors.push("facility: facility or facility_id is required".into()),
        (Some(f), None) if f.name.trim().is_empty() => errors.push("facility.name: may not be blank".into()),
        _ => {}
    }
    if let Err(e) = facility_user::validate_username(&input.superuser.username) {
        errors.push(format!("superuser.username: {e}"));
    }
    if input.superuser.password.is_empty() {
        errors.push("superuser.password: may not be blank".into());
    }
    if let Some(settings) = &input.settings {
        if !settings.is_object() {
            errors.push("settings: must be a JSON object".into());
        }
    }
    if let Some(name) = &input.device_name {
        if let Err(e) = validate_device_name(Some(name)) {
            errors.push(e.to_string());
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::Validation(errors.join("; ")))
    }
}

pub async fn is_provisioned(db: &DatabaseConnection) -> Result<bool, ServiceError> {
    Ok(device_settings::is_provisioned(db).await?)
}

#[instrument(skip(db, input), fields(preset = %input.preset, username = %input.superuser.username))]
pub async fn provision_device(db: &DatabaseConnection, input: ProvisionInput) -> Result<ProvisionOutput, ServiceError> {
    if is_provisioned(db).await? {
        return Err(ServiceError::PermissionDenied("device is already provisioned".into()));
    }
    validate(&input)?;

    let settings = input.settings.clone().unwrap_or_else(|| json!({}));
    let allow_guest_access = input.allow_guest_access.unwrap_or(input.preset != "formal");

    // the row must exist before the claim below can lock it
    device_settings::get_or_create(db, &default_device_name()).await?;
    let txn = db.begin().await?;
    if !device_settings::claim_provisioning(&txn).await? {
        return Err(ServiceError::PermissionDenied("device is already provisioned".into()));
    }

    let facility = match (&input.facility, input.facility_id) {
        (Some(f), None) => collection::create_facility(&txn, &f.name, Some(&input.preset), settings.clone()).await?,
        (None, Some(id)) => {
            let existing = collection::Entity::find_by_id(id)
                .one(&txn)
                .await?
                .filter(|c| c.is_facility())
                .ok_or_else(|| ServiceError::Validation(format!("facility_id: facility {id} does not exist")))?;
            let mut am: collection::ActiveModel = existing.into();
            am.preset = Set(Some(input.preset.clone()));
            if input.settings.is_some() {
                am.settings = Set(settings.clone());
            }
            am.update(&txn).await?
        }
        _ => return Err(ServiceError::Validation("facility: facility or facility_id is required".into())),
    };

    let superuser = {
        let auth = AuthService::new(Arc::new(SeaOrmAuthRepository { db: &txn }), AuthConfig::without_tokens());
        auth.register(RegisterInput {
            facility_id: facility.id,
            username: input.superuser.username.clone(),
            full_name: input.superuser.full_name.clone(),
            password: input.superuser.password.clone(),
        })
        .await?
    };
    device_permissions::create(&txn, superuser.id, true, true).await?;

    let current = device_settings::get_or_create(&txn, &default_device_name()).await?;
    let mut am: device_settings::ActiveModel = current.into();
    am.language_id = Set(Some(input.language_id.clone()));
    am.default_facility_id = Set(Some(facility.id));
    am.allow_guest_access = Set(allow_guest_access);
    if let Some(name) = &input.device_name {
        am.name = Set(name.clone());
    }
    let saved = am.update(&txn).await?;

    txn.commit().await?;
    info!(facility_id = %facility.id, superuser_id = %superuser.id, "device_provisioned");

    Ok(ProvisionOutput {
        facility: ProvisionedFacility { id: facility.id, name: facility.name },
        preset: input.preset,
        superuser: ProvisionedSuperuser {
            id: superuser.id,
            username: superuser.username,
            full_name: superuser.full_name,
        },
        language_id: input.language_id,
        device_name: saved.name,
        settings: facility.settings,
        allow_guest_access,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, seed_facility, seed_user};
    use models::user_credentials;
    use sea_orm::{ColumnTrait, PaginatorTrait, QueryFilter};

    fn input() -> ProvisionInput {
        ProvisionInput {
            facility: Some(FacilityInput { name: "Riverside".into() }),
            facility_id: None,
            preset: "formal".into(),
            superuser: SuperuserInput { username: "admin".into(), full_name: "Admin".into(), password: "secret".into() },
            language_id: "en".into(),
            device_name: Some("Classroom server".into()),
            settings: Some(json!({"learner_can_sign_up": false})),
            allow_guest_access: None,
        }
    }

    #[test]
    fn validation_reports_each_problem() {
        let mut bad = input();
        bad.preset = "chaotic".into();
        bad.language_id = "zz".into();
        bad.superuser.username = String::new();
        bad.superuser.password = String::new();
        bad.facility_id = Some(Uuid::new_v4());
        let msg = validate(&bad).unwrap_err().to_string();
        for field in ["preset", "language_id", "superuser.username", "superuser.password", "facility"] {
            assert!(msg.contains(field), "missing {field} in {msg}");
        }
    }

    #[tokio::test]
    async fn provisions_once() -> anyhow::Result<()> {
        let db = get_db().await?;
        let out = provision_device(&db, input()).await?;
        assert_eq!(out.facility.name, "Riverside");
        assert_eq!(out.device_name, "Classroom server");
        // formal preset disables guest access by default
        assert!(!out.allow_guest_access);

        let settings = device_settings::get_or_create(&db, "x").await?;
        assert!(settings.is_provisioned);
        assert_eq!(settings.default_facility_id, Some(out.facility.id));
        assert_eq!(settings.language_id.as_deref(), Some("en"));

        let perms = device_permissions::find_by_user(&db, out.superuser.id).await?;
        assert_eq!(perms.map(|p| (p.is_superuser, p.can_manage_content)), Some((true, true)));
        assert!(user_credentials::find_by_user(&db, out.superuser.id).await?.is_some());

        let again = provision_device(&db, input()).await;
        assert!(matches!(again, Err(ServiceError::PermissionDenied(_))));
        Ok(())
    }

    #[tokio::test]
    async fn reuses_existing_facility() -> anyhow::Result<()> {
        let db = get_db().await?;
        let facility = seed_facility(&db, "Existing").await?;
        let mut req = input();
        req.facility = None;
        req.facility_id = Some(facility.id);
        req.preset = "informal".into();
        req.settings = None;
        let out = provision_device(&db, req).await?;
        assert_eq!(out.facility.id, facility.id);
        assert!(out.allow_guest_access);
        let stored = collection::Entity::find_by_id(facility.id).one(&db).await?;
        assert_eq!(stored.and_then(|c| c.preset).as_deref(), Some("informal"));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_facility_id_rolls_back() -> anyhow::Result<()> {
        let db = get_db().await?;
        let mut req = input();
        req.facility = None;
        req.facility_id = Some(Uuid::new_v4());
        assert!(matches!(provision_device(&db, req).await, Err(ServiceError::Validation(_))));
        assert!(!device_settings::is_provisioned(&db).await?);
        let users = facility_user::Entity::find()
            .filter(facility_user::Column::Username.eq("admin"))
            .all(&db)
            .await?;
        assert!(users.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_provisioning_admits_one() -> anyhow::Result<()> {
        let db = get_db().await?;
        let mut other = input();
        other.facility = Some(FacilityInput { name: "Hillside".into() });
        other.superuser.username = "second".into();

        let (a, b) = tokio::join!(provision_device(&db, input()), provision_device(&db, other));
        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1, "exactly one provisioning wins");
        let loser = if a.is_ok() { b } else { a };
        assert!(matches!(loser, Err(ServiceError::PermissionDenied(_))));

        assert_eq!(facility_user::Entity::find().count(&db).await?, 1);
        let facilities = collection::Entity::find()
            .filter(collection::Column::Kind.eq(collection::KIND_FACILITY))
            .count(&db)
            .await?;
        assert_eq!(facilities, 1);
        Ok(())
    }

    #[tokio::test]
    async fn existing_username_in_reused_facility_conflicts() -> anyhow::Result<()> {
        let db = get_db().await?;
        let facility = seed_facility(&db, "Existing").await?;
        seed_user(&db, facility.id, "admin", None).await?;
        let mut req = input();
        req.facility = None;
        req.facility_id = Some(facility.id);
        assert!(matches!(provision_device(&db, req).await, Err(ServiceError::Conflict(_))));
        // the claim rolled back with everything else
        assert!(!device_settings::is_provisioned(&db).await?);
        Ok(())
    }
}
