//! Device-wide settings and the device name.

use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use models::device_settings;

use crate::errors::ServiceError;

/// Interface languages a device can be set to.
pub const LANGUAGES: &[&str] = &[
    "ar", "bg-bg", "bn-bd", "de", "el", "en", "es-419", "es-es", "fa", "ff-cm", "fr-fr",
    "gu-in", "ha", "hi-in", "ht", "id", "it", "ka", "km", "ko", "mr", "my", "nyn", "pt-br",
    "pt-mz", "sw-tz", "te", "uk", "ur-pk", "vi", "yo", "zh-hans",
];

pub fn is_supported_language(code: &str) -> bool {
    LANGUAGES.contains(&code)
}

/// Hostname of this machine, used as the name of a fresh device.
pub fn default_device_name() -> String {
    match hostname::get() {
        Ok(name) => name.to_string_lossy().to_string(),
        Err(_) => "Unknown Device".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSettingsView {
    pub language_id: Option<String>,
    pub landing_page: String,
    pub allow_guest_access: bool,
    pub allow_peer_unlisted_channel_import: bool,
    pub allow_learner_unassigned_resource_access: bool,
    pub allow_other_browsers_to_connect: bool,
    pub subset_of_users_device: bool,
    pub extra_settings: Value,
}

impl From<device_settings::Model> for DeviceSettingsView {
    fn from(m: device_settings::Model) -> Self {
        Self {
            language_id: m.language_id,
            landing_page: m.landing_page,
            allow_guest_access: m.allow_guest_access,
            allow_peer_unlisted_channel_import: m.allow_peer_unlisted_channel_import,
            allow_learner_unassigned_resource_access: m.allow_learner_unassigned_resource_access,
            allow_other_browsers_to_connect: m.allow_other_browsers_to_connect,
            subset_of_users_device: m.subset_of_users_device,
            extra_settings: m.extra_settings,
        }
    }
}

/// A validated partial update. Absent fields stay untouched.
#[derive(Debug, Default, PartialEq)]
pub struct SettingsPatch {
    pub language_id: Option<Option<String>>,
    pub landing_page: Option<String>,
    pub allow_guest_access: Option<bool>,
    pub allow_peer_unlisted_channel_import: Option<bool>,
    pub allow_learner_unassigned_resource_access: Option<bool>,
    pub allow_other_browsers_to_connect: Option<bool>,
    pub extra_settings: Option<Value>,
}

const BOOL_FIELDS: [&str; 4] = [
    "allow_guest_access",
    "allow_peer_unlisted_channel_import",
    "allow_learner_unassigned_resource_access",
    "allow_other_browsers_to_connect",
];

impl SettingsPatch {
    /// Check every field of `body` and report all problems at once.
    pub fn parse(body: &Value) -> Result<Self, ServiceError> {
        let obj: &Map<String, Value> = body
            .as_object()
            .ok_or_else(|| ServiceError::Validation("expected a JSON object".into()))?;
        let mut patch = SettingsPatch::default();
        let mut errors: Vec<String> = Vec::new();

        match obj.get("language_id") {
            None => {}
            Some(Value::Null) => patch.language_id = Some(None),
            Some(Value::String(code)) if is_supported_language(code) => {
                patch.language_id = Some(Some(code.clone()))
            }
            Some(Value::String(code)) => errors.push(format!("language_id: '{code}' is not a supported language")),
            Some(_) => errors.push("language_id: must be a string".into()),
        }

        match obj.get("landing_page") {
            None => {}
            Some(Value::String(page)) if device_settings::LANDING_PAGES.contains(&page.as_str()) => {
                patch.landing_page = Some(page.clone())
            }
            Some(_) => errors.push(format!(
                "landing_page: must be one of {}",
                device_settings::LANDING_PAGES.join(", ")
            )),
        }

        for field in BOOL_FIELDS {
            let Some(v) = obj.get(field) else { continue };
            let Some(b) = v.as_bool() else {
                errors.push(format!("{field}: must be a boolean"));
                continue;
            };
            let slot = match field {
                "allow_guest_access" => &mut patch.allow_guest_access,
                "allow_peer_unlisted_channel_import" => &mut patch.allow_peer_unlisted_channel_import,
                "allow_learner_unassigned_resource_access" => &mut patch.allow_learner_unassigned_resource_access,
                _ => &mut patch.allow_other_browsers_to_connect,
            };
            *slot = Some(b);
        }

        match obj.get("extra_settings") {
            None => {}
            Some(v @ Value::Object(_)) => patch.extra_settings = Some(v.clone()),
            Some(_) => errors.push("extra_settings: must be a JSON object".into()),
        }

        if errors.is_empty() {
            Ok(patch)
        } else {
            Err(ServiceError::Validation(errors.join("; ")))
        }
    }
}

pub async fn get_settings(db: &DatabaseConnection) -> Result<DeviceSettingsView, ServiceError> {
    let settings = device_settings::get_or_create(db, &default_device_name()).await?;
    Ok(settings.into())
}

/// Validate `body` fully, then apply it; nothing is saved on any error.
#[instrument(skip(db, body))]
pub async fn update_settings(db: &DatabaseConnection, body: &Value) -> Result<DeviceSettingsView, ServiceError> {
    let patch = SettingsPatch::parse(body)?;
    let settings = device_settings::get_or_create(db, &default_device_name()).await?;
    let mut am: device_settings::ActiveModel = settings.into();
    if let Some(v) = patch.language_id { am.language_id = Set(v); }
    if let Some(v) = patch.landing_page { am.landing_page = Set(v); }
    if let Some(v) = patch.allow_guest_access { am.allow_guest_access = Set(v); }
    if let Some(v) = patch.allow_peer_unlisted_channel_import { am.allow_peer_unlisted_channel_import = Set(v); }
    if let Some(v) = patch.allow_learner_unassigned_resource_access { am.allow_learner_unassigned_resource_access = Set(v); }
    if let Some(v) = patch.allow_other_browsers_to_connect { am.allow_other_browsers_to_connect = Set(v); }
    if let Some(v) = patch.extra_settings { am.extra_settings = Set(v); }
    let saved = am.update(db).await?;
    info!(landing_page = %saved.landing_page, "device_settings_updated");
    Ok(saved.into())
}

pub fn validate_device_name(name: Option<&str>) -> Result<String, ServiceError> {
    let name = name.ok_or_else(|| ServiceError::Validation("name: this field is required".into()))?;
    if name.trim().is_empty() {
        return Err(ServiceError::Validation("name: may not be blank".into()));
    }
    if name.chars().count() > device_settings::NAME_MAX_LEN {
        return Err(ServiceError::Validation(format!(
            "name: must be at most {} characters",
            device_settings::NAME_MAX_LEN
        )));
    }
    Ok(name.to_string())
}

pub async fn get_name(db: &DatabaseConnection) -> Result<String, ServiceError> {
    Ok(device_settings::get_or_create(db, &default_device_name()).await?.name)
}

#[instrument(skip(db))]
pub async fn update_name(db: &DatabaseConnection, name: Option<&str>) -> Result<String, ServiceError> {
    let name = validate_device_name(name)?;
    let settings = device_settings::get_or_create(db, &default_device_name()).await?;
    let mut am: device_settings::ActiveModel = settings.into();
    am.name = Set(name);
    let saved = am.update(db).await?;
    info!(name = %saved.name, "device_name_updated");
    Ok(saved.name)
}

/// Facility used for sign-in when the client names none.
pub async fn default_facility_id(db: &DatabaseConnection) -> Result<Option<Uuid>, ServiceError> {
    Ok(device_settings::get_or_create(db, &default_device_name()).await?.default_facility_id)
}
