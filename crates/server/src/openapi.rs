use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct LoginRequestDoc { pub username: String, pub password: String, pub facility: Option<Uuid> }

#[derive(ToSchema)]
pub struct LoginResponseDoc { pub user_id: Uuid, pub username: String, pub full_name: String, pub token: String }

#[derive(ToSchema)]
pub struct SessionDoc {
    pub user_id: Uuid,
    pub facility_id: Uuid,
    pub username: String,
    pub full_name: String,
    pub is_superuser: bool,
    pub can_manage_content: bool,
}

#[derive(ToSchema)]
pub struct FacilityDoc { pub name: String }

#[derive(ToSchema)]
pub struct SuperuserDoc { pub username: String, pub full_name: String, pub password: String }

/// Either `facility` (create) or `facility_id` (reuse) must be present.
#[derive(ToSchema)]
pub struct ProvisionRequestDoc {
    pub facility: Option<FacilityDoc>,
    pub facility_id: Option<Uuid>,
    /// One of `formal`, `nonformal`, `informal`.
    pub preset: String,
    pub superuser: SuperuserDoc,
    pub language_id: String,
    pub device_name: Option<String>,
    #[schema(value_type = Object)]
    pub settings: Option<serde_json::Value>,
    pub allow_guest_access: Option<bool>,
}

#[derive(ToSchema)]
pub struct FreeSpaceDoc { pub freespace: u64 }

#[derive(ToSchema)]
pub struct DeviceInfoDoc {
    pub version: String,
    pub urls: Option<Vec<String>>,
    pub database_path: Option<String>,
    pub device_id: Option<String>,
    pub os: Option<String>,
    pub content_storage_free_space: u64,
    pub server_time: Option<String>,
    pub server_timezone: Option<String>,
    pub installer: Option<String>,
}

#[derive(ToSchema)]
pub struct DeviceSettingsDoc {
    pub language_id: Option<String>,
    /// One of `homepage`, `learn`, `signin`.
    pub landing_page: String,
    pub allow_guest_access: bool,
    pub allow_peer_unlisted_channel_import: bool,
    pub allow_learner_unassigned_resource_access: bool,
    pub allow_other_browsers_to_connect: bool,
    pub subset_of_users_device: bool,
    #[schema(value_type = Object)]
    pub extra_settings: serde_json::Value,
}

#[derive(ToSchema)]
pub struct DeviceNameDoc { pub name: String }

#[derive(ToSchema)]
pub struct DevicePermissionsDoc { pub user: Uuid, pub is_superuser: bool, pub can_manage_content: bool }

#[derive(ToSchema)]
pub struct DevicePermissionsPatchDoc {
    pub user: Option<Uuid>,
    pub is_superuser: Option<bool>,
    pub can_manage_content: Option<bool>,
}

#[derive(ToSchema)]
pub struct UserSyncStatusDoc {
    pub id: Uuid,
    pub user: Uuid,
    pub queued: bool,
    pub last_synced: Option<String>,
    pub active: bool,
    /// `RECENTLY_SYNCED`, `SYNCING`, `QUEUED` or `NOT_RECENTLY_SYNCED`.
    pub status: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::health,
        crate::routes::health::metrics,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::session,
        crate::routes::device::provision,
        crate::routes::device::free_space,
        crate::routes::device::device_info,
        crate::routes::device::get_settings,
        crate::routes::device::patch_settings,
        crate::routes::device::get_name,
        crate::routes::device::patch_name,
        crate::routes::permissions::list,
        crate::routes::permissions::create,
        crate::routes::permissions::retrieve,
        crate::routes::permissions::replace,
        crate::routes::permissions::update,
        crate::routes::permissions::delete,
        crate::routes::sync_status::list,
        crate::routes::sync_status::retrieve,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequestDoc,
            LoginResponseDoc,
            SessionDoc,
            FacilityDoc,
            SuperuserDoc,
            ProvisionRequestDoc,
            FreeSpaceDoc,
            DeviceInfoDoc,
            DeviceSettingsDoc,
            DeviceNameDoc,
            DevicePermissionsDoc,
            DevicePermissionsPatchDoc,
            UserSyncStatusDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "device"),
        (name = "permissions"),
        (name = "sync")
    )
)]
pub struct ApiDoc;
