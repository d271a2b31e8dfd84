#![cfg(test)]
use sea_orm::DatabaseConnection;
use serde_json::json;
use uuid::Uuid;

use configs::DatabaseConfig;
use models::{collection, device_permissions, facility_user};

use crate::access::Requester;

/// Fresh in-memory database per test; the schema is migrated on connect.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let cfg = DatabaseConfig { url: "sqlite::memory:".into(), ..Default::default() };
    models::db::connect_and_migrate(&cfg).await
}

pub async fn seed_facility(db: &DatabaseConnection, name: &str) -> anyhow::Result<collection::Model> {
    Ok(collection::create_facility(db, name, Some("nonformal"), json!({})).await?)
}

/// Create a user in `facility_id`, optionally granting device permissions
/// `(is_superuser, can_manage_content)`.
pub async fn seed_user(
    db: &DatabaseConnection,
    facility_id: Uuid,
    username: &str,
    perms: Option<(bool, bool)>,
) -> anyhow::Result<Requester> {
    let user = facility_user::create(db, facility_id, username, username).await?;
    let permissions = match perms {
        Some((su, cmc)) => Some(device_permissions::create(db, user.id, su, cmc).await?),
        None => None,
    };
    Ok(Requester {
        user_id: user.id,
        facility_id: user.facility_id,
        username: user.username,
        full_name: user.full_name,
        permissions,
    })
}
