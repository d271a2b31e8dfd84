//! Identity of this installation, derived from its system attributes.

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use sha2::{Digest, Sha256};
use tracing::{info, instrument};
use uuid::Uuid;

use models::instance_id;

use crate::device::default_device_name;
use crate::errors::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemAttributes {
    pub platform: String,
    pub hostname: String,
    pub sysversion: String,
    pub database_id: Uuid,
}

impl SystemAttributes {
    pub fn detect(database_id: Uuid) -> Self {
        Self {
            platform: format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
            hostname: default_device_name(),
            sysversion: crate::VERSION.to_string(),
            database_id,
        }
    }

    /// First 32 hex characters of the SHA-256 over all attributes.
    pub fn instance_id(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.platform.as_bytes());
        hasher.update(b":");
        hasher.update(self.hostname.as_bytes());
        hasher.update(b":");
        hasher.update(self.sysversion.as_bytes());
        hasher.update(b":");
        hasher.update(self.database_id.as_bytes());
        let mut id = hex::encode(hasher.finalize());
        id.truncate(32);
        id
    }
}

/// Return the current instance row, creating it when the attributes changed.
/// The flag is `true` when a new row was inserted.
pub async fn get_or_create_current_instance(db: &DatabaseConnection) -> Result<(instance_id::Model, bool), ServiceError> {
    let database_id = instance_id::find_current(db)
        .await?
        .map(|m| m.database_id)
        .unwrap_or_else(Uuid::new_v4);
    get_or_create_for(db, SystemAttributes::detect(database_id)).await
}

#[instrument(skip(db, attrs), fields(platform = %attrs.platform))]
pub async fn get_or_create_for(
    db: &DatabaseConnection,
    attrs: SystemAttributes,
) -> Result<(instance_id::Model, bool), ServiceError> {
    let id = attrs.instance_id();
    let txn = db.begin().await?;

    instance_id::Entity::update_many()
        .col_expr(instance_id::Column::Current, Expr::value(false))
        .filter(instance_id::Column::Id.ne(id.clone()))
        .exec(&txn)
        .await?;

    let result = match instance_id::Entity::find_by_id(id.clone()).one(&txn).await? {
        Some(existing) if existing.current => (existing, false),
        Some(existing) => {
            let mut am: instance_id::ActiveModel = existing.into();
            am.current = Set(true);
            (am.update(&txn).await?, false)
        }
        None => {
            let am = instance_id::ActiveModel {
                id: Set(id),
                platform: Set(attrs.platform),
                hostname: Set(attrs.hostname),
                sysversion: Set(attrs.sysversion),
                database_id: Set(attrs.database_id),
                counter: Set(0),
                current: Set(true),
                created_at: Set(Utc::now().into()),
            };
            let created = am.insert(&txn).await?;
            info!(instance_id = %created.id, "instance_id_created");
            (created, true)
        }
    };
    txn.commit().await?;
    Ok(result)
}
