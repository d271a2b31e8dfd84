//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_collection;
mod m20240301_000002_create_facility_user;
mod m20240301_000003_create_user_credentials;
mod m20240301_000004_create_membership;
mod m20240301_000005_create_role;
mod m20240301_000006_create_device_settings;
mod m20240301_000007_create_device_permissions;
mod m20240301_000008_create_sync_sessions;
mod m20240301_000009_create_user_sync_status;
mod m20240301_000010_create_network_location;
mod m20240301_000011_create_instance_id;
mod m20240301_000099_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_collection::Migration),
            Box::new(m20240301_000002_create_facility_user::Migration),
            Box::new(m20240301_000003_create_user_credentials::Migration),
            Box::new(m20240301_000004_create_membership::Migration),
            Box::new(m20240301_000005_create_role::Migration),
            Box::new(m20240301_000006_create_device_settings::Migration),
            Box::new(m20240301_000007_create_device_permissions::Migration),
            Box::new(m20240301_000008_create_sync_sessions::Migration),
            Box::new(m20240301_000009_create_user_sync_status::Migration),
            Box::new(m20240301_000010_create_network_location::Migration),
            Box::new(m20240301_000011_create_instance_id::Migration),
            // Indexes should always be applied last
            Box::new(m20240301_000099_add_indexes::Migration),
        ]
    }
}
