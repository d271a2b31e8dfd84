//! Create `instance_id` table recording each identity this installation has had.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InstanceId::Table)
                    .if_not_exists()
                    .col(string_len(InstanceId::Id, 32).primary_key())
                    .col(string_len(InstanceId::Platform, 100).not_null())
                    .col(string_len(InstanceId::Hostname, 100).not_null())
                    .col(string_len(InstanceId::Sysversion, 100).not_null())
                    .col(uuid(InstanceId::DatabaseId).not_null())
                    .col(big_integer(InstanceId::Counter).not_null())
                    .col(boolean(InstanceId::Current).not_null())
                    .col(timestamp_with_time_zone(InstanceId::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(InstanceId::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum InstanceId { Table, Id, Platform, Hostname, Sysversion, DatabaseId, Counter, Current, CreatedAt }
