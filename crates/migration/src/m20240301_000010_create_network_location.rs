//! Create `network_location` table: peers this device knows how to reach.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NetworkLocation::Table)
                    .if_not_exists()
                    .col(uuid(NetworkLocation::Id).primary_key())
                    .col(string_len(NetworkLocation::BaseUrl, 100).not_null())
                    .col(ColumnDef::new(NetworkLocation::InstanceId).string_len(32).null())
                    .col(boolean(NetworkLocation::SubsetOfUsersDevice).not_null())
                    .col(boolean(NetworkLocation::Dynamic).not_null())
                    .col(timestamp_with_time_zone(NetworkLocation::Added).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(NetworkLocation::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum NetworkLocation { Table, Id, BaseUrl, InstanceId, SubsetOfUsersDevice, Dynamic, Added }
