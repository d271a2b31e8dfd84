//! Create `device_permissions` table, keyed by the user it grants to.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DevicePermissions::Table)
                    .if_not_exists()
                    .col(uuid(DevicePermissions::UserId).primary_key())
                    .col(boolean(DevicePermissions::IsSuperuser).not_null())
                    .col(boolean(DevicePermissions::CanManageContent).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_device_permissions_user")
                            .from(DevicePermissions::Table, DevicePermissions::UserId)
                            .to(FacilityUser::Table, FacilityUser::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DevicePermissions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DevicePermissions { Table, UserId, IsSuperuser, CanManageContent }

#[derive(DeriveIden)]
enum FacilityUser { Table, Id }
