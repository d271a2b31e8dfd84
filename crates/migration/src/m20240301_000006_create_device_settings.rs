//! Create `device_settings` table.
//!
//! Singleton row (id = 1) holding device-wide configuration.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DeviceSettings::Table)
                    .if_not_exists()
                    .col(integer(DeviceSettings::Id).primary_key())
                    .col(boolean(DeviceSettings::IsProvisioned).not_null())
                    .col(ColumnDef::new(DeviceSettings::LanguageId).string_len(15).null())
                    .col(ColumnDef::new(DeviceSettings::DefaultFacilityId).uuid().null())
                    .col(string_len(DeviceSettings::LandingPage, 10).not_null())
                    .col(boolean(DeviceSettings::AllowGuestAccess).not_null())
                    .col(boolean(DeviceSettings::AllowPeerUnlistedChannelImport).not_null())
                    .col(boolean(DeviceSettings::AllowLearnerUnassignedResourceAccess).not_null())
                    .col(string_len(DeviceSettings::Name, 50).not_null())
                    .col(boolean(DeviceSettings::AllowOtherBrowsersToConnect).not_null())
                    .col(boolean(DeviceSettings::SubsetOfUsersDevice).not_null())
                    .col(json(DeviceSettings::ExtraSettings).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_device_settings_default_facility")
                            .from(DeviceSettings::Table, DeviceSettings::DefaultFacilityId)
                            .to(Collection::Table, Collection::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(DeviceSettings::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum DeviceSettings {
    Table,
    Id,
    IsProvisioned,
    LanguageId,
    DefaultFacilityId,
    LandingPage,
    AllowGuestAccess,
    AllowPeerUnlistedChannelImport,
    AllowLearnerUnassignedResourceAccess,
    Name,
    AllowOtherBrowsersToConnect,
    SubsetOfUsersDevice,
    ExtraSettings,
}

#[derive(DeriveIden)]
enum Collection { Table, Id }
