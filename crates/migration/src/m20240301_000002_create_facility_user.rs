//! Create `facility_user` table with FK to the owning facility `collection`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FacilityUser::Table)
                    .if_not_exists()
                    .col(uuid(FacilityUser::Id).primary_key())
                    .col(uuid(FacilityUser::FacilityId).not_null())
                    .col(string_len(FacilityUser::Username, 125).not_null())
                    .col(string_len(FacilityUser::FullName, 120).not_null())
                    .col(timestamp_with_time_zone(FacilityUser::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_facility_user_facility")
                            .from(FacilityUser::Table, FacilityUser::FacilityId)
                            .to(Collection::Table, Collection::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Usernames are unique within a facility
        manager
            .create_index(
                Index::create()
                    .name("uniq_facility_user_username")
                    .table(FacilityUser::Table)
                    .col(FacilityUser::FacilityId)
                    .col(FacilityUser::Username)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(FacilityUser::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum FacilityUser { Table, Id, FacilityId, Username, FullName, CreatedAt }

#[derive(DeriveIden)]
enum Collection { Table, Id }
