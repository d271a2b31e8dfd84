//! Create `membership` table linking users to collections.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Membership::Table)
                    .if_not_exists()
                    .col(uuid(Membership::Id).primary_key())
                    .col(uuid(Membership::UserId).not_null())
                    .col(uuid(Membership::CollectionId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_membership_user")
                            .from(Membership::Table, Membership::UserId)
                            .to(FacilityUser::Table, FacilityUser::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_membership_collection")
                            .from(Membership::Table, Membership::CollectionId)
                            .to(Collection::Table, Collection::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Membership::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Membership { Table, Id, UserId, CollectionId }

#[derive(DeriveIden)]
enum FacilityUser { Table, Id }

#[derive(DeriveIden)]
enum Collection { Table, Id }
