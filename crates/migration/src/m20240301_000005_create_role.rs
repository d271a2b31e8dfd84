//! Create `role` table: admin/coach grants over a collection.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Role::Table)
                    .if_not_exists()
                    .col(uuid(Role::Id).primary_key())
                    .col(uuid(Role::UserId).not_null())
                    .col(uuid(Role::CollectionId).not_null())
                    .col(string_len(Role::Kind, 20).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_user")
                            .from(Role::Table, Role::UserId)
                            .to(FacilityUser::Table, FacilityUser::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_collection")
                            .from(Role::Table, Role::CollectionId)
                            .to(Collection::Table, Collection::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Role::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Role { Table, Id, UserId, CollectionId, Kind }

#[derive(DeriveIden)]
enum FacilityUser { Table, Id }

#[derive(DeriveIden)]
enum Collection { Table, Id }
