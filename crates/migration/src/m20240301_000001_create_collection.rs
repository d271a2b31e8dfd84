//! Create `collection` table.
//!
//! Facilities, classrooms and learner groups share this table; `parent_id`
//! points at the enclosing collection.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Collection::Table)
                    .if_not_exists()
                    .col(uuid(Collection::Id).primary_key())
                    .col(string_len(Collection::Name, 100).not_null())
                    .col(string_len(Collection::Kind, 20).not_null())
                    .col(ColumnDef::new(Collection::ParentId).uuid().null())
                    .col(ColumnDef::new(Collection::Preset).string_len(32).null())
                    .col(json(Collection::Settings).not_null())
                    .col(timestamp_with_time_zone(Collection::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_collection_parent")
                            .from(Collection::Table, Collection::ParentId)
                            .to(Collection::Table, Collection::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Collection::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Collection { Table, Id, Name, Kind, ParentId, Preset, Settings, CreatedAt }
