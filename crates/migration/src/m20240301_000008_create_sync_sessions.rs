//! Create `sync_session` and `transfer_session` tables.
//! Both are written by the sync engine; this service only reads them.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SyncSession::Table)
                    .if_not_exists()
                    .col(uuid(SyncSession::Id).primary_key())
                    .col(boolean(SyncSession::Active).not_null())
                    .col(timestamp_with_time_zone(SyncSession::LastActivityTimestamp).not_null())
                    .col(timestamp_with_time_zone(SyncSession::CreatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TransferSession::Table)
                    .if_not_exists()
                    .col(uuid(TransferSession::Id).primary_key())
                    .col(uuid(TransferSession::SyncSessionId).not_null())
                    .col(boolean(TransferSession::Active).not_null())
                    .col(timestamp_with_time_zone(TransferSession::LastActivityTimestamp).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transfer_session_sync_session")
                            .from(TransferSession::Table, TransferSession::SyncSessionId)
                            .to(SyncSession::Table, SyncSession::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(TransferSession::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(SyncSession::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum SyncSession { Table, Id, Active, LastActivityTimestamp, CreatedAt }

#[derive(DeriveIden)]
enum TransferSession { Table, Id, SyncSessionId, Active, LastActivityTimestamp }
