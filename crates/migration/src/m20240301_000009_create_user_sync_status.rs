//! Create `user_sync_status` table: one row per user, optionally tied to the
//! sync session currently serving that user.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserSyncStatus::Table)
                    .if_not_exists()
                    .col(uuid(UserSyncStatus::Id).primary_key())
                    .col(uuid(UserSyncStatus::UserId).unique_key().not_null())
                    .col(ColumnDef::new(UserSyncStatus::SyncSessionId).uuid().null())
                    .col(boolean(UserSyncStatus::Queued).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_sync_status_user")
                            .from(UserSyncStatus::Table, UserSyncStatus::UserId)
                            .to(FacilityUser::Table, FacilityUser::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_sync_status_sync_session")
                            .from(UserSyncStatus::Table, UserSyncStatus::SyncSessionId)
                            .to(SyncSession::Table, SyncSession::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserSyncStatus::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UserSyncStatus { Table, Id, UserId, SyncSessionId, Queued }

#[derive(DeriveIden)]
enum FacilityUser { Table, Id }

#[derive(DeriveIden)]
enum SyncSession { Table, Id }
