use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Membership: lookups by collection for `member_of` filtering
        manager
            .create_index(
                Index::create()
                    .name("idx_membership_collection")
                    .table(Membership::Table)
                    .col(Membership::CollectionId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_membership_user")
                    .table(Membership::Table)
                    .col(Membership::UserId)
                    .to_owned(),
            )
            .await?;

        // Role: lookups by user when resolving readable users
        manager
            .create_index(
                Index::create()
                    .name("idx_role_user")
                    .table(Role::Table)
                    .col(Role::UserId)
                    .to_owned(),
            )
            .await?;

        // TransferSession: active lookups per sync session
        manager
            .create_index(
                Index::create()
                    .name("idx_transfer_session_sync_active")
                    .table(TransferSession::Table)
                    .col(TransferSession::SyncSessionId)
                    .col(TransferSession::Active)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_facility_user_facility")
                    .table(FacilityUser::Table)
                    .col(FacilityUser::FacilityId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_membership_collection").table(Membership::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_membership_user").table(Membership::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_role_user").table(Role::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_transfer_session_sync_active").table(TransferSession::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_facility_user_facility").table(FacilityUser::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Membership { Table, UserId, CollectionId }

#[derive(DeriveIden)]
enum Role { Table, UserId }

#[derive(DeriveIden)]
enum TransferSession { Table, SyncSessionId, Active }

#[derive(DeriveIden)]
enum FacilityUser { Table, FacilityId }
