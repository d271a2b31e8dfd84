use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Written by the sync engine; read here to annotate user sync status.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sync_session")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub active: bool,
    pub last_activity_timestamp: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    TransferSession,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::TransferSession => Entity::has_many(crate::transfer_session::Entity).into(),
        }
    }
}

impl Related<crate::transfer_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransferSession.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
