use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::sync_session;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transfer_session")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sync_session_id: Uuid,
    pub active: bool,
    pub last_activity_timestamp: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    SyncSession,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::SyncSession => Entity::belongs_to(sync_session::Entity)
                .from(Column::SyncSessionId)
                .to(sync_session::Column::Id)
                .into(),
        }
    }
}

impl Related<sync_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SyncSession.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
