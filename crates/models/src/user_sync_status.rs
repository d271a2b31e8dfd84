use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors, facility_user, sync_session};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_sync_status")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub sync_session_id: Option<Uuid>,
    pub queued: bool,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    SyncSession,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(facility_user::Entity)
                .from(Column::UserId)
                .to(facility_user::Column::Id)
                .into(),
            Relation::SyncSession => Entity::belongs_to(sync_session::Entity)
                .from(Column::SyncSessionId)
                .to(sync_session::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    sync_session_id: Option<Uuid>,
    queued: bool,
) -> Result<Model, errors::ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        sync_session_id: Set(sync_session_id),
        queued: Set(queued),
    };
    Ok(am.insert(db).await?)
}
