use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors, facility_user};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "device_permissions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub is_superuser: bool,
    pub can_manage_content: bool,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(facility_user::Entity)
                .from(Column::UserId)
                .to(facility_user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn has_any(&self) -> bool {
        self.is_superuser || self.can_manage_content
    }
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    is_superuser: bool,
    can_manage_content: bool,
) -> Result<Model, errors::ModelError> {
    let am = ActiveModel {
        user_id: Set(user_id),
        is_superuser: Set(is_superuser),
        can_manage_content: Set(can_manage_content),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_user<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find_by_id(user_id).one(db).await?)
}
