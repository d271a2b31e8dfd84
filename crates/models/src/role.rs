use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{collection, errors, facility_user};

pub const KIND_ADMIN: &str = "admin";
pub const KIND_COACH: &str = "coach";

/// A role grants its holder read access over the users of a collection.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "role")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub collection_id: Uuid,
    pub kind: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Collection,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(facility_user::Entity)
                .from(Column::UserId)
                .to(facility_user::Column::Id)
                .into(),
            Relation::Collection => Entity::belongs_to(collection::Entity)
                .from(Column::CollectionId)
                .to(collection::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    collection_id: Uuid,
    kind: &str,
) -> Result<Model, errors::ModelError> {
    if kind != KIND_ADMIN && kind != KIND_COACH {
        return Err(errors::ModelError::Validation(format!("invalid role kind '{kind}'")));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        collection_id: Set(collection_id),
        kind: Set(kind.to_string()),
    };
    Ok(am.insert(db).await?)
}
