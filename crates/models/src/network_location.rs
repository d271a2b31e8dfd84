use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;

/// A peer device this node has seen, statically added or discovered.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "network_location")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub base_url: String,
    pub instance_id: Option<String>,
    pub subset_of_users_device: bool,
    pub dynamic: bool,
    pub added: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("network_location has no relations")
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Whether any dynamically discovered peer holds full facility data,
/// i.e. is not itself a subset-of-users device.
pub async fn any_full_facility_peer<C: ConnectionTrait>(db: &C) -> Result<bool, errors::ModelError> {
    let found = Entity::find()
        .filter(Column::Dynamic.eq(true))
        .filter(Column::SubsetOfUsersDevice.eq(false))
        .one(db)
        .await?;
    Ok(found.is_some())
}
