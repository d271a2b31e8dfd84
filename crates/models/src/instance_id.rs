use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "instance_id")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub platform: String,
    pub hostname: String,
    pub sysversion: String,
    pub database_id: Uuid,
    pub counter: i64,
    pub current: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("instance_id has no relations")
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn find_current<C: ConnectionTrait>(db: &C) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find().filter(Column::Current.eq(true)).one(db).await?)
}
