use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;

pub const KIND_FACILITY: &str = "facility";
pub const KIND_CLASSROOM: &str = "classroom";
pub const KIND_LEARNER_GROUP: &str = "learnergroup";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "collection")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub kind: String,
    pub parent_id: Option<Uuid>,
    pub preset: Option<String>,
    pub settings: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Parent,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Parent => Entity::belongs_to(Entity).from(Column::ParentId).to(Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_facility(&self) -> bool {
        self.kind == KIND_FACILITY
    }
}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(errors::ModelError::Validation("collection name required".into()));
    }
    if trimmed.chars().count() > 100 {
        return Err(errors::ModelError::Validation("collection name must be at most 100 characters".into()));
    }
    Ok(())
}

/// Create a facility, the root collection users belong to.
pub async fn create_facility<C: ConnectionTrait>(
    db: &C,
    name: &str,
    preset: Option<&str>,
    settings: Json,
) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.trim().to_string()),
        kind: Set(KIND_FACILITY.to_string()),
        parent_id: Set(None),
        preset: Set(preset.map(str::to_string)),
        settings: Set(settings),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

/// Create a classroom or learner group under `parent_id`.
pub async fn create_child<C: ConnectionTrait>(
    db: &C,
    parent_id: Uuid,
    name: &str,
    kind: &str,
) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    if kind != KIND_CLASSROOM && kind != KIND_LEARNER_GROUP {
        return Err(errors::ModelError::Validation(format!("invalid collection kind '{kind}'")));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.trim().to_string()),
        kind: Set(kind.to_string()),
        parent_id: Set(Some(parent_id)),
        preset: Set(None),
        settings: Set(serde_json::json!({})),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}
