use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{collection, errors};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "facility_user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub facility_id: Uuid,
    pub username: String,
    pub full_name: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Facility,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Facility => Entity::belongs_to(collection::Entity)
                .from(Column::FacilityId)
                .to(collection::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Usernames: 1..=125 chars of letters, digits, and `@ . + - _`.
pub fn validate_username(username: &str) -> Result<(), errors::ModelError> {
    if username.is_empty() {
        return Err(errors::ModelError::Validation("username required".into()));
    }
    if username.chars().count() > 125 {
        return Err(errors::ModelError::Validation("username must be at most 125 characters".into()));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(errors::ModelError::Validation(
            "username may only contain letters, digits and @.+-_".into(),
        ));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    facility_id: Uuid,
    username: &str,
    full_name: &str,
) -> Result<Model, errors::ModelError> {
    validate_username(username)?;
    if full_name.chars().count() > 120 {
        return Err(errors::ModelError::Validation("full_name must be at most 120 characters".into()));
    }
    if find_by_username(db, facility_id, username).await?.is_some() {
        return Err(errors::ModelError::Validation(format!("username '{username}' already exists in facility")));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        facility_id: Set(facility_id),
        username: Set(username.to_string()),
        full_name: Set(full_name.to_string()),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_username<C: ConnectionTrait>(
    db: &C,
    facility_id: Uuid,
    username: &str,
) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find()
        .filter(Column::FacilityId.eq(facility_id))
        .filter(Column::Username.eq(username))
        .one(db)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::validate_username;

    #[test]
    fn accepts_typical_usernames() {
        assert!(validate_username("admin").is_ok());
        assert!(validate_username("jane.doe+1@school").is_ok());
    }

    #[test]
    fn rejects_blank_and_spaced_usernames() {
        assert!(validate_username("").is_err());
        assert!(validate_username("jane doe").is_err());
        assert!(validate_username(&"x".repeat(126)).is_err());
    }
}
