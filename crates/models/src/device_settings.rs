use sea_orm::{entity::prelude::*, sea_query::{Expr, OnConflict}, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{collection, errors};

/// The settings table only ever holds this row.
pub const SINGLETON_ID: i32 = 1;

pub const LANDING_PAGE_HOMEPAGE: &str = "homepage";
pub const LANDING_PAGE_LEARN: &str = "learn";
pub const LANDING_PAGE_SIGN_IN: &str = "sign-in";
pub const LANDING_PAGES: [&str; 3] = [LANDING_PAGE_HOMEPAGE, LANDING_PAGE_LEARN, LANDING_PAGE_SIGN_IN];

pub const NAME_MAX_LEN: usize = 50;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "device_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub is_provisioned: bool,
    pub language_id: Option<String>,
    pub default_facility_id: Option<Uuid>,
    pub landing_page: String,
    pub allow_guest_access: bool,
    pub allow_peer_unlisted_channel_import: bool,
    pub allow_learner_unassigned_resource_access: bool,
    pub name: String,
    pub allow_other_browsers_to_connect: bool,
    pub subset_of_users_device: bool,
    pub extra_settings: Json,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    DefaultFacility,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::DefaultFacility => Entity::belongs_to(collection::Entity)
                .from(Column::DefaultFacilityId)
                .to(collection::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Load the singleton settings row, inserting defaults on first access.
/// `default_name` seeds the device name (normally the hostname).
pub async fn get_or_create<C: ConnectionTrait>(
    db: &C,
    default_name: &str,
) -> Result<Model, errors::ModelError> {
    if let Some(found) = Entity::find_by_id(SINGLETON_ID).one(db).await? {
        return Ok(found);
    }
    let name: String = default_name.chars().take(NAME_MAX_LEN).collect();
    let am = ActiveModel {
        id: Set(SINGLETON_ID),
        is_provisioned: Set(false),
        language_id: Set(None),
        default_facility_id: Set(None),
        landing_page: Set(LANDING_PAGE_HOMEPAGE.to_string()),
        allow_guest_access: Set(true),
        allow_peer_unlisted_channel_import: Set(false),
        allow_learner_unassigned_resource_access: Set(false),
        name: Set(name),
        allow_other_browsers_to_connect: Set(true),
        subset_of_users_device: Set(false),
        extra_settings: Set(serde_json::json!({})),
    };
    // A concurrent first access may have inserted the row already
    Entity::insert(am)
        .on_conflict(OnConflict::column(Column::Id).do_nothing().to_owned())
        .exec_without_returning(db)
        .await?;
    Entity::find_by_id(SINGLETON_ID)
        .one(db)
        .await?
        .ok_or_else(|| errors::ModelError::Db("device settings row missing after insert".into()))
}

/// Flip `is_provisioned` from false to true. Returns false when another
/// caller got there first; the row lock makes this safe inside a transaction.
pub async fn claim_provisioning<C: ConnectionTrait>(db: &C) -> Result<bool, errors::ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::IsProvisioned, Expr::value(true))
        .filter(Column::Id.eq(SINGLETON_ID))
        .filter(Column::IsProvisioned.eq(false))
        .exec(db)
        .await?;
    Ok(res.rows_affected == 1)
}

pub async fn is_provisioned<C: ConnectionTrait>(db: &C) -> Result<bool, errors::ModelError> {
    Ok(Entity::find_by_id(SINGLETON_ID)
        .one(db)
        .await?
        .map(|s| s.is_provisioned)
        .unwrap_or(false))
}
