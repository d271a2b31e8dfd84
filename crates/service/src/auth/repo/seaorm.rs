use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::auth::domain::{AuthUser, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;
use models::errors::ModelError;

/// Works over a pooled connection or an open transaction.
pub struct SeaOrmAuthRepository<'a, C = DatabaseConnection> {
    pub db: &'a C,
}

#[async_trait::async_trait]
impl<'a, C> AuthRepository for SeaOrmAuthRepository<'a, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_user_by_facility_username(&self, facility_id: Uuid, username: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = models::facility_user::Entity::find()
            .filter(models::facility_user::Column::FacilityId.eq(facility_id))
            .filter(models::facility_user::Column::Username.eq(username.to_string()))
            .one(self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(AuthUser::from))
    }

    async fn create_user(&self, facility_id: Uuid, username: &str, full_name: &str) -> Result<AuthUser, AuthError> {
        let created = models::facility_user::create(self.db, facility_id, username, full_name)
            .await
            .map_err(|e| match e {
                ModelError::Validation(msg) => AuthError::Validation(msg),
                ModelError::Db(msg) => AuthError::Repository(msg),
            })?;
        Ok(AuthUser::from(created))
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let res = models::user_credentials::find_by_user(self.db, user_id)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|c| Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm }))
    }

    async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError> {
        let c = models::user_credentials::upsert_password(self.db, user_id, password_hash, &password_algorithm)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm })
    }
}
