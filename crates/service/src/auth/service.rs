use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use tracing::{info, debug, instrument};

use super::domain::{AuthSession, AuthUser, Claims, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::repository::AuthRepository;

pub const PASSWORD_ALGORITHM: &str = "argon2";

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub password_algorithm: String,
    pub token_ttl_hours: i64,
}

impl AuthConfig {
    pub fn from_app(cfg: &configs::AuthConfig) -> Self {
        Self {
            jwt_secret: Some(cfg.jwt_secret.clone()),
            password_algorithm: PASSWORD_ALGORITHM.into(),
            token_ttl_hours: cfg.token_ttl_hours,
        }
    }

    /// Hashing only; `login` returns no token.
    pub fn without_tokens() -> Self {
        Self { jwt_secret: None, password_algorithm: PASSWORD_ALGORITHM.into(), token_ttl_hours: 0 }
    }
}

/// Hash a password with argon2 and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    if password.is_empty() {
        return Err(AuthError::Validation("password required".into()));
    }
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::HashError(e.to_string()))?
        .to_string())
}

pub fn issue_token(secret: &str, user: &AuthUser, ttl_hours: i64) -> Result<String, AuthError> {
    let exp = (chrono::Utc::now() + chrono::Duration::hours(ttl_hours)).timestamp() as usize;
    let claims = Claims { sub: user.id, fid: user.facility_id, exp };
    encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

/// Verify signature and expiry, returning the claims.
pub fn decode_token(secret: &str, token: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Create a facility user with a hashed password. Provisioning uses this for the
    /// first superuser.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: None, password_algorithm: "argon2".into(), token_ttl_hours: 1 });
    /// let input = RegisterInput { facility_id: uuid::Uuid::new_v4(), username: "learner".into(), full_name: "Learner".into(), password: "pass".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.username, "learner");
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username, facility_id = %input.facility_id))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        if input.username.trim().is_empty() {
            return Err(AuthError::Validation("username required".into()));
        }
        if let Some(existing) = self.repo.find_user_by_facility_username(input.facility_id, &input.username).await? {
            debug!("user exists: {}", existing.username);
            return Err(AuthError::Conflict);
        }
        let hash = hash_password(&input.password)?;

        let user = self.repo.create_user(input.facility_id, &input.username, &input.full_name).await?;
        let _cred = self.repo.upsert_password(user.id, hash, self.cfg.password_algorithm.clone()).await?;
        info!(user_id = %user.id, facility_id = %user.facility_id, username = %user.username, "user_registered");
        Ok(user)
    }

    /// Authenticate a user and optionally issue a token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig { jwt_secret: Some("secret".into()), password_algorithm: "argon2".into(), token_ttl_hours: 1 });
    /// let fid = uuid::Uuid::new_v4();
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { facility_id: fid, username: "coach".into(), full_name: "C".into(), password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { facility_id: fid, username: "coach".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.username, "coach");
    /// assert!(session.token.is_some());
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username, facility_id = %input.facility_id))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_user_by_facility_username(input.facility_id, &input.username)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        let token = match &self.cfg.jwt_secret {
            Some(secret) => Some(issue_token(secret, &user, self.cfg.token_ttl_hours)?),
            None => None,
        };
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user, token })
    }
}
