//! Authentication service: registration, login and token issuance

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use chrono::{Duration, Utc};
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        enums::Role,
        user::{CreateUser, User, UserClaims},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new user and issue a token for them
    pub async fn register(&self, data: &CreateUser) -> AppResult<(User, String)> {
        data.validate()?;

        let password_hash = Self::hash_password(&data.password)?;
        let role = data.role.unwrap_or(Role::Student);

        let user = self
            .repository
            .users
            .create(
                &data.username,
                &password_hash,
                data.email.as_deref(),
                data.first_name.as_deref(),
                data.last_name.as_deref(),
                role,
                data.phone_number.as_deref(),
            )
            .await?;

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    /// Verify credentials and issue a token
    pub async fn login(&self, username: &str, password: &str) -> AppResult<(User, String)> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        let parsed = PasswordHash::new(&user.password)
            .map_err(|e| AppError::Internal(format!("Corrupt password hash: {}", e)))?;

        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_err()
        {
            return Err(AppError::Authentication("Invalid username or password".to_string()));
        }

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    /// Get the user behind a set of claims
    pub async fn current_user(&self, claims: &UserClaims) -> AppResult<User> {
        self.repository.users.get_by_id(claims.user_id).await
    }

    fn issue_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            role: user.role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.config.jwt_expiration_hours as i64)).timestamp(),
        };
        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }
}
