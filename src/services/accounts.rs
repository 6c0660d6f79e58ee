//! Account management service: registration, authentication, password change

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{Credentials, User},
    repository::Repository,
};

#[derive(Clone)]
pub struct AccountsService {
    repository: Repository,
    config: AuthConfig,
}

impl AccountsService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new account with an empty borrowed list
    pub async fn register(&self, credentials: &Credentials) -> AppResult<User> {
        if self
            .repository
            .users
            .username_exists(&credentials.username)
            .await?
        {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        let hash = hash_password(&credentials.password)?;

        // A concurrent signup slipping past the check above still fails the
        // unique index inside create() and comes back as Conflict.
        self.repository
            .users
            .create(&credentials.username, &hash)
            .await
    }

    /// Authenticate by username and password
    pub async fn authenticate(&self, credentials: &Credentials) -> AppResult<User> {
        let user = match self
            .repository
            .users
            .get_by_username(&credentials.username)
            .await?
        {
            Some(user) => user,
            None => return Err(self.login_failure("No account with this username")),
        };

        if !verify_password(&user.password, &credentials.password)? {
            return Err(self.login_failure("Incorrect password"));
        }

        Ok(user)
    }

    /// Change a user's password, verifying the current one first
    pub async fn change_password(
        &self,
        user_id: i32,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self.repository.users.get_by_id(user_id).await?;

        if !verify_password(&user.password, current_password)? {
            return Err(AppError::Authentication(
                "Current password is incorrect".to_string(),
            ));
        }

        let hash = hash_password(new_password)?;
        self.repository.users.update_password(user_id, &hash).await
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Whether the failure reason is surfaced depends on configuration; the
    /// default is a single generic message for both causes.
    fn login_failure(&self, reason: &str) -> AppError {
        if self.config.distinct_login_errors {
            AppError::Authentication(reason.to_string())
        } else {
            AppError::Authentication("Invalid username or password".to_string())
        }
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
