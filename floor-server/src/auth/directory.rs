//! User directory
//!
//! Registration, credential checks and profile lookup. Password hashes never
//! leave this module and the user repository.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{User, UserRole};
use sqlx::SqlitePool;

use super::password;
use crate::db::repository::{RepoError, user};

#[derive(Clone)]
pub struct UserDirectory {
    pool: SqlitePool,
}

impl UserDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a user with the given role. Emails are compared case-insensitively.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> AppResult<User> {
        let email = email.trim().to_lowercase();
        let hash = password::hash_password(password)
            .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

        match user::create(&self.pool, name.trim(), &email, &hash, role).await {
            Ok(created) => {
                tracing::info!(user_id = created.id, role = %created.role, "User registered");
                Ok(created)
            }
            Err(RepoError::Duplicate(msg)) => {
                Err(AppError::with_message(ErrorCode::UserEmailExists, msg).with_detail("email", email))
            }
            Err(e) => Err(AppError::database(e.to_string())),
        }
    }

    /// Check credentials. Unknown email and wrong password are the same error.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let email = email.trim().to_lowercase();
        let credential = user::find_credential_by_email(&self.pool, &email)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        let Some(credential) = credential else {
            crate::security_log!("WARN", "login_unknown_email", email = email.clone());
            return Err(AppError::invalid_credentials());
        };

        let valid = password::verify_password(password, &credential.password_hash)
            .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
        if !valid {
            crate::security_log!("WARN", "login_bad_password", user_id = credential.id);
            return Err(AppError::invalid_credentials());
        }

        Ok(credential.into())
    }

    pub async fn get_user(&self, id: i64) -> AppResult<User> {
        user::find_by_id(&self.pool, id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::UserNotFound, format!("User {id} not found"))
                    .with_detail("id", id)
            })
    }
}
