//! User Repository
//!
//! The only place password hashes are read or written.

use super::{RepoError, RepoResult};
use shared::models::{User, UserRole};
use sqlx::{SqliteExecutor, SqlitePool};

/// User row including the stored credential
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserCredential {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<UserCredential> for User {
    fn from(row: UserCredential) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            role: row.role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub async fn find_by_id<'e>(executor: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<User>> {
    let row = sqlx::query_as::<_, User>(
        "SELECT id, name, email, role, created_at, updated_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}

pub async fn find_credential_by_email<'e>(
    executor: impl SqliteExecutor<'e>,
    email: &str,
) -> RepoResult<Option<UserCredential>> {
    let row = sqlx::query_as::<_, UserCredential>(
        "SELECT id, name, email, password_hash, role, created_at, updated_at FROM users WHERE email = ? COLLATE NOCASE",
    )
    .bind(email)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}

pub async fn create(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    password_hash: &str,
    role: UserRole,
) -> RepoResult<User> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO users (name, email, password_hash, role, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5) RETURNING id",
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::Duplicate(format!("Email {email} already registered")),
        other => other,
    })?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}
