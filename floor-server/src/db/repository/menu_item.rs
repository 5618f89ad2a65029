//! Menu Item Repository

use super::{RepoError, RepoResult};
use shared::models::{MenuItem, MenuItemCreate};
use sqlx::{SqliteExecutor, SqlitePool};

const COLUMNS: &str =
    "id, name, description, price, category, image_url, is_available, created_at, updated_at";

pub async fn find_all<'e>(executor: impl SqliteExecutor<'e>) -> RepoResult<Vec<MenuItem>> {
    let rows = sqlx::query_as::<_, MenuItem>(&format!(
        "SELECT {COLUMNS} FROM menu_items ORDER BY category, name"
    ))
    .fetch_all(executor)
    .await?;
    Ok(rows)
}

pub async fn find_by_id<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
) -> RepoResult<Option<MenuItem>> {
    let row = sqlx::query_as::<_, MenuItem>(&format!(
        "SELECT {COLUMNS} FROM menu_items WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}

/// Catalog provisioning (`POST /api/admin/menu`)
pub async fn create(pool: &SqlitePool, data: MenuItemCreate) -> RepoResult<MenuItem> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO menu_items (name, description, price, category, image_url, is_available, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(&data.category)
    .bind(&data.image_url)
    .bind(now)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database(sqlx::Error::RowNotFound))
}

/// Withdrawing an item only affects new order lines
pub async fn set_available(pool: &SqlitePool, id: i64, available: bool) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE menu_items SET is_available = ?, updated_at = ? WHERE id = ?")
        .bind(available)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id} not found")));
    }
    Ok(())
}
