//! Dining Table Repository

use super::{RepoError, RepoResult};
use shared::models::{DiningTable, DiningTableCreate, TableStatus};
use sqlx::{SqliteExecutor, SqlitePool};

const COLUMNS: &str = "id, name, seats, status, occupant_id, created_at, updated_at";

pub async fn find_all<'e>(executor: impl SqliteExecutor<'e>) -> RepoResult<Vec<DiningTable>> {
    let rows = sqlx::query_as::<_, DiningTable>(&format!(
        "SELECT {COLUMNS} FROM dining_tables ORDER BY id"
    ))
    .fetch_all(executor)
    .await?;
    Ok(rows)
}

pub async fn find_available<'e>(
    executor: impl SqliteExecutor<'e>,
) -> RepoResult<Vec<DiningTable>> {
    let rows = sqlx::query_as::<_, DiningTable>(&format!(
        "SELECT {COLUMNS} FROM dining_tables WHERE status = ? ORDER BY id"
    ))
    .bind(TableStatus::Available)
    .fetch_all(executor)
    .await?;
    Ok(rows)
}

pub async fn find_by_id<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
) -> RepoResult<Option<DiningTable>> {
    let row = sqlx::query_as::<_, DiningTable>(&format!(
        "SELECT {COLUMNS} FROM dining_tables WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}

/// New tables start available (`POST /api/admin/tables`)
pub async fn create(pool: &SqlitePool, data: DiningTableCreate) -> RepoResult<DiningTable> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO dining_tables (name, seats, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4) RETURNING id",
    )
    .bind(&data.name)
    .bind(data.seats)
    .bind(TableStatus::Available)
    .bind(now)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database(sqlx::Error::RowNotFound))
}

/// Compare-and-set `available -> reserved`. Returns `false` when the table is
/// missing or already reserved.
pub async fn try_reserve<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
    occupant_id: i64,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE dining_tables SET status = ?1, occupant_id = ?2, updated_at = ?3 WHERE id = ?4 AND status = ?5",
    )
    .bind(TableStatus::Reserved)
    .bind(occupant_id)
    .bind(now)
    .bind(id)
    .bind(TableStatus::Available)
    .execute(executor)
    .await?;
    Ok(rows.rows_affected() == 1)
}

/// Unconditionally mark the table available. Returns `false` only when the
/// table does not exist.
pub async fn release<'e>(executor: impl SqliteExecutor<'e>, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE dining_tables SET status = ?1, occupant_id = NULL, updated_at = ?2 WHERE id = ?3",
    )
    .bind(TableStatus::Available)
    .bind(now)
    .bind(id)
    .execute(executor)
    .await?;
    Ok(rows.rows_affected() > 0)
}
