//! Table State Manager
//!
//! Owns the `available <-> reserved` state of each dining table. Reservation
//! is a single conditional update, so two callers racing for the same table
//! are serialized by the store and exactly one of them wins.

use std::time::Duration;

use shared::models::DiningTable;
use sqlx::{SqliteConnection, SqlitePool};

use super::deadline::bounded;
use super::error::{FloorError, FloorResult, StoreContext, non_empty};
use crate::db::repository::{RepoError, dining_table};

#[derive(Clone)]
pub struct TableStateManager {
    pool: SqlitePool,
    deadline: Duration,
}

impl TableStateManager {
    pub fn new(pool: SqlitePool, deadline: Duration) -> Self {
        Self { pool, deadline }
    }

    /// Same manager bounded by a caller-supplied deadline
    pub fn with_deadline(&self, deadline: Duration) -> Self {
        Self {
            pool: self.pool.clone(),
            deadline,
        }
    }

    pub async fn get(&self, table_id: i64) -> FloorResult<DiningTable> {
        bounded(self.deadline, "get table", async {
            dining_table::find_by_id(&self.pool, table_id)
                .await
                .store("load table")?
                .ok_or_else(|| FloorError::table_not_found(table_id))
        })
        .await
    }

    /// Point-in-time read; may be stale by the time the caller acts on it
    pub async fn is_available(&self, table_id: i64) -> FloorResult<bool> {
        Ok(self.get(table_id).await?.is_available())
    }

    pub async fn list_all(&self) -> FloorResult<Vec<DiningTable>> {
        bounded(self.deadline, "list tables", async {
            let tables = dining_table::find_all(&self.pool)
                .await
                .store("list tables")?;
            non_empty(tables, "tables")
        })
        .await
    }

    pub async fn list_available(&self) -> FloorResult<Vec<DiningTable>> {
        bounded(self.deadline, "list available tables", async {
            let tables = dining_table::find_available(&self.pool)
                .await
                .store("list available tables")?;
            non_empty(tables, "available tables")
        })
        .await
    }

    /// Atomically move the table from available to reserved for `user_id`
    pub async fn try_reserve(&self, table_id: i64, user_id: i64) -> FloorResult<()> {
        bounded(self.deadline, "reserve table", async {
            let mut conn = self.pool.acquire().await.store("acquire connection")?;
            reserve_on(&mut conn, table_id, user_id).await
        })
        .await
    }

    /// Mark the table available regardless of its current state
    pub async fn release(&self, table_id: i64) -> FloorResult<()> {
        bounded(self.deadline, "release table", async {
            let mut conn = self.pool.acquire().await.store("acquire connection")?;
            release_on(&mut conn, table_id).await
        })
        .await
    }
}

/// Reserve inside the caller's transaction. The update runs first so the
/// write lock is held before anything is read.
pub(crate) async fn reserve_on(
    conn: &mut SqliteConnection,
    table_id: i64,
    user_id: i64,
) -> FloorResult<()> {
    match dining_table::try_reserve(&mut *conn, table_id, user_id).await {
        Ok(true) => {
            tracing::info!(table_id, user_id, "Table reserved");
            return Ok(());
        }
        Ok(false) => {}
        // occupant_id references users
        Err(RepoError::ForeignKey(_)) => return Err(FloorError::user_not_found(user_id)),
        Err(source) => {
            return Err(FloorError::Store {
                context: "reserve table",
                source,
            });
        }
    }

    match dining_table::find_by_id(&mut *conn, table_id)
        .await
        .store("load table")?
    {
        None => Err(FloorError::table_not_found(table_id)),
        Some(table) => {
            tracing::debug!(
                table_id,
                user_id,
                occupant_id = ?table.occupant_id,
                "Table already reserved"
            );
            Err(FloorError::TableOccupied { table_id })
        }
    }
}

pub(crate) async fn release_on(conn: &mut SqliteConnection, table_id: i64) -> FloorResult<()> {
    if !dining_table::release(&mut *conn, table_id)
        .await
        .store("release table")?
    {
        return Err(FloorError::table_not_found(table_id));
    }
    tracing::info!(table_id, "Table released");
    Ok(())
}

/// Current occupant of a reserved table, read inside the caller's transaction
pub(crate) async fn occupant_on(
    conn: &mut SqliteConnection,
    table_id: i64,
) -> FloorResult<Option<i64>> {
    let table = dining_table::find_by_id(&mut *conn, table_id)
        .await
        .store("load table")?
        .ok_or_else(|| FloorError::table_not_found(table_id))?;
    Ok(table.occupant_id)
}
