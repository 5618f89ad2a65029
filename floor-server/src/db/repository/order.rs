//! Order Repository
//!
//! Orders and their line items. Status transitions are conditional updates
//! (`... AND status = 'pending'`) so a lost race shows up as zero affected
//! rows instead of a silent overwrite.

use super::RepoResult;
use shared::models::{Order, OrderItem, OrderStatus};
use sqlx::{SqliteConnection, SqliteExecutor};

const COLUMNS: &str = "id, user_id, table_id, status, total_price, created_at, updated_at";

// ── Writes ───────────────────────────────────────────────────

/// Insert a pending order together with its line items
pub async fn insert(
    conn: &mut SqliteConnection,
    user_id: i64,
    table_id: i64,
    items: &[OrderItem],
    total_price: f64,
) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO orders (user_id, table_id, status, total_price, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5) RETURNING id",
    )
    .bind(user_id)
    .bind(table_id)
    .bind(OrderStatus::Pending)
    .bind(total_price)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;
    insert_items(conn, id, items).await?;
    Ok(id)
}

pub async fn insert_items(
    conn: &mut SqliteConnection,
    order_id: i64,
    items: &[OrderItem],
) -> RepoResult<()> {
    for item in items {
        sqlx::query(
            "INSERT INTO order_items (order_id, menu_item_id, quantity, price) VALUES (?, ?, ?, ?)",
        )
        .bind(order_id)
        .bind(item.menu_item_id)
        .bind(item.quantity)
        .bind(item.price)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Bump `updated_at` on a pending order. Takes the write lock and doubles as
/// the "still pending" check before items are appended.
pub async fn touch_if_pending<'e>(executor: impl SqliteExecutor<'e>, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE orders SET updated_at = ? WHERE id = ? AND status = ?")
        .bind(now)
        .bind(id)
        .bind(OrderStatus::Pending)
        .execute(executor)
        .await?;
    Ok(rows.rows_affected() == 1)
}

pub async fn update_total<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
    total_price: f64,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("UPDATE orders SET total_price = ?, updated_at = ? WHERE id = ?")
        .bind(total_price)
        .bind(now)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

/// `pending -> completed` for every pending order on the table
pub async fn complete_pending_by_table<'e>(
    executor: impl SqliteExecutor<'e>,
    table_id: i64,
) -> RepoResult<u64> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE orders SET status = ?1, updated_at = ?2 WHERE table_id = ?3 AND status = ?4",
    )
    .bind(OrderStatus::Completed)
    .bind(now)
    .bind(table_id)
    .bind(OrderStatus::Pending)
    .execute(executor)
    .await?;
    Ok(rows.rows_affected())
}

/// `pending -> cancelled`. Returns the order's table when the transition
/// happened, `None` when the order is missing or not pending.
pub async fn cancel_if_pending<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
) -> RepoResult<Option<i64>> {
    let now = shared::util::now_millis();
    let table_id: Option<i64> = sqlx::query_scalar(
        "UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4 RETURNING table_id",
    )
    .bind(OrderStatus::Cancelled)
    .bind(now)
    .bind(id)
    .bind(OrderStatus::Pending)
    .fetch_optional(executor)
    .await?;
    Ok(table_id)
}

// ── Reads ────────────────────────────────────────────────────

pub async fn find_status<'e>(
    executor: impl SqliteExecutor<'e>,
    id: i64,
) -> RepoResult<Option<OrderStatus>> {
    let status: Option<OrderStatus> = sqlx::query_scalar("SELECT status FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(status)
}

pub async fn count_pending_by_table<'e>(
    executor: impl SqliteExecutor<'e>,
    table_id: i64,
) -> RepoResult<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE table_id = ? AND status = ?")
            .bind(table_id)
            .bind(OrderStatus::Pending)
            .fetch_one(executor)
            .await?;
    Ok(count)
}

pub async fn find_items<'e>(
    executor: impl SqliteExecutor<'e>,
    order_id: i64,
) -> RepoResult<Vec<OrderItem>> {
    let rows = sqlx::query_as::<_, OrderItem>(
        "SELECT menu_item_id, quantity, price FROM order_items WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(executor)
    .await?;
    Ok(rows)
}

async fn with_items(conn: &mut SqliteConnection, mut orders: Vec<Order>) -> RepoResult<Vec<Order>> {
    for order in &mut orders {
        order.items = find_items(&mut *conn, order.id).await?;
    }
    Ok(orders)
}

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, Order>(&format!("SELECT {COLUMNS} FROM orders WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    match row {
        Some(mut order) => {
            order.items = find_items(&mut *conn, order.id).await?;
            Ok(Some(order))
        }
        None => Ok(None),
    }
}

pub async fn find_by_user(conn: &mut SqliteConnection, user_id: i64) -> RepoResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, Order>(&format!(
        "SELECT {COLUMNS} FROM orders WHERE user_id = ? ORDER BY created_at DESC, id DESC"
    ))
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;
    with_items(conn, rows).await
}

pub async fn find_pending_by_table(
    conn: &mut SqliteConnection,
    table_id: i64,
) -> RepoResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, Order>(&format!(
        "SELECT {COLUMNS} FROM orders WHERE table_id = ? AND status = ? ORDER BY id"
    ))
    .bind(table_id)
    .bind(OrderStatus::Pending)
    .fetch_all(&mut *conn)
    .await?;
    with_items(conn, rows).await
}

pub async fn find_all(conn: &mut SqliteConnection) -> RepoResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, Order>(&format!(
        "SELECT {COLUMNS} FROM orders ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(&mut *conn)
    .await?;
    with_items(conn, rows).await
}
