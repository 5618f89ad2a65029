//! Order Lifecycle Manager
//!
//! Creates orders with server-side price snapshots and moves them through
//! `pending -> completed | cancelled`. Cross-entity changes (an order plus
//! its table) go through the [`ReservationCoordinator`](super::ReservationCoordinator);
//! the operations here touch orders only.

use std::collections::HashMap;
use std::time::Duration;

use shared::models::{NewOrderItem, Order, OrderItem};
use sqlx::{SqliteConnection, SqlitePool};

use super::deadline::{bounded, bounded_commit};
use super::error::{FloorError, FloorResult, StoreContext, non_empty};
use super::money;
use crate::db::repository::{RepoError, dining_table, menu_item, order, user};

#[derive(Clone)]
pub struct OrderLifecycleManager {
    pool: SqlitePool,
    deadline: Duration,
}

impl OrderLifecycleManager {
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

    /// Validate requested lines and attach the current catalog price to each
    pub async fn price_items(&self, items: &[NewOrderItem]) -> FloorResult<Vec<OrderItem>> {
        bounded(self.deadline, "price items", price_items_on(&self.pool, items)).await
    }

    /// Create a pending order without touching its table.
    ///
    /// Bypasses reservation: used alone, this leaves a table available while
    /// it has a pending order, or adds a second pending order to a reserved
    /// table. Booking goes through `ReservationCoordinator::place_order`;
    /// `reset_table` and `cancel_order` cope with the extra pending orders.
    pub async fn create(
        &self,
        user_id: i64,
        table_id: i64,
        items: &[NewOrderItem],
    ) -> FloorResult<i64> {
        bounded_commit(self.deadline, "create order", async {
            let priced = price_items_on(&self.pool, items).await?;
            let mut tx = self.pool.begin().await.store("begin order")?;
            let order_id = create_on(&mut tx, user_id, table_id, &priced).await?;
            Ok((tx, order_id))
        })
        .await
    }

    pub async fn get_by_id(&self, order_id: i64) -> FloorResult<Order> {
        bounded(self.deadline, "get order", async {
            let mut conn = self.pool.acquire().await.store("acquire connection")?;
            order::find_by_id(&mut conn, order_id)
                .await
                .store("load order")?
                .ok_or_else(|| FloorError::order_not_found(order_id))
        })
        .await
    }

    pub async fn get_all_for_user(&self, user_id: i64) -> FloorResult<Vec<Order>> {
        bounded(self.deadline, "list user orders", async {
            let mut conn = self.pool.acquire().await.store("acquire connection")?;
            let orders = order::find_by_user(&mut conn, user_id)
                .await
                .store("list user orders")?;
            non_empty(orders, "orders")
        })
        .await
    }

    pub async fn get_all_pending_for_table(&self, table_id: i64) -> FloorResult<Vec<Order>> {
        bounded(self.deadline, "list table orders", async {
            let mut conn = self.pool.acquire().await.store("acquire connection")?;
            let orders = order::find_pending_by_table(&mut conn, table_id)
                .await
                .store("list table orders")?;
            non_empty(orders, "pending orders")
        })
        .await
    }

    pub async fn get_all(&self) -> FloorResult<Vec<Order>> {
        bounded(self.deadline, "list orders", async {
            let mut conn = self.pool.acquire().await.store("acquire connection")?;
            let orders = order::find_all(&mut conn).await.store("list orders")?;
            non_empty(orders, "orders")
        })
        .await
    }

    /// Append lines to a pending order and recompute its total
    pub async fn append_items(&self, order_id: i64, items: &[NewOrderItem]) -> FloorResult<Order> {
        bounded_commit(self.deadline, "append items", async {
            let priced = price_items_on(&self.pool, items).await?;
            let mut tx = self.pool.begin().await.store("begin append")?;
            append_on(&mut tx, order_id, &priced).await?;
            let updated = order::find_by_id(&mut tx, order_id)
                .await
                .store("load order")?
                .ok_or_else(|| FloorError::order_not_found(order_id))?;
            Ok((tx, updated))
        })
        .await
    }

    /// Complete every pending order on the table; returns how many changed
    pub async fn complete_all_for_table(&self, table_id: i64) -> FloorResult<u64> {
        bounded(self.deadline, "complete table orders", async {
            let mut conn = self.pool.acquire().await.store("acquire connection")?;
            complete_all_on(&mut conn, table_id).await
        })
        .await
    }

    /// `pending -> cancelled` for this order only
    pub async fn cancel(&self, order_id: i64) -> FloorResult<i64> {
        bounded(self.deadline, "cancel order", async {
            let mut conn = self.pool.acquire().await.store("acquire connection")?;
            cancel_on(&mut conn, order_id).await
        })
        .await
    }
}

/// Price lines from the catalog, outside any write transaction. The prices
/// read here become the order's price snapshot.
pub(crate) async fn price_items_on(
    pool: &SqlitePool,
    items: &[NewOrderItem],
) -> FloorResult<Vec<OrderItem>> {
    money::validate_items(items)?;

    let mut prices: HashMap<i64, f64> = HashMap::new();
    let mut priced = Vec::with_capacity(items.len());
    for item in items {
        let price = match prices.get(&item.menu_item_id) {
            Some(price) => *price,
            None => {
                let menu = menu_item::find_by_id(pool, item.menu_item_id)
                    .await
                    .store("load menu item")?
                    .ok_or_else(|| {
                        FloorError::InvalidInput(format!(
                            "menu item {} does not exist",
                            item.menu_item_id
                        ))
                    })?;
                if !menu.is_available {
                    return Err(FloorError::InvalidInput(format!(
                        "menu item {} is not available",
                        item.menu_item_id
                    )));
                }
                money::validate_price(menu.id, menu.price)?;
                prices.insert(menu.id, menu.price);
                menu.price
            }
        };
        priced.push(OrderItem {
            menu_item_id: item.menu_item_id,
            quantity: item.quantity,
            price,
        });
    }
    Ok(priced)
}

/// Insert an order inside the caller's transaction. A foreign-key failure is
/// resolved to the missing user or table.
pub(crate) async fn create_on(
    conn: &mut SqliteConnection,
    user_id: i64,
    table_id: i64,
    items: &[OrderItem],
) -> FloorResult<i64> {
    if items.is_empty() {
        return Err(FloorError::InvalidInput(
            "order must contain at least one item".to_string(),
        ));
    }
    let total = money::order_total(items);
    match order::insert(&mut *conn, user_id, table_id, items, total).await {
        Ok(order_id) => {
            tracing::info!(order_id, user_id, table_id, total, "Order created");
            Ok(order_id)
        }
        Err(RepoError::ForeignKey(_)) => Err(missing_reference(conn, user_id, table_id).await),
        Err(e) => Err(FloorError::Store {
            context: "insert order",
            source: e,
        }),
    }
}

async fn missing_reference(conn: &mut SqliteConnection, user_id: i64, table_id: i64) -> FloorError {
    match user::find_by_id(&mut *conn, user_id).await {
        Ok(None) => return FloorError::user_not_found(user_id),
        Ok(Some(_)) => {}
        Err(e) => {
            return FloorError::Store {
                context: "load user",
                source: e,
            };
        }
    }
    match dining_table::find_by_id(&mut *conn, table_id).await {
        Ok(None) => FloorError::table_not_found(table_id),
        Ok(Some(_)) => FloorError::InvalidInput("order references an unknown menu item".into()),
        Err(e) => FloorError::Store {
            context: "load table",
            source: e,
        },
    }
}

/// Append lines and recompute the total from every line on the order.
/// Returns the new total.
pub(crate) async fn append_on(
    conn: &mut SqliteConnection,
    order_id: i64,
    items: &[OrderItem],
) -> FloorResult<f64> {
    if !order::touch_if_pending(&mut *conn, order_id)
        .await
        .store("lock order")?
    {
        return Err(not_pending(conn, order_id).await);
    }
    order::insert_items(&mut *conn, order_id, items)
        .await
        .store("insert order items")?;
    let all_items = order::find_items(&mut *conn, order_id)
        .await
        .store("load order items")?;
    let total = money::order_total(&all_items);
    order::update_total(&mut *conn, order_id, total)
        .await
        .store("update order total")?;
    tracing::info!(order_id, added = items.len(), total, "Items appended to order");
    Ok(total)
}

pub(crate) async fn complete_all_on(conn: &mut SqliteConnection, table_id: i64) -> FloorResult<u64> {
    let completed = order::complete_pending_by_table(&mut *conn, table_id)
        .await
        .store("complete table orders")?;
    tracing::info!(table_id, completed, "Pending orders completed");
    Ok(completed)
}

/// Cancel a pending order; returns the order's table
pub(crate) async fn cancel_on(conn: &mut SqliteConnection, order_id: i64) -> FloorResult<i64> {
    match order::cancel_if_pending(&mut *conn, order_id)
        .await
        .store("cancel order")?
    {
        Some(table_id) => {
            tracing::info!(order_id, table_id, "Order cancelled");
            Ok(table_id)
        }
        None => Err(not_pending(conn, order_id).await),
    }
}

pub(crate) async fn pending_for_table_on(
    conn: &mut SqliteConnection,
    table_id: i64,
) -> FloorResult<Vec<Order>> {
    order::find_pending_by_table(conn, table_id)
        .await
        .store("list table orders")
}

pub(crate) async fn pending_count_on(conn: &mut SqliteConnection, table_id: i64) -> FloorResult<i64> {
    order::count_pending_by_table(&mut *conn, table_id)
        .await
        .store("count table orders")
}

/// Explain why a conditional order update matched nothing
async fn not_pending(conn: &mut SqliteConnection, order_id: i64) -> FloorError {
    match order::find_status(&mut *conn, order_id).await {
        Ok(Some(status)) => FloorError::InvalidState { order_id, status },
        Ok(None) => FloorError::order_not_found(order_id),
        Err(e) => FloorError::Store {
            context: "load order status",
            source: e,
        },
    }
}
