//! Reservation Coordinator
//!
//! Composes table reservation and order creation so that a table is
//! `reserved` exactly when it has a pending order. Every operation runs in a
//! single store transaction whose first statement is a write; the store's
//! write lock is the only serialization point, so the guarantees hold across
//! several server processes sharing one database file.
//!
//! Catalog lookups and all transactional work run under the coordinator's
//! deadline; the commit runs after it, so `DeadlineExceeded` means nothing
//! was written.
//!
//! # Placing an order on a table you already hold
//!
//! When the table is reserved and one of its pending orders belongs to the
//! caller, the new items are merged into that order and its total is
//! recomputed. The response carries the existing order id and
//! `merged = true`. Anyone else gets `Conflict`.

use std::time::Duration;

use shared::client::{CancelOrderResponse, PlaceOrderResponse, ResetTableResponse};
use shared::models::{NewOrderItem, OrderItem};
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::deadline::{Staged, bounded_commit};
use super::error::{FloorError, FloorResult, StoreContext};
use super::orders;
use super::tables;

#[derive(Clone)]
pub struct ReservationCoordinator {
    pool: SqlitePool,
    deadline: Duration,
}

impl ReservationCoordinator {
    pub fn new(pool: SqlitePool, deadline: Duration) -> Self {
        Self { pool, deadline }
    }

    /// Same coordinator bounded by a caller-supplied deadline
    pub fn with_deadline(&self, deadline: Duration) -> Self {
        Self {
            pool: self.pool.clone(),
            deadline,
        }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Reserve the table and create a pending order for it, or merge into
    /// the caller's own pending order when they already hold the table.
    pub async fn place_order(
        &self,
        user_id: i64,
        table_id: i64,
        items: &[NewOrderItem],
    ) -> FloorResult<PlaceOrderResponse> {
        if table_id <= 0 {
            return Err(FloorError::InvalidInput(format!(
                "table_id must be positive, got {table_id}"
            )));
        }
        bounded_commit(self.deadline, "place_order", async {
            // Pricing happens before the write lock is taken; a bad item
            // never reaches the reservation step.
            let priced = orders::price_items_on(&self.pool, items).await?;
            stage_placement(&self.pool, user_id, table_id, &priced).await
        })
        .await
    }

    /// Placement with lines already priced from the catalog
    pub(super) async fn place_priced(
        &self,
        user_id: i64,
        table_id: i64,
        priced: &[OrderItem],
    ) -> FloorResult<PlaceOrderResponse> {
        bounded_commit(
            self.deadline,
            "place_order",
            stage_placement(&self.pool, user_id, table_id, priced),
        )
        .await
    }

    /// Complete every pending order on the table, then release it
    pub async fn reset_table(&self, table_id: i64) -> FloorResult<ResetTableResponse> {
        let reset = bounded_commit(self.deadline, "reset_table", async {
            let mut tx = self.pool.begin().await.store("begin reset")?;
            let completed = orders::complete_all_on(&mut tx, table_id).await?;
            // Release also proves the table exists; NotFound drops the tx,
            // which undoes the completion above.
            tables::release_on(&mut tx, table_id).await?;
            Ok((
                tx,
                ResetTableResponse {
                    table_id,
                    completed_orders: completed,
                },
            ))
        })
        .await?;
        tracing::info!(table_id, completed = reset.completed_orders, "Table reset");
        Ok(reset)
    }

    /// Cancel a pending order and free its table once nothing is pending on it
    pub async fn cancel_order(&self, order_id: i64) -> FloorResult<CancelOrderResponse> {
        bounded_commit(self.deadline, "cancel_order", async {
            let mut tx = self.pool.begin().await.store("begin cancel")?;
            let table_id = orders::cancel_on(&mut tx, order_id).await?;
            let remaining = orders::pending_count_on(&mut tx, table_id).await?;
            let table_released = remaining == 0;
            if table_released {
                tables::release_on(&mut tx, table_id).await?;
            }
            Ok((
                tx,
                CancelOrderResponse {
                    order_id,
                    table_id,
                    table_released,
                },
            ))
        })
        .await
    }
}

/// Reserve and create, or fall through to the held-table rules. Returns the
/// open transaction for the caller to commit.
async fn stage_placement(
    pool: &SqlitePool,
    user_id: i64,
    table_id: i64,
    priced: &[OrderItem],
) -> FloorResult<Staged<PlaceOrderResponse>> {
    let mut tx = pool.begin().await.store("begin placement")?;
    match tables::reserve_on(&mut tx, table_id, user_id).await {
        Ok(()) => match orders::create_on(&mut tx, user_id, table_id, priced).await {
            Ok(order_id) => Ok((
                tx,
                PlaceOrderResponse {
                    order_id,
                    table_id,
                    merged: false,
                },
            )),
            Err(err) => Err(compensate(tx, table_id, user_id, err).await),
        },
        Err(FloorError::TableOccupied { .. }) => {
            reorder_on_held_table(tx, user_id, table_id, priced).await
        }
        Err(err) => Err(err),
    }
}

/// The table is already reserved. Merge into the caller's pending order if
/// they have one; repair a reservation left without an order if the caller
/// is its occupant; otherwise report the conflict.
async fn reorder_on_held_table(
    mut tx: Transaction<'static, Sqlite>,
    user_id: i64,
    table_id: i64,
    priced: &[OrderItem],
) -> FloorResult<Staged<PlaceOrderResponse>> {
    let pending = orders::pending_for_table_on(&mut tx, table_id).await?;

    if let Some(own) = pending.iter().find(|o| o.user_id == user_id) {
        let order_id = own.id;
        orders::append_on(&mut tx, order_id, priced).await?;
        tracing::info!(order_id, table_id, user_id, "Merging re-order into pending order");
        return Ok((
            tx,
            PlaceOrderResponse {
                order_id,
                table_id,
                merged: true,
            },
        ));
    }

    if pending.is_empty() && tables::occupant_on(&mut tx, table_id).await? == Some(user_id) {
        tracing::warn!(table_id, user_id, "Reserved table had no pending order, re-creating");
        let order_id = orders::create_on(&mut tx, user_id, table_id, priced).await?;
        return Ok((
            tx,
            PlaceOrderResponse {
                order_id,
                table_id,
                merged: false,
            },
        ));
    }

    tracing::info!(table_id, user_id, "Placement rejected, table already booked");
    Err(FloorError::TableOccupied { table_id })
}

/// Undo a fresh reservation whose order could not be written
async fn compensate(
    tx: Transaction<'static, Sqlite>,
    table_id: i64,
    user_id: i64,
    cause: FloorError,
) -> FloorError {
    tracing::warn!(table_id, user_id, error = %cause, "Order creation failed, releasing reservation");
    if let Err(e) = tx.rollback().await {
        // The connection rolls back on its own when returned to the pool
        tracing::error!(table_id, error = %e, "Explicit rollback failed");
    }
    cause
}
