//! Order handlers
//!
//! The caller is always taken from the access token; a request body never
//! names the user an order belongs to.

use axum::{
    Json,
    extract::{Path, State},
};
use shared::client::{CancelOrderResponse, PlaceOrderRequest, PlaceOrderResponse};
use shared::models::Order;

use crate::api::validate_request;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::security_log;
use crate::utils::{ApiResponse, AppError, AppResult};

/// GET /api/orders - the caller's orders, newest first
pub async fn list_mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let orders = state.orders.get_all_for_user(user.id).await?;
    Ok(Json(ApiResponse::success(orders)))
}

/// POST /api/orders - book a table and order, or add to the caller's open order
pub async fn place(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<PlaceOrderRequest>,
) -> AppResult<Json<ApiResponse<PlaceOrderResponse>>> {
    validate_request(&req)?;
    let placed = state
        .coordinator
        .place_order(user.id, req.table_id, &req.items)
        .await?;
    let message = if placed.merged {
        "Items added to your open order"
    } else {
        "Order placed"
    };
    Ok(Json(ApiResponse::success_with_message(message, placed)))
}

/// GET /api/orders/{id} - owner or staff
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders.get_by_id(id).await?;
    ensure_access(&user, &order)?;
    Ok(Json(ApiResponse::success(order)))
}

/// POST /api/orders/{id}/cancel - owner or staff
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<CancelOrderResponse>>> {
    let order = state.orders.get_by_id(id).await?;
    ensure_access(&user, &order)?;
    let cancelled = state.coordinator.cancel_order(id).await?;
    Ok(Json(ApiResponse::success(cancelled)))
}

fn ensure_access(user: &CurrentUser, order: &Order) -> AppResult<()> {
    if user.can_access(order.user_id) {
        return Ok(());
    }
    security_log!(
        "WARN",
        "order_access_denied",
        user_id = user.id,
        order_id = order.id
    );
    Err(AppError::forbidden("Order belongs to another user"))
}
