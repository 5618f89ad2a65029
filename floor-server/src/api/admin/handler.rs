//! Staff handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::client::ResetTableResponse;
use shared::error::ErrorCode;
use shared::models::{
    DiningTable, DiningTableCreate, MenuItem, MenuItemAvailability, MenuItemCreate, Order,
};

use crate::api::validate_request;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, dining_table, menu_item};
use crate::utils::{ApiResponse, AppError, AppResult};

/// GET /api/admin/tables - every table with its status
pub async fn list_tables(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<DiningTable>>>> {
    let tables = state.tables.list_all().await?;
    Ok(Json(ApiResponse::success(tables)))
}

/// POST /api/admin/tables - add a dining table (starts available)
pub async fn create_table(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<DiningTableCreate>,
) -> AppResult<Json<ApiResponse<DiningTable>>> {
    validate_request(&req)?;
    let name = req.name.clone();
    let table = dining_table::create(&state.db.pool, req)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::conflict(format!("Table '{name}' already exists"))
                .with_detail("name", name),
            other => AppError::database(other.to_string()),
        })?;
    tracing::info!(table_id = table.id, by = user.id, "Dining table created");
    Ok(Json(ApiResponse::success(table)))
}

/// GET /api/admin/tables/{id}/orders - pending orders on a table
pub async fn pending_orders(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let orders = state.orders.get_all_pending_for_table(id).await?;
    Ok(Json(ApiResponse::success(orders)))
}

/// POST /api/admin/tables/{id}/reset - complete pending orders, free the table
pub async fn reset_table(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<ResetTableResponse>>> {
    let reset = state.coordinator.reset_table(id).await?;
    tracing::info!(
        table_id = id,
        completed = reset.completed_orders,
        by = user.id,
        "Table reset by staff"
    );
    Ok(Json(ApiResponse::success(reset)))
}

/// GET /api/admin/orders - every order
pub async fn list_orders(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let orders = state.orders.get_all().await?;
    Ok(Json(ApiResponse::success(orders)))
}

/// POST /api/admin/menu - add a catalog entry
pub async fn create_menu_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<MenuItemCreate>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    validate_request(&req)?;
    let item = menu_item::create(&state.db.pool, req)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    tracing::info!(menu_item_id = item.id, price = item.price, by = user.id, "Menu item created");
    Ok(Json(ApiResponse::success(item)))
}

/// PUT /api/admin/menu/{id}/availability - offer or withdraw an item
///
/// Existing orders keep their price snapshot either way.
pub async fn set_menu_availability(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<MenuItemAvailability>,
) -> AppResult<Json<ApiResponse<MenuItemAvailability>>> {
    menu_item::set_available(&state.db.pool, id, req.is_available)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(msg) => {
                AppError::with_message(ErrorCode::MenuItemNotFound, msg).with_detail("id", id)
            }
            other => AppError::database(other.to_string()),
        })?;
    tracing::info!(
        menu_item_id = id,
        is_available = req.is_available,
        by = user.id,
        "Menu item availability changed"
    );
    Ok(Json(ApiResponse::success(req)))
}
