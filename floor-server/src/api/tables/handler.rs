//! Table handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{DiningTable, TableAvailability};

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult};

/// GET /api/tables - tables that can be booked right now
pub async fn list_available(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<DiningTable>>>> {
    let tables = state.tables.list_available().await?;
    Ok(Json(ApiResponse::success(tables)))
}

/// GET /api/tables/{id}/availability
pub async fn availability(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<TableAvailability>>> {
    let available = state.tables.is_available(id).await?;
    Ok(Json(ApiResponse::success(TableAvailability {
        table_id: id,
        available,
    })))
}
