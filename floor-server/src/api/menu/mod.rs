//! Menu catalog (read-only)

use axum::{Json, Router, extract::State, routing::get};
use shared::models::MenuItem;

use crate::core::ServerState;
use crate::db::repository::menu_item;
use crate::utils::{ApiResponse, AppError, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/menu", get(list))
}

/// GET /api/menu
async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<MenuItem>>>> {
    let items = menu_item::find_all(&state.db.pool)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    if items.is_empty() {
        return Err(AppError::no_data("menu items"));
    }
    Ok(Json(ApiResponse::success(items)))
}
