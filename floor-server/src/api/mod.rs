//! HTTP API
//!
//! | Module | Prefix | Access |
//! |--------|--------|--------|
//! | [`health`] | `/health` | public |
//! | [`auth`] | `/api/auth` | public (`/me` authenticated) |
//! | [`menu`] | `/api/menu` | public |
//! | [`tables`] | `/api/tables` | public |
//! | [`orders`] | `/api/orders` | authenticated |
//! | [`admin`] | `/api/admin` | staff (order listing: admin) |
//!
//! Every response body is an [`ApiResponse`](crate::utils::ApiResponse) envelope.

pub mod admin;
pub mod auth;
pub mod health;
pub mod menu;
pub mod orders;
pub mod tables;

use axum::Router;
use validator::Validate;

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// All routes, without state or global middleware
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(menu::router())
        .merge(tables::router())
        .merge(orders::router())
        .merge(admin::router())
}

/// Run `validator` rules and report every failed field
pub(crate) fn validate_request<T: Validate>(req: &T) -> AppResult<()> {
    req.validate().map_err(|errors| {
        let fields: Vec<String> = errors.field_errors().keys().map(|k| k.to_string()).collect();
        AppError::validation(errors.to_string()).with_detail("fields", fields)
    })
}
