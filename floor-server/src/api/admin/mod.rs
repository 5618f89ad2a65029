//! Staff routes
//!
//! Table setup, inspection and reset need a manager or admin; the global
//! order listing and the menu catalog are admin only.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::{require_admin, require_staff};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin", routes())
}

fn routes() -> Router<ServerState> {
    let staff_routes = Router::new()
        .route("/tables", get(handler::list_tables).post(handler::create_table))
        .route("/tables/{id}/orders", get(handler::pending_orders))
        .route("/tables/{id}/reset", post(handler::reset_table))
        .layer(middleware::from_fn(require_staff));

    let admin_routes = Router::new()
        .route("/orders", get(handler::list_orders))
        .route("/menu", post(handler::create_menu_item))
        .route("/menu/{id}/availability", put(handler::set_menu_availability))
        .layer(middleware::from_fn(require_admin));

    staff_routes.merge(admin_routes)
}
