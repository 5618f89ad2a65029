//! Data models
//!
//! Shared between the server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix millis.

pub mod dining_table;
pub mod menu_item;
pub mod order;
pub mod user;

// Re-exports
pub use dining_table::*;
pub use menu_item::*;
pub use order::*;
pub use user::*;
