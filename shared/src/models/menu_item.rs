//! Menu Item Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Menu catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image_url: Option<String>,
    /// Whether the item can currently be ordered
    pub is_available: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MenuItemCreate {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0.0, max = 100000.0, message = "price must be between 0 and 100000"))]
    pub price: f64,
    #[validate(length(min = 1, max = 50, message = "category is required"))]
    pub category: String,
    pub image_url: Option<String>,
}

/// Toggle whether a menu item can be ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemAvailability {
    pub is_available: bool,
}
