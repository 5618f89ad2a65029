//! Client-facing request/response types shared between server and clients

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{NewOrderItem, User};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email is not valid"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "password must be at least 8 characters"))]
    pub password: String,
}

// =============================================================================
// Order API DTOs
// =============================================================================

/// Place order request (the caller is taken from the access token)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlaceOrderRequest {
    #[validate(range(min = 1, message = "table_id must be positive"))]
    pub table_id: i64,
    #[validate(length(min = 1, message = "order must contain at least one item"))]
    pub items: Vec<NewOrderItem>,
}

/// Result of placing an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrderResponse {
    pub order_id: i64,
    pub table_id: i64,
    /// True when the items were merged into the caller's existing pending order
    pub merged: bool,
}

/// Result of resetting a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetTableResponse {
    pub table_id: i64,
    pub completed_orders: u64,
}

/// Result of cancelling an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOrderResponse {
    pub order_id: i64,
    pub table_id: i64,
    /// True when the cancellation freed the table
    pub table_released: bool,
}
