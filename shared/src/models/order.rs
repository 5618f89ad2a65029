//! Order Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order lifecycle state
///
/// `Pending` is the only non-terminal state. Transitions are
/// `Pending -> Completed` and `Pending -> Cancelled`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Invalid order status: {s}")),
        }
    }
}

/// Order line item with the unit price captured when it was ordered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub menu_item_id: i64,
    pub quantity: i32,
    /// Unit price snapshot
    pub price: f64,
}

/// Requested line item (price is always resolved server-side)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub menu_item_id: i64,
    pub quantity: i32,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub table_id: i64,
    pub status: OrderStatus,
    /// Sum of `price * quantity` over `items`
    pub total_price: f64,
    pub created_at: i64,
    pub updated_at: i64,
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("completed".parse::<OrderStatus>(), Ok(OrderStatus::Completed));
        assert_eq!(
            "voided".parse::<OrderStatus>(),
            Err("Invalid order status: voided".to_string())
        );
    }

    #[test]
    fn test_order_deserializes_without_items() {
        let json = r#"{"id":1,"user_id":2,"table_id":3,"status":"pending",
            "total_price":22.0,"created_at":0,"updated_at":0}"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert!(order.is_pending());
        assert!(order.items.is_empty());
    }
}
