//! Money calculation using rust_decimal
//!
//! Totals are summed as `Decimal` and converted back to `f64` (rounded to
//! 2 decimal places, half away from zero) for storage and serialization.

use rust_decimal::prelude::*;
use shared::models::{NewOrderItem, OrderItem};

use super::error::{FloorError, FloorResult};

/// Rounding precision for monetary values
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i32 = 9999;
/// Maximum number of lines in one request
pub const MAX_LINES: usize = 200;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_else(|| {
            tracing::error!(value = %value, "Decimal not representable as f64, defaulting to zero");
            0.0
        })
}

/// `price * quantity` for one line
pub fn line_total(item: &OrderItem) -> Decimal {
    to_decimal(item.price) * Decimal::from(item.quantity)
}

/// Order total: sum of line totals. Any client-supplied total is ignored.
pub fn order_total(items: &[OrderItem]) -> f64 {
    to_f64(items.iter().map(line_total).sum())
}

/// Reject empty, oversized or non-positive requests before touching the store
pub fn validate_items(items: &[NewOrderItem]) -> FloorResult<()> {
    if items.is_empty() {
        return Err(FloorError::InvalidInput(
            "order must contain at least one item".to_string(),
        ));
    }
    if items.len() > MAX_LINES {
        return Err(FloorError::InvalidInput(format!(
            "order has {} lines, maximum is {}",
            items.len(),
            MAX_LINES
        )));
    }
    for item in items {
        if item.menu_item_id <= 0 {
            return Err(FloorError::InvalidInput(format!(
                "menu_item_id must be positive, got {}",
                item.menu_item_id
            )));
        }
        if item.quantity <= 0 || item.quantity > MAX_QUANTITY {
            return Err(FloorError::InvalidInput(format!(
                "quantity for menu item {} must be between 1 and {}, got {}",
                item.menu_item_id, MAX_QUANTITY, item.quantity
            )));
        }
    }
    Ok(())
}

/// Catalog prices are trusted but still checked before they reach a total
pub fn validate_price(menu_item_id: i64, price: f64) -> FloorResult<()> {
    if !price.is_finite() || price < 0.0 || price > MAX_PRICE {
        return Err(FloorError::InvalidInput(format!(
            "menu item {menu_item_id} has an invalid price {price}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: f64, quantity: i32) -> OrderItem {
        OrderItem {
            menu_item_id: 1,
            quantity,
            price,
        }
    }

    #[test]
    fn test_total_from_lines() {
        let items = vec![item(9.50, 2), item(3.00, 1)];
        assert_eq!(order_total(&items), 22.00);
    }

    #[test]
    fn test_total_avoids_float_drift() {
        let items = vec![item(0.1, 1), item(0.2, 1)];
        assert_eq!(order_total(&items), 0.3);

        let many: Vec<OrderItem> = (0..1000).map(|_| item(0.01, 1)).collect();
        assert_eq!(order_total(&many), 10.0);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(to_f64(Decimal::new(1005, 3)), 1.01);
        assert_eq!(to_f64(Decimal::new(1004, 3)), 1.0);
    }

    #[test]
    fn test_empty_total_is_zero() {
        assert_eq!(order_total(&[]), 0.0);
    }

    #[test]
    fn test_validate_items() {
        let ok = [NewOrderItem {
            menu_item_id: 1,
            quantity: 2,
        }];
        assert!(validate_items(&ok).is_ok());
        assert!(validate_items(&[]).is_err());

        let zero_qty = [NewOrderItem {
            menu_item_id: 1,
            quantity: 0,
        }];
        assert!(matches!(
            validate_items(&zero_qty),
            Err(FloorError::InvalidInput(_))
        ));

        let huge_qty = [NewOrderItem {
            menu_item_id: 1,
            quantity: MAX_QUANTITY + 1,
        }];
        assert!(validate_items(&huge_qty).is_err());

        let bad_id = [NewOrderItem {
            menu_item_id: -4,
            quantity: 1,
        }];
        assert!(validate_items(&bad_id).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(1, 12.5).is_ok());
        assert!(validate_price(1, -0.01).is_err());
        assert!(validate_price(1, f64::NAN).is_err());
        assert!(validate_price(1, MAX_PRICE + 1.0).is_err());
    }
}
