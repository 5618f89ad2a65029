//! Dining Table Model

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Occupancy state of a dining table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum TableStatus {
    /// Free to be booked
    #[default]
    Available,
    /// Held by a customer with a pending order
    Reserved,
}

impl TableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Reserved => "reserved",
        }
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TableStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "reserved" => Ok(Self::Reserved),
            _ => Err(format!("Invalid table status: {s}")),
        }
    }
}

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: i64,
    pub name: String,
    pub seats: i32,
    pub status: TableStatus,
    /// User holding the reservation, `None` while available
    pub occupant_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl DiningTable {
    pub fn is_available(&self) -> bool {
        self.status == TableStatus::Available
    }
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DiningTableCreate {
    #[validate(length(min = 1, max = 50, message = "name is required"))]
    pub name: String,
    #[validate(range(min = 1, max = 100, message = "seats must be between 1 and 100"))]
    pub seats: i32,
}

/// Availability check result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableAvailability {
    pub table_id: i64,
    pub available: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip_through_str() {
        for status in [TableStatus::Available, TableStatus::Reserved] {
            assert_eq!(status.to_string().parse::<TableStatus>(), Ok(status));
        }
        assert!("occupied".parse::<TableStatus>().is_err());
    }

    #[test]
    fn test_status_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&TableStatus::Reserved).unwrap(),
            "\"reserved\""
        );
        assert_eq!(TableStatus::default(), TableStatus::Available);
    }

    #[test]
    fn test_create_payload_validation() {
        let ok = DiningTableCreate {
            name: "Patio 1".to_string(),
            seats: 4,
        };
        assert!(ok.validate().is_ok());

        let errors = DiningTableCreate {
            name: String::new(),
            seats: 0,
        }
        .validate()
        .unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("seats"));
    }
}
