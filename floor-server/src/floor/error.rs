//! Floor service errors
//!
//! Every failure of the table, order and coordination operations is one of
//! six kinds (see [`ErrorKind`]). Callers match on the kind; the variants
//! carry the context needed for messages and error details.

use std::fmt;

use shared::error::{AppError, ErrorCode};
use shared::models::OrderStatus;
use thiserror::Error;

use crate::db::repository::RepoError;

/// Error classification exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Referenced table, order or user is absent
    NotFound,
    /// Table already booked by someone else
    Conflict,
    /// Malformed or out-of-range request data
    InvalidInput,
    /// Transition attempted from a non-permitting state
    InvalidState,
    /// A listing query matched nothing
    EmptyResult,
    /// The store failed or did not answer in time
    StoreUnavailable,
}

/// Entity named by a [`FloorError::NotFound`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Table,
    Order,
    User,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "Table"),
            Self::Order => write!(f, "Order"),
            Self::User => write!(f, "User"),
        }
    }
}

#[derive(Debug, Error)]
pub enum FloorError {
    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: i64 },

    #[error("Table {table_id} is already booked")]
    TableOccupied { table_id: i64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Order {order_id} is {status}, expected pending")]
    InvalidState { order_id: i64, status: OrderStatus },

    #[error("No {0} found")]
    EmptyResult(&'static str),

    #[error("Store error during {context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: RepoError,
    },

    #[error("{context} did not finish within {after_ms}ms")]
    DeadlineExceeded { context: &'static str, after_ms: u64 },
}

impl FloorError {
    pub fn table_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: Entity::Table,
            id,
        }
    }

    pub fn order_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: Entity::Order,
            id,
        }
    }

    pub fn user_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: Entity::User,
            id,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::TableOccupied { .. } => ErrorKind::Conflict,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            Self::EmptyResult(_) => ErrorKind::EmptyResult,
            Self::Store { .. } | Self::DeadlineExceeded { .. } => ErrorKind::StoreUnavailable,
        }
    }
}

/// Result type for floor operations
pub type FloorResult<T> = Result<T, FloorError>;

/// Attach an operation name to a store failure
pub(crate) trait StoreContext<T> {
    fn store(self, context: &'static str) -> FloorResult<T>;
}

impl<T, E: Into<RepoError>> StoreContext<T> for Result<T, E> {
    fn store(self, context: &'static str) -> FloorResult<T> {
        self.map_err(|e| FloorError::Store {
            context,
            source: e.into(),
        })
    }
}

/// Empty listings are an error, not an empty array
pub(crate) fn non_empty<T>(rows: Vec<T>, what: &'static str) -> FloorResult<Vec<T>> {
    if rows.is_empty() {
        Err(FloorError::EmptyResult(what))
    } else {
        Ok(rows)
    }
}

impl From<FloorError> for AppError {
    fn from(err: FloorError) -> Self {
        let message = err.to_string();
        match err {
            FloorError::NotFound { entity, id } => {
                let code = match entity {
                    Entity::Table => ErrorCode::TableNotFound,
                    Entity::Order => ErrorCode::OrderNotFound,
                    Entity::User => ErrorCode::UserNotFound,
                };
                AppError::with_message(code, message).with_detail("id", id)
            }
            FloorError::TableOccupied { table_id } => {
                AppError::with_message(ErrorCode::TableOccupied, message)
                    .with_detail("table_id", table_id)
            }
            FloorError::InvalidInput(msg) => AppError::validation(msg),
            FloorError::InvalidState { order_id, status } => {
                let code = match status {
                    OrderStatus::Completed => ErrorCode::OrderAlreadyCompleted,
                    OrderStatus::Cancelled => ErrorCode::OrderAlreadyCancelled,
                    OrderStatus::Pending => ErrorCode::OrderNotPending,
                };
                AppError::with_message(code, message)
                    .with_detail("order_id", order_id)
                    .with_detail("status", status.as_str())
            }
            FloorError::EmptyResult(what) => AppError::no_data(what),
            FloorError::Store { context, source } => {
                tracing::error!(context, error = %source, "Floor store error");
                if source.is_transient() {
                    AppError::new(ErrorCode::StoreUnavailable)
                } else {
                    AppError::new(ErrorCode::DatabaseError)
                }
            }
            FloorError::DeadlineExceeded { context, after_ms } => {
                tracing::warn!(context, after_ms, "Floor operation deadline exceeded");
                AppError::new(ErrorCode::TimeoutError)
            }
        }
    }
}
