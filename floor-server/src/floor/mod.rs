//! Floor service core
//!
//! - [`TableStateManager`]: table availability and the reserve/release
//!   compare-and-set
//! - [`OrderLifecycleManager`]: order creation, queries and status transitions
//! - [`ReservationCoordinator`]: reservation plus order placement as one
//!   unit, table reset and cancellation
//!
//! All three hold a clone of the pool and a deadline that bounds each
//! operation; `with_deadline` gives a copy with a caller-supplied bound.

mod coordinator;
mod deadline;
pub mod error;
pub mod money;
mod orders;
mod tables;

#[cfg(test)]
mod tests;

pub use coordinator::ReservationCoordinator;
pub use error::{Entity, ErrorKind, FloorError, FloorResult};
pub use orders::OrderLifecycleManager;
pub use tables::TableStateManager;
