//! Shared types for the floor service
//!
//! Models, client DTOs, the unified error system and small utilities used by
//! the server and by any client talking to it.

pub mod client;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};
