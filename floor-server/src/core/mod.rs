//! Core module: configuration, state, server lifecycle
//!
//! - [`Config`] - configuration from the environment
//! - [`ServerState`] - shared services handed to every handler
//! - [`Server`] - HTTP server
//! - [`ServerError`] - startup/runtime errors

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::{Server, build_app};
pub use state::ServerState;
