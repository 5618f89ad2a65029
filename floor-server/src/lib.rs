//! Floor Server - restaurant floor service
//!
//! Tables, orders and the coordination between them: a table is booked
//! exactly while it has a pending order, however many server processes
//! share the database.
//!
//! # Module layout
//!
//! ```text
//! floor-server/src/
//! ├── core/    # configuration, state, server lifecycle
//! ├── auth/    # JWT, argon2, middleware, user directory
//! ├── floor/   # table state, order lifecycle, reservation coordinator
//! ├── api/     # HTTP routes and handlers
//! ├── db/      # SQLite pool, migrations, repositories
//! └── utils/   # error re-exports, logging
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod floor;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState, build_app};
pub use floor::{OrderLifecycleManager, ReservationCoordinator, TableStateManager};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use utils::logger::{init_logger, init_logger_with_file};

/// Security event logging under the `security` target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    ______                
   / __/ /___  ____  _____
  / /_/ / __ \/ __ \/ ___/
 / __/ / /_/ / /_/ / /    
/_/ /_/\____/\____/_/     
"#
    );
}
