//! Authentication and authorization
//!
//! - [`JwtService`] - token issue and validation
//! - [`CurrentUser`] - caller identity from a validated token
//! - [`UserDirectory`] - registration and credential checks
//! - [`require_auth`], [`require_staff`], [`require_admin`] - middleware

pub mod directory;
pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use directory::UserDirectory;
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth, require_staff};
