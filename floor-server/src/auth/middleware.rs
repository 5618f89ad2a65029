//! Authentication middleware
//!
//! `require_auth` runs on every request and attaches a [`CurrentUser`] to
//! the request extensions. Route groups add `require_staff` or
//! `require_admin` on top.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::ErrorCode;

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// API routes reachable without a token
const PUBLIC_API_ROUTES: &[&str] = &["/api/auth/login", "/api/auth/register", "/api/menu"];

/// Public routes that also have a public sub-tree (`/api/tables/{id}/availability`)
const PUBLIC_API_PREFIXES: &[&str] = &["/api/tables"];

fn is_public(path: &str) -> bool {
    PUBLIC_API_ROUTES.contains(&path)
        || PUBLIC_API_PREFIXES
            .iter()
            .any(|prefix| path == *prefix || path.starts_with(&format!("{prefix}/")))
}

/// Require a valid bearer token on `/api/` routes except the public ones.
///
/// | Failure | Code |
/// |---------|------|
/// | no `Authorization` header | `NotAuthenticated` (401) |
/// | expired token | `TokenExpired` (401) |
/// | anything else | `TokenInvalid` (401) |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // CORS preflight, non-API routes (health, 404s) and public endpoints
    if req.method() == http::Method::OPTIONS || !path.starts_with("/api/") || is_public(path) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = req.uri().to_string());
            return Err(AppError::unauthorized());
        }
    };

    let user = state
        .get_jwt_service()
        .validate_token(token)
        .and_then(CurrentUser::try_from)
        .map_err(|e| {
            security_log!(
                "WARN",
                "auth_failed",
                error = e.to_string(),
                uri = req.uri().to_string()
            );
            match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            }
        })?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Manager or admin only
pub async fn require_staff(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::unauthorized)?;
    if !user.is_staff() {
        security_log!(
            "WARN",
            "staff_required",
            user_id = user.id,
            user_role = user.role.as_str()
        );
        return Err(AppError::new(ErrorCode::StaffRequired));
    }

    Ok(next.run(req).await)
}

/// Admin only
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::unauthorized)?;
    if !user.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = user.id,
            user_role = user.role.as_str()
        );
        return Err(AppError::new(ErrorCode::AdminRequired));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_routes() {
        assert!(is_public("/api/auth/login"));
        assert!(is_public("/api/menu"));
        assert!(is_public("/api/tables"));
        assert!(is_public("/api/tables/3/availability"));
        assert!(!is_public("/api/tablesX"));
        assert!(!is_public("/api/orders"));
        assert!(!is_public("/api/auth/me"));
        assert!(!is_public("/api/admin/tables"));
    }
}
