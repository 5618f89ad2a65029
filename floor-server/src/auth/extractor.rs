//! `CurrentUser` extractor
//!
//! Handlers behind `require_auth` take `CurrentUser` as an argument; the
//! user was validated by the middleware and is read from the extensions.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        // Route mounted outside the middleware: validate here
        let token = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(JwtService::extract_from_header)
            .ok_or_else(|| {
                security_log!("WARN", "auth_missing", uri = parts.uri.to_string());
                AppError::unauthorized()
            })?;

        let user = state
            .get_jwt_service()
            .validate_token(token)
            .and_then(CurrentUser::try_from)
            .map_err(|e| match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                other => AppError::invalid_token(other.to_string()),
            })?;

        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
