//! Authentication handlers

use std::time::Duration;

use axum::{Json, extract::State};
use shared::client::{LoginRequest, LoginResponse, RegisterRequest};
use shared::models::{User, UserRole};

use crate::api::validate_request;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult};

/// Fixed delay on every login attempt against timing-based enumeration
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/register
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    validate_request(&req)?;
    let user = state
        .users
        .register(&req.name, &req.email, &req.password, UserRole::User)
        .await?;
    Ok(Json(ApiResponse::success(user)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let result = state.users.authenticate(&req.email, &req.password).await;

    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = result?;
    let token = state
        .get_jwt_service()
        .generate_token(&user)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(user_id = user.id, role = %user.role, "User logged in");
    Ok(Json(ApiResponse::success(LoginResponse { token, user })))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<ApiResponse<User>>> {
    let user = state.users.get_user(current.id).await?;
    Ok(Json(ApiResponse::success(user)))
}
