// src/handlers/user.rs
use axum::{extract::State, http::StatusCode, Extension, Json};
use bcrypt::{hash, verify, DEFAULT_COST};

use crate::auth::jwt::{sign_token, TOKEN_LIFETIME_HOURS};
use crate::dtos::user::{LoginRequest, LoginResponse, MeResponse, RegisterUserRequest, UserResponse};
use crate::error::{map_unique_violation, AppError};
use crate::middleware::auth::AuthContext;
use crate::models::user::User;
use crate::state::AppState;

pub async fn register_user(
    State(AppState { db_pool }): State<AppState>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    // Basic validation
    if payload.role != "admin" && payload.role != "staff" {
        return Err(AppError::validation("Invalid role"));
    }
    if payload.username.trim().is_empty() {
        return Err(AppError::validation("Username required"));
    }
    if payload.password.len() < 6 {
        return Err(AppError::validation("Password too short"));
    }

    let password_hash = hash(&payload.password, DEFAULT_COST)
        .map_err(|e| AppError::internal(format!("Hash error: {e}")))?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, password_hash, role)
         VALUES ($1, $2, $3)
         RETURNING id, username, password_hash, role, is_active, created_at",
    )
    .bind(payload.username.trim())
    .bind(&password_hash)
    .bind(&payload.role)
    .fetch_one(&db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "Username already exists"))?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id: user.id,
            username: user.username,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
        }),
    ))
}

pub async fn login_user(
    State(AppState { db_pool }): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::validation("Username required"));
    }
    if payload.password.is_empty() {
        return Err(AppError::validation("Password required"));
    }

    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, role, is_active, created_at
         FROM users WHERE username = $1",
    )
    .bind(&payload.username)
    .fetch_optional(&db_pool)
    .await?
    .ok_or(AppError::Unauthorized)?;

    if !user.is_active {
        return Err(AppError::forbidden("Account is deactivated"));
    }

    let valid = verify(&payload.password, &user.password_hash)
        .map_err(|e| AppError::internal(format!("Verify error: {e}")))?;
    if !valid {
        return Err(AppError::Unauthorized);
    }

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::internal("JWT_SECRET not configured"))?;
    let access_token = sign_token(user.id, &user.role, &user.username, &secret)?;

    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer",
        expires_in_seconds: (TOKEN_LIFETIME_HOURS * 3600) as usize,
    }))
}

pub async fn get_me(
    Extension(auth): Extension<AuthContext>,
) -> Json<MeResponse> {
    Json(MeResponse {
        id: auth.user_id,
        role: auth.role,
        username: auth.username,
    })
}
