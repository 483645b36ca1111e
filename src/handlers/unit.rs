// src/handlers/unit.rs
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::instrument;

use crate::dtos::unit::{CreateUnitRequest, RenameUnitRequest, UnitResponse};
use crate::error::{map_unique_violation, AppError};
use crate::middleware::auth::AuthContext;
use crate::state::AppState;

// GET /units - List all units of measure
#[instrument(skip(state))]
pub async fn list_units(State(state): State<AppState>) -> Result<Json<Vec<UnitResponse>>, AppError> {
    let units = sqlx::query_as::<_, UnitResponse>("SELECT name FROM units ORDER BY name")
        .fetch_all(&state.db_pool)
        .await?;

    Ok(Json(units))
}

// POST /units - Create new unit
#[instrument(skip(state, payload))]
pub async fn create_unit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CreateUnitRequest>,
) -> Result<(StatusCode, Json<UnitResponse>), AppError> {
    if !auth.is_admin() {
        return Err(AppError::forbidden("Only admins can manage units"));
    }
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Unit name is required"));
    }

    let unit = sqlx::query_as::<_, UnitResponse>(
        "INSERT INTO units (name) VALUES ($1) RETURNING name",
    )
    .bind(payload.name.trim())
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "Unit already exists"))?;

    Ok((StatusCode::CREATED, Json(unit)))
}

// PUT /units/{name} - Rename unit
#[instrument(skip(state, payload), fields(name))]
pub async fn rename_unit(
    Path(name): Path<String>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<RenameUnitRequest>,
) -> Result<Json<UnitResponse>, AppError> {
    if !auth.is_admin() {
        return Err(AppError::forbidden("Only admins can manage units"));
    }
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Unit name is required"));
    }

    let unit = sqlx::query_as::<_, UnitResponse>(
        "UPDATE units SET name = $2 WHERE name = $1 RETURNING name",
    )
    .bind(&name)
    .bind(payload.name.trim())
    .fetch_optional(&state.db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "Unit already exists"))?
    .ok_or_else(|| AppError::not_found("Unit not found"))?;

    Ok(Json(unit))
}

// DELETE /units/{name} - Delete unit
#[instrument(skip(state), fields(name))]
pub async fn delete_unit(
    Path(name): Path<String>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<StatusCode, AppError> {
    if !auth.is_admin() {
        return Err(AppError::forbidden("Only admins can manage units"));
    }

    let in_use = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM products WHERE unit = $1)",
    )
    .bind(&name)
    .fetch_one(&state.db_pool)
    .await?;

    if in_use {
        return Err(AppError::conflict("Cannot delete a unit that products still use"));
    }

    let result = sqlx::query("DELETE FROM units WHERE name = $1")
        .bind(&name)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Unit not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
