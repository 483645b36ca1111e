// src/handlers/category.rs
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::instrument;

use crate::dtos::category::{CategoryResponse, CreateCategoryRequest, RenameCategoryRequest};
use crate::error::{map_unique_violation, AppError};
use crate::middleware::auth::AuthContext;
use crate::state::AppState;

// GET /categories - List all product categories
#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let categories = sqlx::query_as::<_, CategoryResponse>(
        "SELECT name FROM product_categories ORDER BY name",
    )
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(categories))
}

// POST /categories - Create new category
#[instrument(skip(state, payload))]
pub async fn create_category(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), AppError> {
    if !auth.is_admin() {
        return Err(AppError::forbidden("Only admins can manage categories"));
    }
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Category name is required"));
    }

    let category = sqlx::query_as::<_, CategoryResponse>(
        "INSERT INTO product_categories (name) VALUES ($1) RETURNING name",
    )
    .bind(payload.name.trim())
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "Category already exists"))?;

    Ok((StatusCode::CREATED, Json(category)))
}

// PUT /categories/{name} - Rename category
#[instrument(skip(state, payload), fields(name))]
pub async fn rename_category(
    Path(name): Path<String>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<RenameCategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    if !auth.is_admin() {
        return Err(AppError::forbidden("Only admins can manage categories"));
    }
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Category name is required"));
    }

    let category = sqlx::query_as::<_, CategoryResponse>(
        "UPDATE product_categories SET name = $2 WHERE name = $1 RETURNING name",
    )
    .bind(&name)
    .bind(payload.name.trim())
    .fetch_optional(&state.db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "Category already exists"))?
    .ok_or_else(|| AppError::not_found("Category not found"))?;

    Ok(Json(category))
}

// DELETE /categories/{name} - Delete category
#[instrument(skip(state), fields(name))]
pub async fn delete_category(
    Path(name): Path<String>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<StatusCode, AppError> {
    if !auth.is_admin() {
        return Err(AppError::forbidden("Only admins can manage categories"));
    }

    let in_use = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM products WHERE category = $1)",
    )
    .bind(&name)
    .fetch_one(&state.db_pool)
    .await?;

    if in_use {
        return Err(AppError::conflict("Cannot delete a category that products still use"));
    }

    let result = sqlx::query("DELETE FROM product_categories WHERE name = $1")
        .bind(&name)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Category not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
