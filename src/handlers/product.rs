// src/handlers/product.rs
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{error, instrument};

use crate::dtos::product::{CreateProductRequest, ProductResponse, UpdateProductRequest};
use crate::error::{map_unique_violation, AppError};
use crate::middleware::auth::AuthContext;
use crate::models::product::Product;
use crate::state::AppState;

// GET /products - List products, optionally filtered by category. With
// selectable=true, license-unit products are dropped: those are only
// offered through the package description slot, never as add-on rows.
#[instrument(skip(state))]
pub async fn get_products(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let category = params.get("category").map(String::as_str);
    let selectable_only = params.get("selectable").map(|v| v == "true").unwrap_or(false);

    match sqlx::query_as::<_, Product>(
        "SELECT id, name, category, unit, description, base_price, created_at
         FROM products
         WHERE ($1::TEXT IS NULL OR category = $1)
         ORDER BY name",
    )
    .bind(category)
    .fetch_all(&state.db_pool)
    .await
    {
        Ok(products) => {
            let response = products
                .into_iter()
                .filter(|p| !selectable_only || p.is_selectable())
                .map(ProductResponse::from)
                .collect();
            Ok(Json(response))
        }
        Err(e) => {
            error!(?e, "Failed to fetch products");
            Err(e.into())
        }
    }
}

// GET /products/{id} - Get single product
#[instrument(skip(state), fields(id))]
pub async fn get_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = sqlx::query_as::<_, Product>(
        "SELECT id, name, category, unit, description, base_price, created_at
         FROM products WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(ProductResponse::from(product)))
}

// POST /products - Create new product
#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    if !auth.is_admin() {
        return Err(AppError::forbidden("Only admins can manage products"));
    }
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Product name is required"));
    }
    if payload.base_price < Decimal::ZERO {
        return Err(AppError::validation("Base price cannot be negative"));
    }

    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products (name, category, unit, description, base_price)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, name, category, unit, description, base_price, created_at",
    )
    .bind(payload.name.trim())
    .bind(&payload.category)
    .bind(&payload.unit)
    .bind(&payload.description)
    .bind(payload.base_price)
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "Product name already exists"))?;

    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

// PUT /products/{id} - Update product
#[instrument(skip(state, payload), fields(id))]
pub async fn update_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    if !auth.is_admin() {
        return Err(AppError::forbidden("Only admins can manage products"));
    }
    if let Some(price) = payload.base_price {
        if price < Decimal::ZERO {
            return Err(AppError::validation("Base price cannot be negative"));
        }
    }

    let product = sqlx::query_as::<_, Product>(
        "UPDATE products SET
         name = COALESCE($1, name),
         category = COALESCE($2, category),
         unit = COALESCE($3, unit),
         description = COALESCE($4, description),
         base_price = COALESCE($5, base_price)
         WHERE id = $6
         RETURNING id, name, category, unit, description, base_price, created_at",
    )
    .bind(payload.name.as_deref().map(str::trim))
    .bind(&payload.category)
    .bind(&payload.unit)
    .bind(&payload.description)
    .bind(payload.base_price)
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "Product name already exists"))?
    .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(ProductResponse::from(product)))
}

// DELETE /products/{id} - Delete product. Saved quotation items keep their
// row but lose the reference (FK is ON DELETE SET NULL).
#[instrument(skip(state), fields(id))]
pub async fn delete_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<StatusCode, AppError> {
    if !auth.is_admin() {
        return Err(AppError::forbidden("Only admins can manage products"));
    }

    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Product not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
