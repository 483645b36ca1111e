// src/handlers/package_type.rs
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use sqlx::PgPool;
use tracing::instrument;

use crate::dtos::package_type::{
    AddPackageItemsRequest, CreatePackageTypeRequest, PackageItemResponse, PackageTypeResponse,
    UpdatePackageTypeRequest,
};
use crate::error::{map_unique_violation, AppError};
use crate::middleware::auth::AuthContext;
use crate::state::AppState;

// GET /package-types - List all package types
#[instrument(skip(state))]
pub async fn list_package_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<PackageTypeResponse>>, AppError> {
    let package_types = sqlx::query_as::<_, PackageTypeResponse>(
        "SELECT name, description FROM package_type ORDER BY name",
    )
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(package_types))
}

// POST /package-types - Create new package type
#[instrument(skip(state, payload))]
pub async fn create_package_type(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CreatePackageTypeRequest>,
) -> Result<(StatusCode, Json<PackageTypeResponse>), AppError> {
    if !auth.is_admin() {
        return Err(AppError::forbidden("Only admins can manage package types"));
    }
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Package type name is required"));
    }

    let package_type = sqlx::query_as::<_, PackageTypeResponse>(
        "INSERT INTO package_type (name, description) VALUES ($1, $2)
         RETURNING name, description",
    )
    .bind(payload.name.trim())
    .bind(&payload.description)
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "Package type name already exists"))?;

    Ok((StatusCode::CREATED, Json(package_type)))
}

// PUT /package-types/{name} - Update (and possibly rename) a package type.
// A rename onto an existing name is refused before touching anything.
#[instrument(skip(state, payload), fields(name))]
pub async fn update_package_type(
    Path(name): Path<String>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<UpdatePackageTypeRequest>,
) -> Result<Json<PackageTypeResponse>, AppError> {
    if !auth.is_admin() {
        return Err(AppError::forbidden("Only admins can manage package types"));
    }
    let new_name = payload.name.trim();
    if new_name.is_empty() {
        return Err(AppError::validation("Package type name is required"));
    }

    if new_name != name {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM package_type WHERE name = $1)",
        )
        .bind(new_name)
        .fetch_one(&state.db_pool)
        .await?;

        if taken {
            return Err(AppError::conflict("Package type name already exists"));
        }
    }

    let package_type = sqlx::query_as::<_, PackageTypeResponse>(
        "UPDATE package_type SET name = $2, description = $3 WHERE name = $1
         RETURNING name, description",
    )
    .bind(&name)
    .bind(new_name)
    .bind(&payload.description)
    .fetch_optional(&state.db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "Package type name already exists"))?
    .ok_or_else(|| AppError::not_found("Package type not found"))?;

    Ok(Json(package_type))
}

// DELETE /package-types/{name} - Delete package type and its product
// memberships (cascade).
#[instrument(skip(state), fields(name))]
pub async fn delete_package_type(
    Path(name): Path<String>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<StatusCode, AppError> {
    if !auth.is_admin() {
        return Err(AppError::forbidden("Only admins can manage package types"));
    }

    let result = sqlx::query("DELETE FROM package_type WHERE name = $1")
        .bind(&name)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Package type not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

// GET /package-types/{name}/items - The package's member products with the
// fields the quotation form's description dropdown needs.
#[instrument(skip(state), fields(name))]
pub async fn list_package_items(
    Path(name): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<PackageItemResponse>>, AppError> {
    let items = fetch_package_items(&state.db_pool, &name).await?;
    Ok(Json(items))
}

// POST /package-types/{name}/items - Add products to a package. Names
// already in the package are skipped; the refreshed membership comes back.
#[instrument(skip(state, payload), fields(name))]
pub async fn add_package_items(
    Path(name): Path<String>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<AddPackageItemsRequest>,
) -> Result<(StatusCode, Json<Vec<PackageItemResponse>>), AppError> {
    if !auth.is_admin() {
        return Err(AppError::forbidden("Only admins can manage package types"));
    }
    if payload.product_names.is_empty() {
        return Err(AppError::validation("Select at least one product to add"));
    }

    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM package_type WHERE name = $1)",
    )
    .bind(&name)
    .fetch_one(&state.db_pool)
    .await?;

    if !exists {
        return Err(AppError::not_found("Package type not found"));
    }

    let mut tx = state.db_pool.begin().await?;

    for product_name in &payload.product_names {
        let known = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE name = $1)",
        )
        .bind(product_name)
        .fetch_one(&mut *tx)
        .await?;

        if !known {
            return Err(AppError::validation(format!("Product '{product_name}' not found")));
        }

        sqlx::query(
            "INSERT INTO package_type_products (package_type_name, product_name)
             VALUES ($1, $2)
             ON CONFLICT (package_type_name, product_name) DO NOTHING",
        )
        .bind(&name)
        .bind(product_name)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    let items = fetch_package_items(&state.db_pool, &name).await?;
    Ok((StatusCode::CREATED, Json(items)))
}

// DELETE /package-types/{name}/items/{id} - Remove one product from a package
#[instrument(skip(state), fields(name, id))]
pub async fn delete_package_item(
    Path((name, id)): Path<(String, i64)>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<StatusCode, AppError> {
    if !auth.is_admin() {
        return Err(AppError::forbidden("Only admins can manage package types"));
    }

    let result = sqlx::query(
        "DELETE FROM package_type_products WHERE id = $1 AND package_type_name = $2",
    )
    .bind(id)
    .bind(&name)
    .execute(&state.db_pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Package item not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_package_items(
    db_pool: &PgPool,
    package_type_name: &str,
) -> Result<Vec<PackageItemResponse>, AppError> {
    let items = sqlx::query_as::<_, PackageItemResponse>(
        "SELECT ptp.id, ptp.product_name, p.unit, p.base_price, p.description
         FROM package_type_products ptp
         LEFT JOIN products p ON p.name = ptp.product_name
         WHERE ptp.package_type_name = $1
         ORDER BY ptp.product_name",
    )
    .bind(package_type_name)
    .fetch_all(db_pool)
    .await?;

    Ok(items)
}
