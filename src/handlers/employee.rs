// src/handlers/employee.rs
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use std::collections::HashMap;
use tracing::instrument;

use crate::dtos::employee::{CreateEmployeeRequest, EmployeeResponse, UpdateEmployeeRequest};
use crate::error::{map_unique_violation, AppError};
use crate::middleware::auth::AuthContext;
use crate::models::employee::Employee;
use crate::state::AppState;

// GET /employees - Active employees ordered by code (the quotation form's
// issuer picker). all=true includes deactivated ones for the admin screen.
#[instrument(skip(state))]
pub async fn list_employees(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<EmployeeResponse>>, AppError> {
    let include_inactive = params.get("all").map(|v| v == "true").unwrap_or(false);

    let employees = sqlx::query_as::<_, Employee>(
        "SELECT id, employee_code, full_name, is_active, created_at
         FROM employees
         WHERE is_active OR $1
         ORDER BY employee_code",
    )
    .bind(include_inactive)
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(employees.into_iter().map(EmployeeResponse::from).collect()))
}

// GET /employees/by-code/{code} - Look up one active employee
#[instrument(skip(state), fields(code))]
pub async fn get_employee_by_code(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<EmployeeResponse>, AppError> {
    let employee = sqlx::query_as::<_, Employee>(
        "SELECT id, employee_code, full_name, is_active, created_at
         FROM employees
         WHERE employee_code = $1 AND is_active",
    )
    .bind(&code)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Employee not found"))?;

    Ok(Json(EmployeeResponse::from(employee)))
}

// POST /employees - Create new employee
#[instrument(skip(state, payload))]
pub async fn create_employee(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<EmployeeResponse>), AppError> {
    if !auth.is_admin() {
        return Err(AppError::forbidden("Only admins can manage employees"));
    }
    if payload.employee_code.trim().is_empty() {
        return Err(AppError::validation("Employee code is required"));
    }
    if payload.full_name.trim().is_empty() {
        return Err(AppError::validation("Employee name is required"));
    }

    let employee = sqlx::query_as::<_, Employee>(
        "INSERT INTO employees (employee_code, full_name)
         VALUES ($1, $2)
         RETURNING id, employee_code, full_name, is_active, created_at",
    )
    .bind(payload.employee_code.trim())
    .bind(payload.full_name.trim())
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "Employee code already exists"))?;

    Ok((StatusCode::CREATED, Json(EmployeeResponse::from(employee))))
}

// PUT /employees/{id} - Update employee
#[instrument(skip(state, payload), fields(id))]
pub async fn update_employee(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<UpdateEmployeeRequest>,
) -> Result<Json<EmployeeResponse>, AppError> {
    if !auth.is_admin() {
        return Err(AppError::forbidden("Only admins can manage employees"));
    }

    let employee = sqlx::query_as::<_, Employee>(
        "UPDATE employees SET
         employee_code = COALESCE($1, employee_code),
         full_name = COALESCE($2, full_name),
         is_active = COALESCE($3, is_active)
         WHERE id = $4
         RETURNING id, employee_code, full_name, is_active, created_at",
    )
    .bind(payload.employee_code.as_deref().map(str::trim))
    .bind(payload.full_name.as_deref().map(str::trim))
    .bind(payload.is_active)
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "Employee code already exists"))?
    .ok_or_else(|| AppError::not_found("Employee not found"))?;

    Ok(Json(EmployeeResponse::from(employee)))
}

// DELETE /employees/{id} - Remove an employee. Issuers referenced by saved
// quotations are deactivated instead of deleted so the documents keep a
// valid issuer name.
#[instrument(skip(state), fields(id))]
pub async fn delete_employee(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<StatusCode, AppError> {
    if !auth.is_admin() {
        return Err(AppError::forbidden("Only admins can manage employees"));
    }

    let employee = sqlx::query_as::<_, Employee>(
        "SELECT id, employee_code, full_name, is_active, created_at
         FROM employees WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Employee not found"))?;

    let has_quotations = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM quotations WHERE employee_name = $1)",
    )
    .bind(&employee.full_name)
    .fetch_one(&state.db_pool)
    .await?;

    if has_quotations {
        sqlx::query("UPDATE employees SET is_active = FALSE WHERE id = $1")
            .bind(id)
            .execute(&state.db_pool)
            .await?;
    } else {
        sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&state.db_pool)
            .await?;
    }

    Ok(StatusCode::NO_CONTENT)
}
