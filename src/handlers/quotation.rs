// src/handlers/quotation.rs
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::assembler;
use crate::dtos::quotation::{
    CreateQuotationRequest, NextNumberRequest, NextNumberResponse, QuotationItemResponse,
    QuotationListItem, QuotationResponse, SaveQuotationResponse, UpdateQuotationRequest,
};
use crate::error::{map_unique_violation, AppError};
use crate::middleware::auth::AuthContext;
use crate::models::quotation::{Quotation, QuotationItem, QuotationStatus, RowType};
use crate::pricing;
use crate::state::AppState;

// POST /quotations/number - Reserve the next quotation number for an
// employee. Called once at form load; a reservation that is never saved
// stays burned, which is what keeps two open forms from colliding.
pub async fn reserve_number(
    State(AppState { db_pool }): State<AppState>,
    Json(req): Json<NextNumberRequest>,
) -> Result<Json<NextNumberResponse>, AppError> {
    if req.employee_name.trim().is_empty() {
        return Err(AppError::validation("No employee selected"));
    }

    // Server-side atomic increment, treated as an opaque call.
    let quotation_no = sqlx::query_scalar::<_, Option<String>>("SELECT next_quotation_no($1)")
        .bind(req.employee_name.trim())
        .fetch_one(&db_pool)
        .await
        .map_err(|e| AppError::numbering(e.to_string()))?
        .ok_or_else(|| AppError::numbering("counter returned no number"))?;

    info!(%quotation_no, "Reserved quotation number");

    Ok(Json(NextNumberResponse { quotation_no }))
}

// POST /quotations - Validate, assemble, and persist a quotation with its
// line items in one transaction.
pub async fn create_quotation(
    State(AppState { db_pool }): State<AppState>,
    Json(req): Json<CreateQuotationRequest>,
) -> Result<(StatusCode, Json<SaveQuotationResponse>), AppError> {
    // Every precondition and every total settles before any database work;
    // a validation failure must not reach the persistence layer.
    let assembled = assembler::assemble(&req)?;

    let quotation_date = req.quotation_date.unwrap_or_else(|| Utc::now().date_naive());

    let mut tx = db_pool.begin().await?;

    let quotation_id = sqlx::query_scalar::<_, i64>(
        r#"INSERT INTO quotations
            (quotation_no, quotation_date, client_name, office_address, contact_person,
             contact_number, package_type, employee_name, status, total, discount)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING id"#,
    )
    .bind(req.quotation_no.trim())
    .bind(quotation_date)
    .bind(req.client_name.trim())
    .bind(req.office_address.trim())
    .bind(req.contact_person.trim())
    .bind(req.contact_number.trim())
    .bind(req.package_type.trim())
    .bind(req.employee_name.trim())
    .bind(QuotationStatus::Pending.as_str())
    .bind(assembled.total)
    .bind(Decimal::ZERO)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| map_unique_violation(e, "Quotation number has already been used"))?;

    // Resolve each product reference right before its insert. A name that
    // no longer matches is saved with a NULL reference and reported back,
    // never aborting the save.
    let mut unresolved = Vec::new();
    for row in &assembled.rows {
        let product_id = match row.product_name.as_deref() {
            Some(product_name) => {
                let found = sqlx::query_scalar::<_, i64>("SELECT id FROM products WHERE name = $1")
                    .bind(product_name)
                    .fetch_optional(&mut *tx)
                    .await?;
                if found.is_none() {
                    unresolved.push(product_name.to_string());
                }
                found
            }
            None => None,
        };

        sqlx::query(
            r#"INSERT INTO quotation_items
                (quotation_id, product_id, row_type, quantity, price, total, row_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
        )
        .bind(quotation_id)
        .bind(product_id)
        .bind(row.row_type.as_str())
        .bind(row.quantity)
        .bind(row.price)
        .bind(row.total)
        .bind(row.row_order)
        .execute(&mut *tx)
        .await?;
    }

    // Header and items commit together; there is no saved-header-without-
    // items state to warn about.
    tx.commit().await?;

    if !unresolved.is_empty() {
        warn!(
            quotation_no = %req.quotation_no.trim(),
            unresolved = ?unresolved,
            "Quotation saved with unresolved product references"
        );
    }
    info!(
        quotation_no = %req.quotation_no.trim(),
        items = assembled.rows.len(),
        "Quotation saved"
    );

    Ok((
        StatusCode::CREATED,
        Json(SaveQuotationResponse {
            id: quotation_id,
            quotation_no: req.quotation_no.trim().to_string(),
            package_type: req.package_type.trim().to_string(),
            items_saved: assembled.rows.len(),
            total: assembled.total,
            display_total: pricing::format_peso(assembled.total),
            unresolved_products: unresolved,
        }),
    ))
}

// GET /quotations - Newest first, with item counts for the list screen
pub async fn list_quotations(
    State(AppState { db_pool }): State<AppState>,
) -> Result<Json<Vec<QuotationListItem>>, AppError> {
    let rows = sqlx::query_as::<_, (
        i64,
        String,
        NaiveDate,
        String,
        String,
        String,
        String,
        Decimal,
        Option<DateTime<Utc>>,
        i64,
    )>(
        r#"SELECT q.id, q.quotation_no, q.quotation_date, q.client_name, q.package_type,
                  q.employee_name, q.status, q.total, q.created_at, COUNT(qi.id)
        FROM quotations q
        LEFT JOIN quotation_items qi ON qi.quotation_id = q.id
        GROUP BY q.id
        ORDER BY q.created_at DESC, q.id DESC"#,
    )
    .fetch_all(&db_pool)
    .await?;

    Ok(Json(
        rows.into_iter()
            .map(|(id, quotation_no, quotation_date, client_name, package_type, employee_name, status, total, created_at, item_count)| {
                QuotationListItem {
                    id,
                    quotation_no,
                    quotation_date,
                    client_name,
                    package_type,
                    employee_name,
                    status,
                    display_total: pricing::format_peso(total),
                    total,
                    item_count,
                    created_at,
                }
            })
            .collect(),
    ))
}

// GET /quotations/{id} - Header plus ordered items, for view mode
pub async fn get_quotation(
    State(AppState { db_pool }): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<QuotationResponse>, AppError> {
    fetch_quotation_by_id(&db_pool, id).await.map(Json)
}

// PUT /quotations/{id} - Partial update of header fields and status. Line
// items are never edited here; a changed document gets re-issued instead.
pub async fn update_quotation(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateQuotationRequest>,
) -> Result<Json<QuotationResponse>, AppError> {
    if !auth.is_admin() {
        return Err(AppError::forbidden("Only admins can update quotations"));
    }

    for (value, label) in [
        (&req.client_name, "Client name"),
        (&req.office_address, "Office address"),
        (&req.contact_person, "Contact person"),
        (&req.contact_number, "Contact number"),
    ] {
        if let Some(v) = value {
            if v.trim().is_empty() {
                return Err(AppError::validation(format!("{label} cannot be empty")));
            }
        }
    }

    if let Some(status) = &req.status {
        if QuotationStatus::parse(status).is_none() {
            return Err(AppError::validation("Unknown status"));
        }
    }
    if let Some(discount) = req.discount {
        if discount < Decimal::ZERO {
            return Err(AppError::validation("Discount cannot be negative"));
        }
    }

    let updated = sqlx::query_scalar::<_, i64>(
        r#"UPDATE quotations SET
            client_name = COALESCE($2, client_name),
            office_address = COALESCE($3, office_address),
            contact_person = COALESCE($4, contact_person),
            contact_number = COALESCE($5, contact_number),
            status = COALESCE($6, status),
            discount = COALESCE($7, discount)
        WHERE id = $1
        RETURNING id"#,
    )
    .bind(id)
    .bind(req.client_name.as_deref().map(str::trim))
    .bind(req.office_address.as_deref().map(str::trim))
    .bind(req.contact_person.as_deref().map(str::trim))
    .bind(req.contact_number.as_deref().map(str::trim))
    .bind(req.status.as_deref())
    .bind(req.discount)
    .fetch_optional(&db_pool)
    .await?;

    if updated.is_none() {
        return Err(AppError::not_found("Quotation not found"));
    }

    fetch_quotation_by_id(&db_pool, id).await.map(Json)
}

// DELETE /quotations/{id} - Remove document and items (cascade)
pub async fn delete_quotation(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !auth.is_admin() {
        return Err(AppError::forbidden("Only admins can delete quotations"));
    }

    let result = sqlx::query("DELETE FROM quotations WHERE id = $1")
        .bind(id)
        .execute(&db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Quotation not found"));
    }

    info!(quotation_id = id, "Quotation deleted");

    Ok(StatusCode::NO_CONTENT)
}

// Helper to fetch the full document. Amounts come from the persisted rows
// alone - view mode must reproduce the totals exactly as saved, with no
// recomputation from live product prices.
async fn fetch_quotation_by_id(db_pool: &PgPool, id: i64) -> Result<QuotationResponse, AppError> {
    let quotation = sqlx::query_as::<_, Quotation>(
        r#"SELECT id, quotation_no, quotation_date, client_name, office_address, contact_person,
                  contact_number, package_type, employee_name, status, total, discount, created_at
        FROM quotations
        WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Quotation not found"))?;

    let items = sqlx::query_as::<_, QuotationItem>(
        r#"SELECT qi.id, qi.quotation_id, qi.product_id, p.name AS product_name, p.unit,
                  p.description, qi.row_type, qi.quantity, qi.price, qi.total, qi.row_order
        FROM quotation_items qi
        LEFT JOIN products p ON p.id = qi.product_id
        WHERE qi.quotation_id = $1
        ORDER BY qi.row_order"#,
    )
    .bind(id)
    .fetch_all(db_pool)
    .await?;

    let items = items
        .into_iter()
        .map(|item| {
            let display_total = display_for_row(&item.row_type, item.total);
            QuotationItemResponse {
                id: item.id,
                product_id: item.product_id,
                product_name: item.product_name,
                unit: item.unit,
                description: item.description,
                row_type: item.row_type,
                quantity: item.quantity,
                price: item.price,
                total: item.total,
                display_total,
                row_order: item.row_order,
            }
        })
        .collect();

    Ok(QuotationResponse {
        id: quotation.id,
        quotation_no: quotation.quotation_no,
        quotation_date: quotation.quotation_date,
        client_name: quotation.client_name,
        office_address: quotation.office_address,
        contact_person: quotation.contact_person,
        contact_number: quotation.contact_number,
        package_type: quotation.package_type,
        employee_name: quotation.employee_name,
        status: quotation.status,
        display_total: pricing::format_peso(quotation.total),
        total: quotation.total,
        discount: quotation.discount,
        created_at: quotation.created_at,
        items,
    })
}

// Only the delivery row renders a zero amount as FREE; every other row
// shows the peso amount as persisted.
fn display_for_row(row_type: &str, total: Decimal) -> String {
    match RowType::parse(row_type) {
        Some(RowType::Delivery) => pricing::format_delivery_total(total),
        _ => pricing::format_peso(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn persisted_rows_render_without_recomputation() {
        // Display comes straight from the stored total; a stale price on
        // the product table must not change what a saved quotation shows.
        assert_eq!(display_for_row("product", d("899.97")), "₱899.97");
        assert_eq!(display_for_row("package", d("25000")), "₱25,000.00");
    }

    #[test]
    fn delivery_zero_renders_free() {
        assert_eq!(display_for_row("delivery", d("0")), "FREE");
        assert_eq!(display_for_row("delivery", d("350")), "₱350.00");
        assert_eq!(display_for_row("product", d("0")), "₱0.00");
    }
}
