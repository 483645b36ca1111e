use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc, NaiveDate};
use rust_decimal::Decimal;

use crate::pricing::de_lenient_decimal;

#[derive(Debug, Deserialize)]
pub struct NextNumberRequest {
    pub employee_name: String,
}

#[derive(Serialize)]
pub struct NextNumberResponse {
    pub quotation_no: String,
}

// One row as collected from the form. Quantity and price tolerate numeric
// strings and garbage (coerced to zero) so a half-filled row never fails
// the whole request; string fields default to empty so the assembler can
// report which required field is missing instead of serde rejecting the
// payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemDraft {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "de_lenient_decimal")]
    pub quantity: Decimal,
    #[serde(default, deserialize_with = "de_lenient_decimal")]
    pub unit_price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct CreateQuotationRequest {
    // Reserved ahead of time via POST /quotations/number; save is refused
    // without it.
    #[serde(default)]
    pub quotation_no: String,
    #[serde(default)]
    pub employee_name: String,
    pub quotation_date: Option<NaiveDate>,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub office_address: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub package_type: String,
    pub package_row: LineItemDraft,
    #[serde(default)]
    pub product_rows: Vec<LineItemDraft>,
    #[serde(default, deserialize_with = "de_lenient_decimal")]
    pub delivery_price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuotationRequest {
    pub client_name: Option<String>,
    pub office_address: Option<String>,
    pub contact_person: Option<String>,
    pub contact_number: Option<String>,
    pub status: Option<String>,
    pub discount: Option<Decimal>,
}

// Mirrors the save confirmation the form shows: number, package, item
// count, plus any product names that no longer resolved at save time.
#[derive(Serialize)]
pub struct SaveQuotationResponse {
    pub id: i64,
    pub quotation_no: String,
    pub package_type: String,
    pub items_saved: usize,
    pub total: Decimal,
    pub display_total: String,
    pub unresolved_products: Vec<String>,
}

#[derive(Serialize)]
pub struct QuotationItemResponse {
    pub id: i64,
    pub product_id: Option<i64>,
    pub product_name: Option<String>,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub row_type: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub total: Decimal,
    pub display_total: String,
    pub row_order: i32,
}

#[derive(Serialize)]
pub struct QuotationResponse {
    pub id: i64,
    pub quotation_no: String,
    pub quotation_date: NaiveDate,
    pub client_name: String,
    pub office_address: String,
    pub contact_person: String,
    pub contact_number: String,
    pub package_type: String,
    pub employee_name: String,
    pub status: String,
    pub total: Decimal,
    pub display_total: String,
    pub discount: Decimal,
    pub created_at: Option<DateTime<Utc>>,
    pub items: Vec<QuotationItemResponse>,
}

#[derive(Serialize)]
pub struct QuotationListItem {
    pub id: i64,
    pub quotation_no: String,
    pub quotation_date: NaiveDate,
    pub client_name: String,
    pub package_type: String,
    pub employee_name: String,
    pub status: String,
    pub total: Decimal,
    pub display_total: String,
    pub item_count: i64,
    pub created_at: Option<DateTime<Utc>>,
}
