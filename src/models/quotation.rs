use sqlx::FromRow;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

/// Quotation document status. Stored as text; unknown values never enter
/// the database because writes go through `parse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotationStatus {
    Pending,
    Approved,
    Declined,
}

impl QuotationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuotationStatus::Pending => "pending",
            QuotationStatus::Approved => "approved",
            QuotationStatus::Declined => "declined",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(QuotationStatus::Pending),
            "approved" => Some(QuotationStatus::Approved),
            "declined" => Some(QuotationStatus::Declined),
            _ => None,
        }
    }
}

/// Kind of quotation row: the package header line, an add-on product line,
/// or the trailing delivery/support line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowType {
    Package,
    Product,
    Delivery,
}

impl RowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowType::Package => "package",
            RowType::Product => "product",
            RowType::Delivery => "delivery",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "package" => Some(RowType::Package),
            "product" => Some(RowType::Product),
            "delivery" => Some(RowType::Delivery),
            _ => None,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct Quotation {
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
    pub discount: Decimal,
    pub created_at: Option<DateTime<Utc>>,
}

// One persisted row, joined against products when the reference resolved.
// product_name/unit/description stay NULL for the delivery row and for
// items saved with an unresolved product reference.
#[derive(Debug, FromRow)]
pub struct QuotationItem {
    pub id: i64,
    pub quotation_id: i64,
    pub product_id: Option<i64>,
    pub product_name: Option<String>,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub row_type: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub total: Decimal,
    pub row_order: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips() {
        for status in [QuotationStatus::Pending, QuotationStatus::Approved, QuotationStatus::Declined] {
            assert_eq!(QuotationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(QuotationStatus::parse("archived"), None);
    }

    #[test]
    fn row_type_round_trips() {
        for row_type in [RowType::Package, RowType::Product, RowType::Delivery] {
            assert_eq!(RowType::parse(row_type.as_str()), Some(row_type));
        }
        assert_eq!(RowType::parse("freight"), None);
    }
}
