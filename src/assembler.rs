// src/assembler.rs
//
// Turns a quotation draft into the ordered rows that get persisted. Pure:
// no database access, so every save precondition is checked (and every
// total recomputed) before the handler opens a transaction.
use rust_decimal::Decimal;

use crate::dtos::quotation::CreateQuotationRequest;
use crate::error::AppError;
use crate::models::quotation::RowType;
use crate::pricing;

#[derive(Debug)]
pub struct AssembledRow {
    pub row_type: RowType,
    pub product_name: Option<String>,
    pub quantity: Decimal,
    pub price: Decimal,
    pub total: Decimal,
    pub row_order: i32,
}

#[derive(Debug)]
pub struct AssembledQuotation {
    pub rows: Vec<AssembledRow>,
    pub total: Decimal,
}

pub fn assemble(req: &CreateQuotationRequest) -> Result<AssembledQuotation, AppError> {
    if req.employee_name.trim().is_empty() {
        return Err(AppError::validation("No employee selected"));
    }
    if req.quotation_no.trim().is_empty() {
        return Err(AppError::validation("No quotation number reserved"));
    }
    if req.client_name.trim().is_empty() {
        return Err(AppError::validation("Client name is required"));
    }
    if req.office_address.trim().is_empty() {
        return Err(AppError::validation("Office address is required"));
    }
    if req.contact_person.trim().is_empty() {
        return Err(AppError::validation("Contact person is required"));
    }
    if req.contact_number.trim().is_empty() {
        return Err(AppError::validation("Contact number is required"));
    }
    if req.package_type.trim().is_empty() {
        return Err(AppError::validation("No package type selected"));
    }

    if req.package_row.quantity < Decimal::ZERO || req.package_row.unit_price < Decimal::ZERO {
        return Err(AppError::validation("Package row quantity and price cannot be negative"));
    }
    for row in &req.product_rows {
        if row.quantity < Decimal::ZERO || row.unit_price < Decimal::ZERO {
            return Err(AppError::validation("Product row quantity and price cannot be negative"));
        }
    }
    if req.delivery_price < Decimal::ZERO {
        return Err(AppError::validation("Delivery price cannot be negative"));
    }

    let mut rows = Vec::new();
    let mut row_order = 0;

    // Package header row always leads, even at quantity zero.
    rows.push(AssembledRow {
        row_type: RowType::Package,
        product_name: clean_name(req.package_row.product_name.as_deref()),
        quantity: req.package_row.quantity,
        price: req.package_row.unit_price,
        total: pricing::line_total(req.package_row.quantity, req.package_row.unit_price),
        row_order: next_order(&mut row_order),
    });

    // Product rows keep their display order; a zero quantity marks an
    // unused optional slot, not an error.
    for row in &req.product_rows {
        if row.quantity <= Decimal::ZERO {
            continue;
        }
        rows.push(AssembledRow {
            row_type: RowType::Product,
            product_name: clean_name(row.product_name.as_deref()),
            quantity: row.quantity,
            price: row.unit_price,
            total: pricing::line_total(row.quantity, row.unit_price),
            row_order: next_order(&mut row_order),
        });
    }

    // Delivery closes the document; quantity is pinned to 1.
    rows.push(AssembledRow {
        row_type: RowType::Delivery,
        product_name: None,
        quantity: Decimal::ONE,
        price: req.delivery_price,
        total: req.delivery_price,
        row_order: next_order(&mut row_order),
    });

    let line_totals: Vec<Decimal> = rows
        .iter()
        .filter(|r| r.row_type != RowType::Delivery)
        .map(|r| r.total)
        .collect();
    let total = pricing::subtotal(&line_totals, req.delivery_price);

    Ok(AssembledQuotation { rows, total })
}

fn next_order(counter: &mut i32) -> i32 {
    let current = *counter;
    *counter += 1;
    current
}

fn clean_name(name: Option<&str>) -> Option<String> {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtos::quotation::LineItemDraft;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn row(name: Option<&str>, qty: &str, price: &str) -> LineItemDraft {
        LineItemDraft {
            product_name: name.map(str::to_string),
            quantity: d(qty),
            unit_price: d(price),
        }
    }

    fn valid_request() -> CreateQuotationRequest {
        CreateQuotationRequest {
            quotation_no: "JDC-2026-0001".to_string(),
            employee_name: "Juan Dela Cruz".to_string(),
            quotation_date: None,
            client_name: "Acme Trading".to_string(),
            office_address: "12 Rizal Ave".to_string(),
            contact_person: "Maria Santos".to_string(),
            contact_number: "0917-555-0199".to_string(),
            package_type: "POS Package A".to_string(),
            package_row: row(Some("POS Terminal Bundle"), "1", "25000"),
            product_rows: vec![
                row(Some("Receipt Paper"), "2", "500"),
                row(Some("Cash Drawer"), "0", "3000"),
                row(Some("Barcode Scanner"), "1", "1500"),
            ],
            delivery_price: Decimal::ZERO,
        }
    }

    fn failing_field(mutate: impl FnOnce(&mut CreateQuotationRequest)) -> String {
        let mut req = valid_request();
        mutate(&mut req);
        match assemble(&req) {
            Err(AppError::ValidationError(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn assembles_rows_in_save_order() {
        let assembled = assemble(&valid_request()).unwrap();

        let kinds: Vec<RowType> = assembled.rows.iter().map(|r| r.row_type).collect();
        assert_eq!(
            kinds,
            [RowType::Package, RowType::Product, RowType::Product, RowType::Delivery]
        );

        // Contiguous from zero, zero-quantity slot skipped.
        let orders: Vec<i32> = assembled.rows.iter().map(|r| r.row_order).collect();
        assert_eq!(orders, [0, 1, 2, 3]);

        let names: Vec<Option<&str>> = assembled
            .rows
            .iter()
            .map(|r| r.product_name.as_deref())
            .collect();
        assert_eq!(
            names,
            [Some("POS Terminal Bundle"), Some("Receipt Paper"), Some("Barcode Scanner"), None]
        );
    }

    #[test]
    fn recomputes_totals_from_quantity_and_price() {
        let mut req = valid_request();
        req.package_row = row(None, "0", "0");
        req.product_rows = vec![row(Some("A"), "2", "500"), row(Some("B"), "1", "1500")];
        req.delivery_price = Decimal::ZERO;

        let assembled = assemble(&req).unwrap();
        assert_eq!(assembled.total, d("2500"));
    }

    #[test]
    fn delivery_quantity_is_pinned_to_one() {
        let mut req = valid_request();
        req.delivery_price = d("350");

        let assembled = assemble(&req).unwrap();
        let delivery = assembled.rows.last().unwrap();
        assert_eq!(delivery.row_type, RowType::Delivery);
        assert_eq!(delivery.quantity, Decimal::ONE);
        assert_eq!(delivery.total, d("350"));
    }

    #[test]
    fn delivery_amount_joins_the_total() {
        let mut req = valid_request();
        req.delivery_price = d("350");

        let assembled = assemble(&req).unwrap();
        // package 25000 + paper 1000 + scanner 1500 + delivery 350
        assert_eq!(assembled.total, d("27850"));
    }

    #[test]
    fn each_missing_precondition_blocks_the_save() {
        assert_eq!(failing_field(|r| r.client_name = "  ".into()), "Client name is required");
        assert_eq!(failing_field(|r| r.office_address.clear()), "Office address is required");
        assert_eq!(failing_field(|r| r.contact_person.clear()), "Contact person is required");
        assert_eq!(failing_field(|r| r.contact_number.clear()), "Contact number is required");
        assert_eq!(failing_field(|r| r.quotation_no.clear()), "No quotation number reserved");
        assert_eq!(failing_field(|r| r.employee_name.clear()), "No employee selected");
        assert_eq!(failing_field(|r| r.package_type.clear()), "No package type selected");
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let msg = failing_field(|r| r.product_rows[0].quantity = d("-1"));
        assert_eq!(msg, "Product row quantity and price cannot be negative");
        let msg = failing_field(|r| r.delivery_price = d("-5"));
        assert_eq!(msg, "Delivery price cannot be negative");
    }

    #[test]
    fn blank_product_names_become_unresolved_references() {
        let mut req = valid_request();
        req.product_rows = vec![row(Some("   "), "1", "100")];

        let assembled = assemble(&req).unwrap();
        assert_eq!(assembled.rows[1].product_name, None);
    }
}
