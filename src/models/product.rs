use sqlx::FromRow;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

#[derive(Debug, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub base_price: Decimal,
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    // License-unit products are only reachable through the package
    // description slot, never the free-form product rows.
    pub fn is_selectable(&self) -> bool {
        self.unit
            .as_deref()
            .map(|u| !u.eq_ignore_ascii_case("license"))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(unit: Option<&str>) -> Product {
        Product {
            id: 1,
            name: "Thermal Printer".to_string(),
            category: Some("Hardware".to_string()),
            unit: unit.map(str::to_string),
            description: None,
            base_price: Decimal::ZERO,
            created_at: None,
        }
    }

    #[test]
    fn license_units_are_not_selectable() {
        assert!(!product(Some("License")).is_selectable());
        assert!(!product(Some("license")).is_selectable());
        assert!(product(Some("pc")).is_selectable());
    }

    #[test]
    fn missing_unit_is_not_selectable() {
        assert!(!product(None).is_selectable());
    }
}
