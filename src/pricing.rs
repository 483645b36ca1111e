// src/pricing.rs
//
// Money math for quotation rows. Amounts are kept at full precision as
// Decimal for storage and summing; rounding to two places happens only when
// a display string is produced.
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Deserializer, Visitor};
use std::fmt;

// Line total for a package or product row. The delivery row never goes
// through this: its quantity is pinned to 1 and its total equals its price.
pub fn line_total(quantity: Decimal, unit_price: Decimal) -> Decimal {
    quantity * unit_price
}

// Subtotal over assembled rows plus the delivery amount. A zero delivery
// amount contributes zero and renders as FREE; it is never excluded from
// the sum.
pub fn subtotal(line_totals: &[Decimal], delivery_price: Decimal) -> Decimal {
    line_totals.iter().copied().sum::<Decimal>() + delivery_price
}

// Coerce free-form amount text to a Decimal. Accepts plain numbers as well
// as rendered currency ("₱1,234.56"); anything non-numeric becomes zero so
// partial input never blocks a recompute.
pub fn parse_amount(raw: &str) -> Decimal {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '₱' && *c != ',')
        .collect();
    cleaned.parse::<Decimal>().unwrap_or(Decimal::ZERO)
}

// "₱1,234.50" - thousands separators, exactly two decimals.
pub fn format_peso(amount: Decimal) -> String {
    format!("₱{}", format_grouped(amount))
}

// Delivery total renders as FREE when the amount is zero.
pub fn format_delivery_total(amount: Decimal) -> String {
    if amount.is_zero() {
        "FREE".to_string()
    } else {
        format_peso(amount)
    }
}

fn format_grouped(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

// Serde helper for draft quantity/price fields: accepts JSON numbers,
// numeric strings, or garbage; garbage and null coerce to zero. Same
// tolerance the row recompute applies to typed-in values.
pub fn de_lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientVisitor;

    impl<'de> Visitor<'de> for LenientVisitor {
        type Value = Decimal;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number, a numeric string, or null")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
            Ok(Decimal::from(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
            Ok(Decimal::from(v))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
            Ok(Decimal::try_from(v).unwrap_or(Decimal::ZERO))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Decimal, E> {
            Ok(parse_amount(v))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Decimal, E> {
            Ok(Decimal::ZERO)
        }

        fn visit_none<E: de::Error>(self) -> Result<Decimal, E> {
            Ok(Decimal::ZERO)
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<Decimal, D2::Error> {
            d.deserialize_any(LenientVisitor)
        }
    }

    deserializer.deserialize_any(LenientVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn line_total_is_quantity_times_price() {
        assert_eq!(line_total(d("2"), d("500")), d("1000"));
        assert_eq!(line_total(d("3"), d("299.99")), d("899.97"));
        assert_eq!(line_total(d("0"), d("1500")), d("0"));
    }

    #[test]
    fn subtotal_of_nothing_is_zero() {
        assert_eq!(subtotal(&[], Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn subtotal_includes_free_delivery_as_zero() {
        let totals = [line_total(d("2"), d("500")), line_total(d("1"), d("1500"))];
        assert_eq!(subtotal(&totals, Decimal::ZERO), d("2500"));
        assert_eq!(format_delivery_total(Decimal::ZERO), "FREE");
    }

    #[test]
    fn subtotal_adds_paid_delivery_once() {
        // Delivery quantity is pinned to 1, so the amount goes in as-is.
        let totals = [line_total(d("2"), d("500"))];
        assert_eq!(subtotal(&totals, d("350")), d("1350"));
        assert_eq!(format_delivery_total(d("350")), "₱350.00");
    }

    #[test]
    fn parse_amount_tolerates_garbage() {
        assert_eq!(parse_amount("abc"), Decimal::ZERO);
        assert_eq!(parse_amount(""), Decimal::ZERO);
        assert_eq!(parse_amount("  12.5 "), d("12.5"));
        assert_eq!(parse_amount("₱1,234.56"), d("1234.56"));
    }

    #[test]
    fn peso_format_keeps_two_decimals() {
        assert_eq!(format_peso(d("899.97")), "₱899.97");
        assert_eq!(format_peso(d("899.9")), "₱899.90");
        assert_eq!(format_peso(d("0")), "₱0.00");
    }

    #[test]
    fn peso_format_groups_thousands() {
        assert_eq!(format_peso(d("1234.5")), "₱1,234.50");
        assert_eq!(format_peso(d("1234567.891")), "₱1,234,567.89");
        assert_eq!(format_peso(d("999")), "₱999.00");
    }

    #[test]
    fn rounding_happens_at_display_only() {
        // Summing at full precision then rounding differs from summing
        // pre-rounded values; the former is the contract.
        let a = d("0.005");
        let b = d("0.005");
        assert_eq!(subtotal(&[a, b], Decimal::ZERO), d("0.01"));
        assert_eq!(format_peso(a), "₱0.01");
    }

    #[test]
    fn lenient_deserializer_accepts_numbers_strings_and_garbage() {
        #[derive(serde::Deserialize)]
        struct Row {
            #[serde(default, deserialize_with = "de_lenient_decimal")]
            quantity: Decimal,
        }

        let from_number: Row = serde_json::from_str(r#"{"quantity": 2}"#).unwrap();
        assert_eq!(from_number.quantity, d("2"));

        let from_string: Row = serde_json::from_str(r#"{"quantity": "3.5"}"#).unwrap();
        assert_eq!(from_string.quantity, d("3.5"));

        let from_garbage: Row = serde_json::from_str(r#"{"quantity": "lots"}"#).unwrap();
        assert_eq!(from_garbage.quantity, Decimal::ZERO);

        let from_null: Row = serde_json::from_str(r#"{"quantity": null}"#).unwrap();
        assert_eq!(from_null.quantity, Decimal::ZERO);

        let missing: Row = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(missing.quantity, Decimal::ZERO);
    }
}
