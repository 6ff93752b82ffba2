//! Order totals. Single-location business, so the tax rate and delivery fee
//! are fixed constants rather than configuration.

use bigdecimal::{BigDecimal, RoundingMode};
use std::str::FromStr;

const TAX_RATE: &str = "0.0825";
const DELIVERY_FEE: &str = "4.99";

pub fn tax_rate() -> BigDecimal {
    BigDecimal::from_str(TAX_RATE).expect("tax rate constant is a valid decimal")
}

pub fn delivery_fee() -> BigDecimal {
    BigDecimal::from_str(DELIVERY_FEE).expect("delivery fee constant is a valid decimal")
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderTotals {
    pub subtotal: BigDecimal,
    pub tax: BigDecimal,
    pub delivery_fee: BigDecimal,
    pub total: BigDecimal,
}

/// Computes totals for a set of (unit price, quantity) lines.
///
/// The tax is kept unrounded (4-decimal scale in storage); rounding happens
/// once, half-up to 2 decimals, on the grand total.
pub fn order_totals(lines: &[(BigDecimal, i32)]) -> OrderTotals {
    let subtotal: BigDecimal = lines
        .iter()
        .map(|(unit_price, quantity)| unit_price * BigDecimal::from(*quantity))
        .sum();
    let subtotal = subtotal.with_scale(2);
    let tax = &subtotal * tax_rate();
    let delivery_fee = delivery_fee();
    let total =
        (&subtotal + &tax + &delivery_fee).with_scale_round(2, RoundingMode::HalfUp);

    OrderTotals {
        subtotal,
        tax,
        delivery_fee,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn canonical_two_line_order() {
        // (5.00 x 2) + (3.00 x 1) = 13.00; tax 1.0725; + 4.99 = 19.0625 -> 19.06
        let totals = order_totals(&[(dec("5.00"), 2), (dec("3.00"), 1)]);
        assert_eq!(totals.subtotal, dec("13.00"));
        assert_eq!(totals.tax, dec("1.0725"));
        assert_eq!(totals.delivery_fee, dec("4.99"));
        assert_eq!(totals.total, dec("19.06"));
    }

    #[test]
    fn rounds_half_up_on_total() {
        // subtotal 2.00, tax 0.165, total 7.155 -> 7.16
        let totals = order_totals(&[(dec("2.00"), 1)]);
        assert_eq!(totals.total, dec("7.16"));
    }

    #[test]
    fn empty_lines_still_carry_the_delivery_fee() {
        let totals = order_totals(&[]);
        assert_eq!(totals.subtotal, dec("0.00"));
        assert_eq!(totals.total, dec("4.99"));
    }
}
