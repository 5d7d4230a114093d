//! Best-effort grand total lookup in a costing table

use once_cell::sync::Lazy;
use regex::Regex;

static AMOUNT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9][0-9,]*(?:\.[0-9]+)?").expect("Invalid regex pattern"));

const GRAND_TOTAL_MARKER: &str = "grand total";

/// Find the grand total in a costing text.
///
/// Takes the first line mentioning "grand total" (any case) and parses the
/// first number on it, ignoring thousands separators. Returns 0 when there
/// is no such line or no number on it. Never fails; the result is always
/// finite and non-negative.
pub fn parse_grand_total(costing: &str) -> f64 {
    let Some(line) = costing
        .lines()
        .find(|line| line.to_lowercase().contains(GRAND_TOTAL_MARKER))
    else {
        return 0.0;
    };

    let Some(amount) = AMOUNT_REGEX.find(line) else {
        return 0.0;
    };

    amount
        .as_str()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indian_grouping_with_decimals() {
        assert_eq!(parse_grand_total("Grand Total: ₹12,34,567.50\n"), 1234567.5);
    }

    #[test]
    fn test_no_total_line() {
        assert_eq!(parse_grand_total("no total here"), 0.0);
        assert_eq!(parse_grand_total(""), 0.0);
    }

    #[test]
    fn test_total_line_without_number() {
        assert_eq!(parse_grand_total("Grand Total: to be decided"), 0.0);
    }

    #[test]
    fn test_first_matching_line_wins() {
        let costing = "Subtotal: ₹9,00,000\n**GRAND TOTAL**: ₹9,90,000\nGrand total (revised): ₹5";
        assert_eq!(parse_grand_total(costing), 990000.0);
    }

    #[test]
    fn test_table_row_total() {
        let costing = "| Material | Total |\n|---|---|\n| Steel | ₹4,00,000 |\n| **Grand Total** | **₹15,40,000** |";
        assert_eq!(parse_grand_total(costing), 1540000.0);
    }

    #[test]
    fn test_comma_run_without_digits_is_skipped() {
        assert_eq!(parse_grand_total("Grand Total, approx ₹2,500"), 2500.0);
    }

    #[test]
    fn test_overflowing_number_is_zero() {
        let line = format!("Grand Total: {}", "9".repeat(400));
        assert_eq!(parse_grand_total(&line), 0.0);
    }
}
