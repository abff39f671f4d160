use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

fn grams_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9]+(\.[0-9]+)?").expect("grams pattern is valid"))
}

/// Extracts the first decimal number from a free-form weight label.
///
/// `"3.5g"` and `"çəki: 3.5 q"` both give `3.5`. A comma is not a decimal
/// separator here, so `"3,5 q"` gives `3`. Labels without digits, and digit runs
/// too long to fit a [`Decimal`], give zero.
pub fn parse_grams(label: &str) -> Decimal {
    grams_pattern()
        .find(label)
        .and_then(|found| Decimal::from_str(found.as_str()).ok())
        .unwrap_or(Decimal::ZERO)
}
