//! Input parsing helpers.

pub mod lenient;

use rust_decimal::Decimal;

/// Parse a numeric form field the way a browser's `parseFloat` does: the
/// longest leading number, exponent included, is used and anything
/// unparseable is zero. Values `Decimal` cannot represent are zero too.
pub fn parse_amount(raw: &str) -> Decimal {
    let raw = raw.trim_start();
    let bytes = raw.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            has_digits = true;
            end = frac_end;
        }
    }

    if !has_digits {
        return Decimal::ZERO;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'-' | b'+')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }
    lenient::decimal_from_str(&raw[..end]).unwrap_or(Decimal::ZERO)
}
