//! Invoice number allocation.
//!
//! Numbers are derived from a snapshot of the store's existing invoice
//! numbers: the largest trailing run of digits plus one. Two sessions that
//! read the same snapshot will produce the same number; only the store can
//! rule that out.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Formatting rules for allocated numbers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NumberingPolicy {
    /// Text before the underscore, `INV` by default.
    pub prefix: String,
    /// Minimum number of digits; longer numbers are never truncated.
    pub min_width: usize,
    /// How many trailing timestamp digits the fallback uses.
    pub fallback_digits: usize,
}

impl Default for NumberingPolicy {
    fn default() -> Self {
        Self {
            prefix: "INV".to_string(),
            min_width: 3,
            fallback_digits: 5,
        }
    }
}

/// Allocates invoice numbers according to a [`NumberingPolicy`].
#[derive(Debug, Clone, Default)]
pub struct InvoiceNumberAllocator {
    policy: NumberingPolicy,
}

impl InvoiceNumberAllocator {
    pub fn new(policy: NumberingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &NumberingPolicy {
        &self.policy
    }

    /// Next number after the highest one found in `existing`.
    ///
    /// Absent and empty entries, and entries without trailing digits, are
    /// skipped. The prefix of existing numbers is not checked.
    pub fn allocate_next<I, S>(&self, existing: I) -> String
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let max_found = existing
            .into_iter()
            .flatten()
            .filter_map(|number| trailing_number(number.as_ref()))
            .max()
            .unwrap_or(0);

        format!(
            "{}_{:0>width$}",
            self.policy.prefix,
            max_found.saturating_add(1),
            width = self.policy.min_width
        )
    }

    /// Number used when the existing invoices cannot be fetched: the last
    /// digits of the millisecond timestamp. Unique with high probability
    /// only.
    pub fn fallback_number(&self, now: DateTime<Utc>) -> String {
        let millis = now.timestamp_millis().to_string();
        let keep = self.policy.fallback_digits.min(millis.len());
        format!("{}_{}", self.policy.prefix, &millis[millis.len() - keep..])
    }
}

/// [`InvoiceNumberAllocator::allocate_next`] with the default policy.
pub fn allocate_next<I, S>(existing: I) -> String
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    InvoiceNumberAllocator::default().allocate_next(existing)
}

/// Integer value of the digits ending `number`, if any.
fn trailing_number(number: &str) -> Option<u64> {
    let digits_start = number
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    number[digits_start..].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn trailing_digits_are_extracted() {
        assert_eq!(trailing_number("INV_007"), Some(7));
        assert_eq!(trailing_number("2024-INV-15"), Some(15));
        assert_eq!(trailing_number("42"), Some(42));
        assert_eq!(trailing_number("INV_7a"), None);
        assert_eq!(trailing_number(""), None);
    }

    #[test]
    fn oversized_suffix_is_ignored() {
        assert_eq!(trailing_number("INV_99999999999999999999999"), None);
        assert_eq!(
            allocate_next([Some("INV_99999999999999999999999"), Some("INV_010")]),
            "INV_011"
        );
    }

    #[test]
    fn custom_policy_changes_format_only() {
        let allocator = InvoiceNumberAllocator::new(NumberingPolicy {
            prefix: "BILL".to_string(),
            min_width: 5,
            fallback_digits: 4,
        });
        assert_eq!(allocator.allocate_next([Some("INV_041")]), "BILL_00042");
    }

    #[test]
    fn fallback_uses_trailing_timestamp_digits() {
        let allocator = InvoiceNumberAllocator::default();
        let now = Utc.timestamp_millis_opt(1_718_000_123_456).unwrap();
        assert_eq!(allocator.fallback_number(now), "INV_23456");

        let early = Utc.timestamp_millis_opt(1_000_001_234).unwrap();
        assert_eq!(allocator.fallback_number(early), "INV_01234");
    }
}
