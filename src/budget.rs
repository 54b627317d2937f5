//! Budget band matching
//!
//! The catalog publishes its price ranges as display names (`501～1000円`).
//! This module turns those names into numeric bands and resolves a user's
//! amount to the code of the first band that contains it.

use serde::{Deserialize, Serialize};

const BAND_SEPARATOR: char = '～';
const YEN_SUFFIX: char = '円';

/// One row of the catalog's price-range table.
///
/// At most one bound is absent: the cheapest band has no lower bound and the
/// most expensive has no upper bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetBand {
    pub lower: Option<i64>,
    pub upper: Option<i64>,
    pub code: String,
}

impl BudgetBand {
    pub fn new(lower: Option<i64>, upper: Option<i64>, code: impl Into<String>) -> Self {
        Self {
            lower,
            upper,
            code: code.into(),
        }
    }

    /// Build a band from the catalog's display name, e.g. `～500円` or
    /// `30001円～`. An empty side of the separator is an absent bound.
    pub fn from_display_name(name: &str, code: impl Into<String>) -> Self {
        let cleaned: String = name.chars().filter(|c| *c != YEN_SUFFIX).collect();
        let (lower, upper) = match cleaned.split_once(BAND_SEPARATOR) {
            Some((lower, upper)) => (parse_bound(lower), parse_bound(upper)),
            None => (parse_bound(&cleaned), None),
        };
        Self::new(lower, upper, code)
    }

    /// Boundary rule: lower exclusive, upper inclusive, open ends unbounded.
    pub fn contains(&self, amount: i64) -> bool {
        match (self.lower, self.upper) {
            (None, Some(upper)) => amount <= upper,
            (Some(lower), None) => amount > lower,
            (Some(lower), Some(upper)) => lower < amount && amount <= upper,
            (None, None) => false,
        }
    }
}

fn parse_bound(raw: &str) -> Option<i64> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    match digits.parse::<i64>() {
        // A zero bound reads as "no bound", matching how the table is published.
        Ok(0) | Err(_) => None,
        Ok(value) => Some(value),
    }
}

/// Return the code of the first band containing `amount`.
///
/// Bands are scanned in the order given; the table is expected to be sorted
/// ascending already. `None` means no band matched and must not be used as a
/// search filter.
pub fn match_budget_code(amount: i64, bands: &[BudgetBand]) -> Option<&str> {
    bands
        .iter()
        .find(|band| band.contains(amount))
        .map(|band| band.code.as_str())
}

/// Read the leading integer of a user's free text.
///
/// Leading whitespace and an optional sign are accepted, then ASCII digits up
/// to the first non-digit. Returns `None` when there are no leading digits;
/// callers decide whether that means zero. Overflow saturates.
pub fn parse_amount(text: &str) -> Option<i64> {
    let mut chars = text.trim_start().chars().peekable();
    let negative = match chars.peek() {
        Some('-') => {
            chars.next();
            true
        }
        Some('+') => {
            chars.next();
            false
        }
        _ => false,
    };

    let mut value: Option<i64> = None;
    for digit in chars.map_while(|c| c.to_digit(10)) {
        let acc = value.unwrap_or(0);
        value = Some(acc.saturating_mul(10).saturating_add(i64::from(digit)));
    }

    value.map(|v| if negative { -v } else { v })
}
