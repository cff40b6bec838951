//! Grouping and ratio helpers shared by the rules

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::models::{Dataset, PurchaseLine};

/// Smallest unit price used as a divisor in price spreads
pub const PRICE_FLOOR: f64 = 0.01;

/// What to do when a ratio's denominator is zero or too small
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZeroPolicy {
    /// Divide by `max(denominator, floor)`; the floor must be positive
    Floor(f64),
    /// Report [`Error::DegenerateInput`] for a zero or non-finite denominator
    Reject,
}

/// Divide under an explicit zero-denominator policy
pub fn safe_ratio(numerator: f64, denominator: f64, policy: ZeroPolicy) -> Result<f64> {
    match policy {
        ZeroPolicy::Floor(floor) => {
            debug_assert!(floor > 0.0, "ratio floor must be positive");
            Ok(numerator / denominator.max(floor))
        }
        ZeroPolicy::Reject => {
            if denominator == 0.0 || !denominator.is_finite() {
                Err(Error::DegenerateInput(format!(
                    "ratio {} / {} is undefined",
                    numerator, denominator
                )))
            } else {
                Ok(numerator / denominator)
            }
        }
    }
}

/// Group lines by a key, iterating groups in ascending key order
///
/// Lines keep their dataset order within a group.
pub fn group_by<'a, F>(dataset: &'a Dataset, key: F) -> BTreeMap<&'a str, Vec<&'a PurchaseLine>>
where
    F: Fn(&'a PurchaseLine) -> &'a str,
{
    let mut groups: BTreeMap<&'a str, Vec<&'a PurchaseLine>> = BTreeMap::new();
    for line in dataset {
        groups.entry(key(line)).or_default().push(line);
    }
    groups
}

/// Sum a field per group, iterating groups in ascending key order
pub fn sum_by<'a, K, V>(dataset: &'a Dataset, key: K, value: V) -> BTreeMap<&'a str, f64>
where
    K: Fn(&'a PurchaseLine) -> &'a str,
    V: Fn(&PurchaseLine) -> f64,
{
    let mut totals: BTreeMap<&'a str, f64> = BTreeMap::new();
    for line in dataset {
        *totals.entry(key(line)).or_insert(0.0) += value(line);
    }
    totals
}
