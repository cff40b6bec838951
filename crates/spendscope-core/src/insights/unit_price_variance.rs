//! Unit Price Variance Insight
//!
//! Flags items bought at widely different unit prices. A large spread
//! across suppliers for the same item points at renegotiation leverage.

use crate::error::Result;
use crate::models::Dataset;

use super::aggregate::{group_by, safe_ratio, ZeroPolicy, PRICE_FLOOR};
use super::engine::Rule;
use super::types::{Finding, Impact, InsightType, Subject};

/// Spread (max / min price) above which an item is flagged
pub const SPREAD_THRESHOLD: f64 = 1.5;

const RECOMMENDED_ACTION: &str = "Standardize pricing or renegotiate contracts";

/// Rule that compares unit prices within each item
pub struct UnitPriceVarianceRule;

impl UnitPriceVarianceRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UnitPriceVarianceRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for UnitPriceVarianceRule {
    fn id(&self) -> InsightType {
        InsightType::UnitPriceVariance
    }

    fn name(&self) -> &'static str {
        "Unit Price Variance"
    }

    fn analyze(&self, dataset: &Dataset) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();

        for (item, lines) in group_by(dataset, |l| l.item_number.as_str()) {
            let prices: Vec<f64> = lines.iter().map(|l| l.unit_price).collect();
            let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let min = prices.iter().copied().fold(f64::INFINITY, f64::min);

            // All-equal prices never trigger, whatever the floor would do
            if max == min {
                continue;
            }

            let spread = safe_ratio(max, min, ZeroPolicy::Floor(PRICE_FLOOR))?;
            if spread <= SPREAD_THRESHOLD {
                continue;
            }

            findings.push(Finding::new(
                InsightType::UnitPriceVariance,
                Subject::Item(item.to_string()),
                format!("{:.1}x spread", spread),
                Impact::Moderate,
                format!(
                    "Item {} has a {:.1}x price spread across suppliers.",
                    item, spread
                ),
                RECOMMENDED_ACTION,
            ));
        }

        Ok(findings)
    }
}
