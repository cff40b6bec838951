//! Supplier Concentration Insight
//!
//! Flags suppliers that hold a large share of total extended spend.

use crate::error::{Error, Result};
use crate::models::Dataset;

use super::aggregate::{safe_ratio, sum_by, ZeroPolicy};
use super::engine::Rule;
use super::types::{Finding, Impact, InsightType, Subject};

/// Share of total spend above which a supplier is flagged
pub const SHARE_THRESHOLD: f64 = 0.4;

const RECOMMENDED_ACTION: &str = "Evaluate diversification or dual-sourcing.";

/// Rule that measures each supplier's share of total spend
pub struct SupplierConcentrationRule;

impl SupplierConcentrationRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SupplierConcentrationRule {
    fn default() -> Self {
        Self::new()
    }
}

/// Whole-percent rendering of a share, e.g. 0.5 -> "50%"
fn format_share(share: f64) -> String {
    format!("{:.0}%", share * 100.0)
}

impl Rule for SupplierConcentrationRule {
    fn id(&self) -> InsightType {
        InsightType::SupplierConcentration
    }

    fn name(&self) -> &'static str {
        "Supplier Concentration"
    }

    fn analyze(&self, dataset: &Dataset) -> Result<Vec<Finding>> {
        let spend_by_supplier =
            sum_by(dataset, |l| l.supplier_name.as_str(), |l| l.extended_spend);
        let total: f64 = spend_by_supplier.values().sum();

        let mut findings = Vec::new();

        for (supplier, spend) in spend_by_supplier {
            let share = match safe_ratio(spend, total, ZeroPolicy::Reject) {
                Ok(share) => share,
                // Zero or overflowing total spend: no share is meaningful
                Err(Error::DegenerateInput(reason)) => {
                    tracing::debug!(rows = dataset.len(), %reason, "Skipping supplier shares");
                    return Ok(vec![]);
                }
                Err(e) => return Err(e),
            };

            if share.is_nan() || share <= SHARE_THRESHOLD {
                continue;
            }

            let percent = format_share(share);
            findings.push(Finding::new(
                InsightType::SupplierConcentration,
                Subject::Supplier(supplier.to_string()),
                format!("{} of total spend", percent),
                Impact::High,
                format!(
                    "{} accounts for {} of total spend — potential risk.",
                    supplier, percent
                ),
                RECOMMENDED_ACTION,
            ));
        }

        Ok(findings)
    }
}
