//! Missed Volume Discount Insight
//!
//! Flags items whose purchased volume should have earned a bulk discount.

use crate::error::Result;
use crate::models::Dataset;

use super::aggregate::sum_by;
use super::engine::Rule;
use super::types::{Finding, Impact, InsightType, Subject};

/// Summed quantity above which an item is flagged (strict)
pub const VOLUME_THRESHOLD: f64 = 10_000.0;

const RECOMMENDED_ACTION: &str = "Consolidate volume and renegotiate pricing.";

/// Rule that totals purchased quantity per item
pub struct MissedVolumeDiscountRule;

impl MissedVolumeDiscountRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MissedVolumeDiscountRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for MissedVolumeDiscountRule {
    fn id(&self) -> InsightType {
        InsightType::MissedVolumeDiscount
    }

    fn name(&self) -> &'static str {
        "Missed Volume Discount"
    }

    fn analyze(&self, dataset: &Dataset) -> Result<Vec<Finding>> {
        let findings = sum_by(dataset, |l| l.item_number.as_str(), |l| l.quantity)
            .into_iter()
            .filter(|(_, total_qty)| *total_qty > VOLUME_THRESHOLD)
            .map(|(item, total_qty)| {
                Finding::new(
                    InsightType::MissedVolumeDiscount,
                    Subject::Item(item.to_string()),
                    format!("{:.0} units purchased", total_qty.trunc()),
                    Impact::Moderate,
                    format!(
                        "Item {} exceeds 10,000 units purchased — missed bulk discount opportunity.",
                        item
                    ),
                    RECOMMENDED_ACTION,
                )
            })
            .collect();

        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PurchaseLine;

    fn dataset(lines: &[(&str, f64)]) -> Dataset {
        lines
            .iter()
            .map(|(item, qty)| PurchaseLine::new(*item, "Acme", 1.0, *qty, *qty))
            .collect()
    }

    #[test]
    fn test_boundary_does_not_trigger() {
        let findings = MissedVolumeDiscountRule::new()
            .analyze(&dataset(&[("A100", 10000.0)]))
            .unwrap();

        assert!(findings.is_empty());
    }

    #[test]
    fn test_one_over_boundary_triggers() {
        let findings = MissedVolumeDiscountRule::new()
            .analyze(&dataset(&[("A100", 10001.0)]))
            .unwrap();

        assert_eq!(findings.len(), 1);
        let finding = &findings[0];
        assert_eq!(finding.insight_type(), InsightType::MissedVolumeDiscount);
        assert_eq!(finding.subject(), &Subject::Item("A100".into()));
        assert_eq!(finding.metric(), "10001 units purchased");
        assert_eq!(finding.impact(), Impact::Moderate);
        assert_eq!(
            finding.insight_text(),
            "Item A100 exceeds 10,000 units purchased — missed bulk discount opportunity."
        );
        assert_eq!(
            finding.recommended_action(),
            "Consolidate volume and renegotiate pricing."
        );
    }

    #[test]
    fn test_quantity_summed_across_suppliers_and_truncated() {
        let findings = MissedVolumeDiscountRule::new()
            .analyze(&dataset(&[("B200", 6000.25), ("A100", 9000.0), ("B200", 4000.5)]))
            .unwrap();

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].subject().id(), "B200");
        assert_eq!(findings[0].metric(), "10000 units purchased");
    }

    #[test]
    fn test_huge_quantity_prints_every_digit() {
        let findings = MissedVolumeDiscountRule::new()
            .analyze(&dataset(&[("A100", 1e19)]))
            .unwrap();

        assert_eq!(findings[0].metric(), "10000000000000000000 units purchased");
    }
}
