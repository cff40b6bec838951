//! Insight Engine - ordered rule registry and the pipeline that runs it

use crate::error::{Error, Result};
use crate::models::Dataset;

use super::types::{Finding, InsightType};
use super::{MissedVolumeDiscountRule, SupplierConcentrationRule, UnitPriceVarianceRule};

/// A stateless detector over a whole dataset
pub trait Rule: Send + Sync {
    /// Label stamped onto every finding this rule emits
    fn id(&self) -> InsightType;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Scan the dataset and produce findings
    fn analyze(&self, dataset: &Dataset) -> Result<Vec<Finding>>;
}

/// The ordered rule registry
///
/// Rules run in registration order and their outputs are concatenated in
/// that order. The built-in order is Unit Price Variance, Supplier
/// Concentration, Missed Volume Discount. New rules are appended, so
/// existing output positions never shift.
pub struct InsightEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in rules
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(UnitPriceVarianceRule::new()),
                Box::new(SupplierConcentrationRule::new()),
                Box::new(MissedVolumeDiscountRule::new()),
            ],
        }
    }

    /// Create an engine with no rules
    pub fn empty() -> Self {
        Self { rules: vec![] }
    }

    /// Append a rule; its label must not already be registered
    pub fn register(&mut self, rule: Box<dyn Rule>) -> Result<()> {
        if self.rules.iter().any(|r| r.id() == rule.id()) {
            return Err(Error::DuplicateRule(rule.id().label().to_string()));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Run every rule against the full dataset
    ///
    /// Fails fast on the first rule error; nothing is deduplicated or
    /// filtered across rules.
    pub fn analyze_all(&self, dataset: &Dataset) -> Result<Vec<Finding>> {
        let mut all_findings = vec![];

        for rule in &self.rules {
            let findings = rule.analyze(dataset).inspect_err(|e| {
                tracing::warn!(rule = rule.id().as_str(), error = %e, "Rule failed");
            })?;
            tracing::debug!(
                rule = rule.id().as_str(),
                count = findings.len(),
                "Rule analysis complete"
            );
            all_findings.extend(findings);
        }

        tracing::debug!(
            rows = dataset.len(),
            findings = all_findings.len(),
            "Insight pipeline complete"
        );
        Ok(all_findings)
    }

    /// Registered rule types, in execution order
    pub fn insight_types(&self) -> Vec<InsightType> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// Registered rule names, in execution order
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Run the built-in rules over one validated dataset
pub fn run_pipeline(dataset: &Dataset) -> Result<Vec<Finding>> {
    InsightEngine::new().analyze_all(dataset)
}
