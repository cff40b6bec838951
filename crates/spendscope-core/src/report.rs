//! Upload report: savings views plus rule findings
//!
//! The views here sit outside the rule framework. They need the
//! year-over-year columns of the upload schema
//! ([`SchemaContract::upload`](crate::schema::SchemaContract::upload)).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::insights::aggregate::sum_by;
use crate::insights::{Finding, InsightEngine};
use crate::models::{Dataset, PurchaseLine};
use crate::schema::PRICE_CHANGE;

/// Number of suppliers and outliers reported
pub const TOP_N: usize = 3;

/// A supplier ranked by summed potential savings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierSavings {
    #[serde(rename = "Supplier Name")]
    pub supplier: String,
    #[serde(rename = "Potential Savings")]
    pub potential_savings: f64,
}

/// A purchase line with one of the largest year-over-year price moves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceOutlier {
    #[serde(rename = "Supplier Name")]
    pub supplier: String,
    #[serde(rename = "Item Name")]
    pub item_name: String,
    #[serde(rename = "CY vs PY WAP USD (Fiscal)")]
    pub price_change: f64,
}

/// Advisory actions shown next to the findings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RecommendedAction {
    #[serde(rename = "Renegotiate Pricing")]
    RenegotiatePricing { supplier: String, savings: String },
    #[serde(rename = "Consolidate Tail Spend")]
    ConsolidateTailSpend { note: String },
    #[serde(rename = "Rationalize Overlapping Materials")]
    RationalizeOverlappingMaterials { note: String },
}

/// Everything returned for one uploaded sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcurementReport {
    pub top_suppliers: Vec<SupplierSavings>,
    pub outliers: Vec<PriceOutlier>,
    pub actions: Vec<RecommendedAction>,
    pub dynamic_insights: Vec<Finding>,
}

impl ProcurementReport {
    /// Build the savings views and run the engine over the same dataset
    pub fn build(dataset: &Dataset, engine: &InsightEngine) -> Result<Self> {
        let top_suppliers = top_savings_suppliers(dataset, TOP_N)?;
        let outliers = price_change_outliers(dataset, TOP_N)?;
        let actions = recommended_actions(&top_suppliers);
        let dynamic_insights = engine.analyze_all(dataset)?;

        tracing::debug!(
            rows = dataset.len(),
            suppliers = top_suppliers.len(),
            outliers = outliers.len(),
            findings = dynamic_insights.len(),
            "Built procurement report"
        );

        Ok(Self {
            top_suppliers,
            outliers,
            actions,
            dynamic_insights,
        })
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn price_change_of(index: usize, line: &PurchaseLine) -> Result<f64> {
    line.price_change.ok_or_else(|| {
        Error::InvalidData(format!(
            "Row {} has no '{}' value; savings views need the upload schema",
            index + 1,
            PRICE_CHANGE
        ))
    })
}

/// Suppliers with the highest summed potential savings, descending
///
/// Potential savings per line is quantity times the year-over-year price
/// change. Ties keep supplier-name order.
pub fn top_savings_suppliers(dataset: &Dataset, limit: usize) -> Result<Vec<SupplierSavings>> {
    for (index, line) in dataset.iter().enumerate() {
        price_change_of(index, line)?;
    }

    let mut ranked: Vec<SupplierSavings> = sum_by(
        dataset,
        |l| l.supplier_name.as_str(),
        |l| l.potential_savings().unwrap_or(0.0),
    )
    .into_iter()
    .map(|(supplier, potential_savings)| SupplierSavings {
        supplier: supplier.to_string(),
        potential_savings,
    })
    .collect();

    ranked.sort_by(|a, b| b.potential_savings.total_cmp(&a.potential_savings));
    ranked.truncate(limit);
    Ok(ranked)
}

/// Lines with the largest absolute price change, descending
///
/// Ties keep dataset order.
pub fn price_change_outliers(dataset: &Dataset, limit: usize) -> Result<Vec<PriceOutlier>> {
    let mut outliers = dataset
        .iter()
        .enumerate()
        .map(|(index, line)| {
            Ok(PriceOutlier {
                supplier: line.supplier_name.clone(),
                item_name: line.item_name.clone().unwrap_or_default(),
                price_change: price_change_of(index, line)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    outliers.sort_by(|a, b| b.price_change.abs().total_cmp(&a.price_change.abs()));
    outliers.truncate(limit);
    Ok(outliers)
}

/// Advisory actions; renegotiation is suggested only when a top supplier exists
pub fn recommended_actions(top_suppliers: &[SupplierSavings]) -> Vec<RecommendedAction> {
    let mut actions = Vec::with_capacity(3);

    if let Some(top) = top_suppliers.first() {
        actions.push(RecommendedAction::RenegotiatePricing {
            supplier: top.supplier.clone(),
            savings: format_usd(top.potential_savings),
        });
    }

    actions.push(RecommendedAction::ConsolidateTailSpend {
        note: "3+ suppliers under $10K spend".to_string(),
    });
    actions.push(RecommendedAction::RationalizeOverlappingMaterials {
        note: "Multiple suppliers provide similar materials".to_string(),
    });

    actions
}

/// Whole-dollar amount with thousands separators, e.g. `$12,345`
///
/// Negative amounts render as `$-1,234`.
pub fn format_usd(amount: f64) -> String {
    let rounded = format!("{:.0}", amount);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", rounded.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("${}{}", sign, grouped)
}
