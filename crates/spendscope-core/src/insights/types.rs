//! Core types for the Insight Engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Types of insights the built-in rules generate
///
/// Serialized with the human-readable label that appears in the `type`
/// field of each finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InsightType {
    /// Same item bought at widely different unit prices
    #[serde(rename = "Unit Price Variance")]
    UnitPriceVariance,
    /// A single supplier holds a large share of total spend
    #[serde(rename = "Supplier Overdependence")]
    SupplierConcentration,
    /// Item volume high enough to warrant a bulk discount
    #[serde(rename = "Missed Volume Discount")]
    MissedVolumeDiscount,
}

impl InsightType {
    /// Label stamped onto findings
    pub fn label(&self) -> &'static str {
        match self {
            InsightType::UnitPriceVariance => "Unit Price Variance",
            InsightType::SupplierConcentration => "Supplier Overdependence",
            InsightType::MissedVolumeDiscount => "Missed Volume Discount",
        }
    }

    /// Stable machine key (used in logs and CLI filters)
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::UnitPriceVariance => "unit_price_variance",
            InsightType::SupplierConcentration => "supplier_concentration",
            InsightType::MissedVolumeDiscount => "missed_volume_discount",
        }
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for InsightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unit_price_variance" | "Unit Price Variance" => Ok(InsightType::UnitPriceVariance),
            "supplier_concentration" | "Supplier Overdependence" => {
                Ok(InsightType::SupplierConcentration)
            }
            "missed_volume_discount" | "Missed Volume Discount" => {
                Ok(InsightType::MissedVolumeDiscount)
            }
            _ => Err(format!("Unknown insight type: {}", s)),
        }
    }
}

/// Severity of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Impact {
    Low,
    Moderate,
    High,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Low => "Low",
            Impact::Moderate => "Moderate",
            Impact::High => "High",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Impact {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Impact::Low),
            "moderate" => Ok(Impact::Moderate),
            "high" => Ok(Impact::High),
            _ => Err(format!("Unknown impact: {}", s)),
        }
    }
}

/// What a finding is about
///
/// Flattened into the finding, so it serializes as either an `item` or a
/// `supplier` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Item(String),
    Supplier(String),
}

impl Subject {
    pub fn id(&self) -> &str {
        match self {
            Subject::Item(id) | Subject::Supplier(id) => id,
        }
    }
}

/// A finding produced by a rule
///
/// Fields are read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(rename = "type")]
    insight_type: InsightType,
    #[serde(flatten)]
    subject: Subject,
    metric: String,
    impact: Impact,
    insight_text: String,
    recommended_action: String,
}

impl Finding {
    pub fn new(
        insight_type: InsightType,
        subject: Subject,
        metric: impl Into<String>,
        impact: Impact,
        insight_text: impl Into<String>,
        recommended_action: impl Into<String>,
    ) -> Self {
        Self {
            insight_type,
            subject,
            metric: metric.into(),
            impact,
            insight_text: insight_text.into(),
            recommended_action: recommended_action.into(),
        }
    }

    pub fn insight_type(&self) -> InsightType {
        self.insight_type
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn impact(&self) -> Impact {
        self.impact
    }

    pub fn insight_text(&self) -> &str {
        &self.insight_text
    }

    pub fn recommended_action(&self) -> &str {
        &self.recommended_action
    }
}
