//! Insight Engine - rule-based procurement findings
//!
//! Each rule scans a validated [`Dataset`](crate::models::Dataset) for one
//! cost-saving pattern and emits [`Finding`]s. The engine holds the rules in
//! a fixed order and concatenates their output.
//!
//! ## Built-in Rules (in execution order)
//!
//! - **Unit Price Variance** - same item bought at a >1.5x price spread
//! - **Supplier Concentration** - one supplier holds >40% of total spend
//! - **Missed Volume Discount** - more than 10,000 units of one item
//!
//! Within a rule, findings follow ascending order of the group key (item
//! number or supplier name), so output is stable for a given dataset.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spendscope_core::insights::InsightEngine;
//!
//! let engine = InsightEngine::new();
//! let findings = engine.analyze_all(&dataset)?;
//! ```

pub mod aggregate;
pub mod engine;
pub mod supplier_concentration;
pub mod types;
pub mod unit_price_variance;
pub mod volume_discount;

pub use aggregate::{safe_ratio, ZeroPolicy};
pub use engine::{run_pipeline, InsightEngine, Rule};
pub use supplier_concentration::SupplierConcentrationRule;
pub use types::{Finding, Impact, InsightType, Subject};
pub use unit_price_variance::UnitPriceVarianceRule;
pub use volume_discount::MissedVolumeDiscountRule;
