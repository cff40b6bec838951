//! Spendscope Core Library
//!
//! Shared functionality for the Spendscope procurement insight engine:
//! - Schema contract for procurement sheets
//! - CSV decoding into raw tables
//! - Rule-based insight engine (price variance, supplier concentration,
//!   missed volume discounts)
//! - Savings views and the combined upload report

pub mod error;
pub mod import;
pub mod insights;
pub mod models;
pub mod report;
pub mod schema;

/// Sheet builders for tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{Error, Result};
pub use import::{load_dataset, parse_csv};
pub use insights::{
    run_pipeline, Finding, Impact, InsightEngine, InsightType, Rule, Subject,
};
pub use models::{Dataset, PurchaseLine, RawTable};
pub use report::{ProcurementReport, RecommendedAction};
pub use schema::{SchemaContract, SchemaError, Violation};
