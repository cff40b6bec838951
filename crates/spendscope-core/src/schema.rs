//! Schema contract for procurement datasets
//!
//! A [`SchemaContract`] lists the columns a sheet must carry and the semantic
//! type of each. Validation checks every column before reporting, so a
//! [`SchemaError`] always names all offending columns at once. A sheet that
//! passes is converted into a typed [`Dataset`].

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::models::{Dataset, PurchaseLine, RawTable};

pub const ITEM_NUMBER: &str = "Item Number";
pub const SUPPLIER_NAME: &str = "Supplier Name";
pub const UNIT_PRICE: &str = "CY WAP USD (Fiscal)";
pub const QUANTITY: &str = "CY Quantity (Fiscal)";
pub const EXTENDED_SPEND: &str = "CY WAP * CY QTY";
pub const ITEM_NAME: &str = "Item Name";
pub const PRICE_CHANGE: &str = "CY vs PY WAP USD (Fiscal)";

/// Semantic type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Grouping key; must not be blank
    Identifier,
    /// Finite number >= 0
    Decimal,
    /// Finite number of either sign
    SignedDecimal,
    /// Free text; blank allowed
    Text,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Identifier => "identifier",
            ColumnType::Decimal => "non-negative decimal",
            ColumnType::SignedDecimal => "decimal",
            ColumnType::Text => "text",
        }
    }

    /// Whether a raw cell is compatible with this type
    pub fn accepts(&self, raw: &str) -> bool {
        match self {
            ColumnType::Identifier => !raw.trim().is_empty(),
            ColumnType::Decimal => parse_decimal(raw).is_some_and(|v| v >= 0.0),
            ColumnType::SignedDecimal => parse_decimal(raw).is_some(),
            ColumnType::Text => true,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A required column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub column_type: ColumnType,
}

impl ColumnSpec {
    pub const fn new(name: &'static str, column_type: ColumnType) -> Self {
        Self { name, column_type }
    }
}

/// Columns every rule depends on
pub const CORE_COLUMNS: [ColumnSpec; 5] = [
    ColumnSpec::new(ITEM_NUMBER, ColumnType::Identifier),
    ColumnSpec::new(SUPPLIER_NAME, ColumnType::Identifier),
    ColumnSpec::new(UNIT_PRICE, ColumnType::Decimal),
    ColumnSpec::new(QUANTITY, ColumnType::Decimal),
    ColumnSpec::new(EXTENDED_SPEND, ColumnType::Decimal),
];

/// Extra columns needed by the savings views of an upload
pub const SAVINGS_COLUMNS: [ColumnSpec; 2] = [
    ColumnSpec::new(ITEM_NAME, ColumnType::Text),
    ColumnSpec::new(PRICE_CHANGE, ColumnType::SignedDecimal),
];

/// One reason a sheet does not satisfy the contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    Missing {
        column: String,
    },
    Incompatible {
        column: String,
        expected: ColumnType,
        /// 1-based data row (header excluded) of the first bad cell
        row: usize,
        value: String,
    },
}

impl Violation {
    pub fn column(&self) -> &str {
        match self {
            Violation::Missing { column } | Violation::Incompatible { column, .. } => column,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Missing { column } => write!(f, "missing column '{}'", column),
            Violation::Incompatible {
                column,
                expected,
                row,
                value,
            } => write!(
                f,
                "column '{}' expects {} (row {}: '{}')",
                column, expected, row, value
            ),
        }
    }
}

/// Every violation found while validating one sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaError {
    violations: Vec<Violation>,
}

impl SchemaError {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Names of the offending columns, in contract order
    pub fn columns(&self) -> Vec<&str> {
        self.violations.iter().map(Violation::column).collect()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} column(s) failed validation: ",
            self.violations.len()
        )?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaError {}

/// The set of columns a sheet must satisfy before rules run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaContract {
    columns: Vec<ColumnSpec>,
}

impl Default for SchemaContract {
    fn default() -> Self {
        Self::core()
    }
}

impl SchemaContract {
    /// Columns required by the insight rules
    pub fn core() -> Self {
        Self {
            columns: CORE_COLUMNS.to_vec(),
        }
    }

    /// Core columns plus the savings-view columns of an uploaded sheet
    pub fn upload() -> Self {
        let mut columns = CORE_COLUMNS.to_vec();
        columns.extend_from_slice(&SAVINGS_COLUMNS);
        Self { columns }
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    fn requires(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Validate a raw sheet and convert it into a typed dataset
    ///
    /// All columns are checked before returning; the error lists one
    /// violation per offending column in contract order.
    pub fn validate(&self, table: &RawTable) -> Result<Dataset, SchemaError> {
        let mut violations = Vec::new();
        let mut indices: HashMap<&'static str, usize> = HashMap::new();

        for spec in &self.columns {
            let Some(index) = table.column_index(spec.name) else {
                violations.push(Violation::Missing {
                    column: spec.name.to_string(),
                });
                continue;
            };
            indices.insert(spec.name, index);

            let bad_row =
                (0..table.len()).find(|&row| !spec.column_type.accepts(table.cell(row, index)));
            if let Some(row) = bad_row {
                violations.push(Violation::Incompatible {
                    column: spec.name.to_string(),
                    expected: spec.column_type,
                    row: row + 1,
                    value: table.cell(row, index).to_string(),
                });
            }
        }

        if !violations.is_empty() {
            tracing::debug!(
                violations = violations.len(),
                rows = table.len(),
                "Schema validation failed"
            );
            return Err(SchemaError::new(violations));
        }

        let with_savings = self.requires(PRICE_CHANGE) && self.requires(ITEM_NAME);
        let lines = (0..table.len())
            .map(|row| {
                let cell = |name: &str| {
                    indices
                        .get(name)
                        .map(|&index| table.cell(row, index))
                        .unwrap_or("")
                };
                let decimal = |name: &str| parse_decimal(cell(name)).unwrap_or(0.0);

                let line = PurchaseLine::new(
                    cell(ITEM_NUMBER).trim(),
                    cell(SUPPLIER_NAME).trim(),
                    decimal(UNIT_PRICE),
                    decimal(QUANTITY),
                    decimal(EXTENDED_SPEND),
                );
                if with_savings {
                    line.with_price_change(cell(ITEM_NAME).trim(), decimal(PRICE_CHANGE))
                } else {
                    line
                }
            })
            .collect();

        Ok(Dataset::new(lines))
    }
}

/// Parse a spreadsheet number, tolerating currency formatting
///
/// Accepts `$1,234.56`, `1 234`, and accounting negatives like `(100.00)`.
/// Returns None for blanks, text, NaN and infinities.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let cleaned: String = trimmed
        .replace(['$', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
