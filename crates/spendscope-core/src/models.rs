//! Data models for procurement datasets

use serde::{Deserialize, Serialize};

/// An undecoded sheet: one header row plus string cells
///
/// This is what ingestion produces before the schema contract has looked at
/// it. Rows may be shorter than the header; missing cells read as blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers = headers.into_iter().map(|h| h.trim().to_string()).collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Index of a column by header name (first occurrence wins)
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell value, or "" when the row is short
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One validated purchase line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseLine {
    /// Item Number
    pub item_number: String,
    /// Supplier Name
    pub supplier_name: String,
    /// CY WAP USD (Fiscal) - current-year weighted-average unit price
    pub unit_price: f64,
    /// CY Quantity (Fiscal)
    pub quantity: f64,
    /// CY WAP * CY QTY - current-year extended spend
    pub extended_spend: f64,
    /// Item Name (upload schema only)
    pub item_name: Option<String>,
    /// CY vs PY WAP USD (Fiscal) - year-over-year unit price change (upload schema only)
    pub price_change: Option<f64>,
}

impl PurchaseLine {
    pub fn new(
        item_number: impl Into<String>,
        supplier_name: impl Into<String>,
        unit_price: f64,
        quantity: f64,
        extended_spend: f64,
    ) -> Self {
        Self {
            item_number: item_number.into(),
            supplier_name: supplier_name.into(),
            unit_price,
            quantity,
            extended_spend,
            item_name: None,
            price_change: None,
        }
    }

    /// Attach the year-over-year columns used by the savings views
    pub fn with_price_change(mut self, item_name: impl Into<String>, price_change: f64) -> Self {
        self.item_name = Some(item_name.into());
        self.price_change = Some(price_change);
        self
    }

    /// Quantity times the year-over-year price change, when known
    pub fn potential_savings(&self) -> Option<f64> {
        self.price_change.map(|change| self.quantity * change)
    }
}

/// An ordered sequence of validated purchase lines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    lines: Vec<PurchaseLine>,
}

impl Dataset {
    pub fn new(lines: Vec<PurchaseLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[PurchaseLine] {
        &self.lines
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PurchaseLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total extended spend over every line
    pub fn total_spend(&self) -> f64 {
        self.lines.iter().map(|l| l.extended_spend).sum()
    }
}

impl FromIterator<PurchaseLine> for Dataset {
    fn from_iter<I: IntoIterator<Item = PurchaseLine>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a PurchaseLine;
    type IntoIter = std::slice::Iter<'a, PurchaseLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_table_short_rows_read_blank() {
        let table = RawTable::new(
            vec![" Item Number ".to_string(), "Supplier Name".to_string()],
            vec![vec!["A100".to_string()]],
        );

        assert_eq!(table.column_index("Item Number"), Some(0));
        assert_eq!(table.cell(0, 0), "A100");
        assert_eq!(table.cell(0, 1), "");
        assert_eq!(table.cell(5, 0), "");
    }

    #[test]
    fn test_potential_savings() {
        let line = PurchaseLine::new("A100", "Acme", 10.0, 200.0, 2000.0);
        assert_eq!(line.potential_savings(), None);

        let line = line.with_price_change("Widget", 1.5);
        assert_eq!(line.potential_savings(), Some(300.0));
    }

    #[test]
    fn test_total_spend() {
        let dataset: Dataset = vec![
            PurchaseLine::new("A100", "Acme", 10.0, 10.0, 100.0),
            PurchaseLine::new("A200", "Globex", 5.0, 20.0, 100.0),
        ]
        .into_iter()
        .collect();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.total_spend(), 200.0);
    }
}
