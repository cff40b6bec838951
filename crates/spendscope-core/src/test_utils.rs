//! Test utilities for spendscope-core
//!
//! Builders for procurement sheets in the upload layout, shared with the
//! server and CLI test suites.

use crate::schema::{
    EXTENDED_SPEND, ITEM_NAME, ITEM_NUMBER, PRICE_CHANGE, QUANTITY, SUPPLIER_NAME, UNIT_PRICE,
};

/// One row of an upload sheet
#[derive(Debug, Clone)]
pub struct SheetRow {
    pub supplier: String,
    pub item_number: String,
    pub item_name: String,
    pub unit_price: f64,
    pub quantity: f64,
    pub price_change: f64,
}

/// Builds CSV text in the upload layout
///
/// Extended spend is derived as price times quantity.
#[derive(Debug, Clone, Default)]
pub struct SheetBuilder {
    rows: Vec<SheetRow>,
}

impl SheetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(
        mut self,
        supplier: &str,
        item_number: &str,
        unit_price: f64,
        quantity: f64,
        price_change: f64,
    ) -> Self {
        self.rows.push(SheetRow {
            supplier: supplier.to_string(),
            item_number: item_number.to_string(),
            item_name: format!("{} part", item_number),
            unit_price,
            quantity,
            price_change,
        });
        self
    }

    /// Render with every upload column, quoting cells as needed
    pub fn to_csv(&self) -> String {
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.write_record([
            SUPPLIER_NAME,
            ITEM_NUMBER,
            ITEM_NAME,
            UNIT_PRICE,
            QUANTITY,
            EXTENDED_SPEND,
            PRICE_CHANGE,
        ])
        .unwrap();

        for row in &self.rows {
            wtr.write_record([
                row.supplier.clone(),
                row.item_number.clone(),
                row.item_name.clone(),
                row.unit_price.to_string(),
                row.quantity.to_string(),
                (row.unit_price * row.quantity).to_string(),
                row.price_change.to_string(),
            ])
            .unwrap();
        }

        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }
}

/// A small sheet that triggers every built-in rule once
///
/// - A100 is bought at 10.00 and 20.00 (2.0x spread)
/// - Acme holds 145,000 of 162,000 total spend (90%)
/// - B200 totals 10,500 units
/// - Acme has the most potential savings (1,750); Initech's 3.00 change is the largest
pub fn sample_sheet() -> SheetBuilder {
    SheetBuilder::new()
        .row("Acme", "A100", 10.0, 500.0, 1.5)
        .row("Globex", "A100", 20.0, 500.0, -0.25)
        .row("Acme", "B200", 14.0, 10_000.0, 0.1)
        .row("Initech", "B200", 14.0, 500.0, 3.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::load_dataset;
    use crate::schema::SchemaContract;

    #[test]
    fn test_to_csv_quotes_commas() {
        let csv = SheetBuilder::new()
            .row("Globex, Inc.", "A100", 10.0, 5.0, 0.5)
            .to_csv();

        let dataset = load_dataset(csv.as_bytes(), &SchemaContract::upload()).unwrap();
        let line = &dataset.lines()[0];
        assert_eq!(line.supplier_name, "Globex, Inc.");
        assert_eq!(line.item_number, "A100");
        assert_eq!(line.quantity, 5.0);
        assert_eq!(line.price_change, Some(0.5));
    }

    #[test]
    fn test_sample_sheet_loads() {
        let csv = sample_sheet().to_csv();
        let dataset = load_dataset(csv.as_bytes(), &SchemaContract::upload()).unwrap();
        assert_eq!(dataset.len(), 4);
    }
}
