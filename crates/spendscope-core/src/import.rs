//! Sheet decoding for procurement exports
//!
//! Decoding only turns bytes into a [`RawTable`].
//! Column checks and conversion happen in [`crate::schema`].

use std::io::Read;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Dataset, RawTable};
use crate::schema::SchemaContract;

/// Decode a CSV sheet (header row first) into a raw table
pub fn parse_csv<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(Error::Import("Sheet has no header row".into()));
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        // Spreadsheet exports often end with fully blank lines
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    debug!(
        columns = headers.len(),
        rows = rows.len(),
        "Decoded procurement sheet"
    );
    Ok(RawTable::new(headers, rows))
}

/// Decode a CSV sheet and validate it against a schema contract
pub fn load_dataset<R: Read>(reader: R, contract: &SchemaContract) -> Result<Dataset> {
    let table = parse_csv(reader)?;
    Ok(contract.validate(&table)?)
}
