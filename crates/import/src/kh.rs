use std::io::Read;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One row of a K&H Bank account-history export, fields trimmed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KhTransaction {
    pub date: String,
    pub transaction_id: String,
    pub type_label: String,
    pub account_number: String,
    pub account_name: String,
    pub partner_account: String,
    pub partner_name: String,
    pub amount: String,
    pub currency: String,
    pub description: String,
}

#[derive(Error, Debug)]
pub enum TsvError {
    #[error("error reading TSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("file must contain at least a header and one transaction")]
    Empty,
}

/// Parses a K&H TSV export. Tab-delimited, first row is the header, rows may
/// have trailing extra columns. Rows with fewer than 9 fields are skipped.
pub fn parse_export<R: Read>(reader: R) -> Result<Vec<KhTransaction>, TsvError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in csv_reader.records() {
        records.push(result?);
    }

    if records.len() < 2 {
        return Err(TsvError::Empty);
    }

    let transactions = records[1..]
        .iter()
        .filter(|record| record.len() >= 9)
        .map(|record| KhTransaction {
            date: field(record, 0),
            transaction_id: field(record, 1),
            type_label: field(record, 2),
            account_number: field(record, 3),
            account_name: field(record, 4),
            partner_account: field(record, 5),
            partner_name: field(record, 6),
            amount: field(record, 7),
            currency: field(record, 8),
            description: field(record, 9),
        })
        .collect();

    Ok(transactions)
}

fn field(record: &csv::StringRecord, index: usize) -> String {
    record.get(index).unwrap_or_default().trim().to_string()
}
