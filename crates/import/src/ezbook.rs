use std::fmt;
use std::io::Write;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

use ezbook_core::{categorize, RuleSet};

use crate::kh::KhTransaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "Income"),
            TransactionKind::Expense => write!(f, "Expense"),
        }
    }
}

/// A transaction in ezBookkeeping import format. Amount is absolute cents;
/// the direction lives in `kind`.
#[derive(Debug, Clone)]
pub struct EzTransaction {
    pub kind: TransactionKind,
    pub category: String,
    pub subcategory: String,
    pub account: String,
    pub amount_cents: i64,
    pub datetime: NaiveDateTime,
    pub description: String,
    pub tags: String,
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("transaction {id}: invalid date '{value}'")]
    InvalidDate { id: String, value: String },
    #[error("transaction {id}: invalid amount '{value}'")]
    InvalidAmount { id: String, value: String },
}

/// Converts K&H rows into ezBookkeeping rows, categorizing each against the
/// ruleset. Failed rows are collected as errors, not fatal to the batch.
pub struct Converter {
    account_name: String,
}

impl Converter {
    pub fn new(account_name: &str) -> Self {
        Converter {
            account_name: account_name.to_string(),
        }
    }

    pub fn convert(
        &self,
        transactions: &[KhTransaction],
        rules: &RuleSet,
    ) -> (Vec<EzTransaction>, Vec<ConvertError>) {
        let mut converted = Vec::with_capacity(transactions.len());
        let mut errors = Vec::new();

        for tx in transactions {
            match self.convert_single(tx, rules) {
                Ok(ez) => converted.push(ez),
                Err(e) => errors.push(e),
            }
        }

        (converted, errors)
    }

    fn convert_single(
        &self,
        tx: &KhTransaction,
        rules: &RuleSet,
    ) -> Result<EzTransaction, ConvertError> {
        let datetime = parse_date(&tx.date).ok_or_else(|| ConvertError::InvalidDate {
            id: tx.transaction_id.clone(),
            value: tx.date.clone(),
        })?;

        let amount_cents = parse_amount_cents(&tx.amount).ok_or_else(|| {
            ConvertError::InvalidAmount {
                id: tx.transaction_id.clone(),
                value: tx.amount.clone(),
            }
        })?;

        let kind = if amount_cents > 0 {
            TransactionKind::Income
        } else {
            TransactionKind::Expense
        };

        let result = categorize(&tx.partner_name, &tx.type_label, rules);
        let subcategory = if result.subcategory.is_empty() {
            // The engine left the default pick to us: direction decides.
            match kind {
                TransactionKind::Income => "Other Income".to_string(),
                TransactionKind::Expense => "Other Expense".to_string(),
            }
        } else {
            result.subcategory
        };

        Ok(EzTransaction {
            kind,
            category: result.category,
            subcategory,
            account: self.account_name.clone(),
            amount_cents: amount_cents.abs(),
            datetime,
            description: build_description(tx),
            tags: String::new(),
        })
    }
}

/// ezBookkeeping Data Export File header; all 14 columns are required.
const CSV_HEADER: [&str; 14] = [
    "Time",
    "Timezone",
    "Type",
    "Category",
    "Sub Category",
    "Account",
    "Account Currency",
    "Amount",
    "Account2",
    "Account2 Currency",
    "Account2 Amount",
    "Geographic Location",
    "Tags",
    "Description",
];

const TIMEZONE: &str = "+01:00";
const CURRENCY: &str = "HUF";

pub fn write_csv<W: Write>(writer: W, transactions: &[EzTransaction]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(CSV_HEADER)?;

    for tx in transactions {
        let record = [
            tx.datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            TIMEZONE.to_string(),
            tx.kind.to_string(),
            tx.category.clone(),
            tx.subcategory.clone(),
            tx.account.clone(),
            CURRENCY.to_string(),
            format_amount(tx.amount_cents),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            tx.tags.clone(),
            tx.description.clone(),
        ];
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// K&H dates are `YYYY.MM.DD`, occasionally with a time component.
fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y.%m.%d %H:%M:%S") {
        return Some(dt);
    }

    NaiveDate::parse_from_str(value, "%Y.%m.%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Hungarian amount formatting: space as thousands separator, comma as the
/// decimal separator ("-12 345,67").
fn parse_amount_cents(value: &str) -> Option<i64> {
    let cleaned = value.replace(' ', "").replace(',', ".");
    let amount = Decimal::from_str(&cleaned).ok()?;
    (amount * Decimal::from(100)).round().to_i64()
}

fn format_amount(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, (cents % 100).abs())
}

fn build_description(tx: &KhTransaction) -> String {
    let mut parts = Vec::new();

    if !tx.partner_name.is_empty() {
        parts.push(tx.partner_name.clone());
    }
    if !tx.type_label.is_empty() {
        parts.push(format!("({})", tx.type_label));
    }
    if !tx.description.is_empty() && tx.description != tx.partner_name {
        parts.push(tx.description.clone());
    }

    parts.join(" - ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ezbook_core::Category;

    fn kh_tx(partner: &str, type_label: &str, amount: &str) -> KhTransaction {
        KhTransaction {
            date: "2024.01.15".to_string(),
            transaction_id: "TX001".to_string(),
            type_label: type_label.to_string(),
            partner_name: partner.to_string(),
            amount: amount.to_string(),
            currency: "HUF".to_string(),
            ..KhTransaction::default()
        }
    }

    fn food_rules() -> RuleSet {
        let mut rules = RuleSet::default();
        rules.categories.insert(
            "Food & Drink".to_string(),
            Category {
                subcategory: "Food".to_string(),
                keywords: vec!["aldi".to_string()],
                exact_matches: vec![],
            },
        );
        rules
    }

    // ── parse_amount_cents ────────────────────────────────────────────────────

    #[test]
    fn parse_amount_hungarian_format() {
        assert_eq!(parse_amount_cents("-12 345,67"), Some(-1234567));
        assert_eq!(parse_amount_cents("5 240,00"), Some(524000));
    }

    #[test]
    fn parse_amount_whole_number() {
        assert_eq!(parse_amount_cents("100"), Some(10000));
    }

    #[test]
    fn parse_amount_invalid() {
        assert_eq!(parse_amount_cents("not-a-number"), None);
        assert_eq!(parse_amount_cents(""), None);
    }

    // ── parse_date ────────────────────────────────────────────────────────────

    #[test]
    fn parse_date_without_time() {
        let dt = parse_date("2024.01.15").unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-01-15 00:00:00");
    }

    #[test]
    fn parse_date_with_time() {
        let dt = parse_date("2024.01.15 13:45:00").unwrap();
        assert_eq!(dt.format("%H:%M:%S").to_string(), "13:45:00");
    }

    #[test]
    fn parse_date_invalid() {
        assert!(parse_date("15/01/2024").is_none());
    }

    // ── conversion ────────────────────────────────────────────────────────────

    #[test]
    fn convert_categorizes_by_keyword() {
        let converter = Converter::new("K&H");
        let (converted, errors) =
            converter.convert(&[kh_tx("ALDI 241.SZ.", "Kártyás vásárlás", "-5 240,00")], &food_rules());
        assert!(errors.is_empty());
        assert_eq!(converted[0].category, "Food & Drink");
        assert_eq!(converted[0].subcategory, "Food");
        assert_eq!(converted[0].kind, TransactionKind::Expense);
        assert_eq!(converted[0].amount_cents, 524000);
    }

    #[test]
    fn convert_fee_type_falls_back() {
        let converter = Converter::new("K&H");
        let (converted, _) =
            converter.convert(&[kh_tx("Unknown Shop", "Számlavezetési díj", "-350,00")], &food_rules());
        assert_eq!(converted[0].category, "Finance & Insurance");
        assert_eq!(converted[0].subcategory, "Service Charge");
    }

    #[test]
    fn convert_default_subcategory_follows_sign() {
        let converter = Converter::new("K&H");
        let rules = RuleSet::default();
        let (converted, _) = converter.convert(
            &[
                kh_tx("Somewhere", "Purchase", "-100,00"),
                kh_tx("Someone", "Deposit", "100,00"),
            ],
            &rules,
        );
        assert_eq!(converted[0].category, "Miscellaneous");
        assert_eq!(converted[0].subcategory, "Other Expense");
        assert_eq!(converted[1].subcategory, "Other Income");
    }

    #[test]
    fn convert_collects_errors_and_continues() {
        let converter = Converter::new("K&H");
        let mut bad_date = kh_tx("SPAR", "Purchase", "-100,00");
        bad_date.date = "yesterday".to_string();
        let (converted, errors) = converter.convert(
            &[bad_date, kh_tx("SPAR", "Purchase", "-100,00")],
            &RuleSet::default(),
        );
        assert_eq!(converted.len(), 1);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("TX001"));
    }

    #[test]
    fn description_includes_partner_type_and_memo() {
        let mut tx = kh_tx("SPAR", "Kártyás vásárlás", "-100,00");
        tx.description = "weekly shop".to_string();
        assert_eq!(build_description(&tx), "SPAR - (Kártyás vásárlás) - weekly shop");
    }

    #[test]
    fn description_drops_memo_equal_to_partner() {
        let mut tx = kh_tx("SPAR", "Kártyás vásárlás", "-100,00");
        tx.description = "SPAR".to_string();
        assert_eq!(build_description(&tx), "SPAR - (Kártyás vásárlás)");
    }

    // ── csv output ────────────────────────────────────────────────────────────

    #[test]
    fn write_csv_full_row() {
        let converter = Converter::new("K&H");
        let (converted, _) =
            converter.convert(&[kh_tx("ALDI 241.SZ.", "Kártyás vásárlás", "-5 240,00")], &food_rules());

        let mut buf = Vec::new();
        write_csv(&mut buf, &converted).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let mut lines = output.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("Time,Timezone,Type,Category,Sub Category,Account"));

        let row = lines.next().unwrap();
        assert!(row.contains("2024-01-15 00:00:00"));
        assert!(row.contains("+01:00"));
        assert!(row.contains("Expense"));
        assert!(row.contains("Food & Drink"));
        assert!(row.contains("HUF"));
        assert!(row.contains("5240.00"));
    }
}
