use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};

use ezbook_core::{find_unknown, Redactor, RuleSet};
use ezbook_import::{parse_export, write_csv, Converter};

use crate::prompt;

pub fn convert(
    input: &Path,
    output: &Path,
    account_name: &str,
    config: Option<&Path>,
) -> Result<()> {
    let rules = load_rules(config)?;

    let input_file =
        File::open(input).with_context(|| format!("failed to open input file {}", input.display()))?;
    let transactions = parse_export(input_file)
        .with_context(|| format!("failed to parse K&H export {}", input.display()))?;

    tracing::info!("parsed {} transactions from K&H export", transactions.len());

    let converter = Converter::new(account_name);
    let (converted, errors) = converter.convert(&transactions, &rules);

    for error in &errors {
        tracing::warn!("skipped: {error}");
    }

    let output_file = File::create(output)
        .with_context(|| format!("failed to create output file {}", output.display()))?;
    write_csv(output_file, &converted)
        .with_context(|| format!("failed to write CSV {}", output.display()))?;

    tracing::info!(
        "converted {} transactions ({} failed), output written to {}",
        converted.len(),
        errors.len(),
        output.display()
    );

    Ok(())
}

pub fn update_config(input: &Path, config: &Path, owner_name: Option<&str>) -> Result<()> {
    let rules = load_rules(Some(config))?;

    let input_file =
        File::open(input).with_context(|| format!("failed to open input file {}", input.display()))?;
    let transactions = parse_export(input_file)
        .with_context(|| format!("failed to parse K&H export {}", input.display()))?;

    // Pair every partner with the type label of its first occurrence; the
    // redaction heuristic keys off the type.
    let partners: Vec<(&str, &str)> = transactions
        .iter()
        .filter(|tx| !tx.partner_name.is_empty())
        .map(|tx| (tx.partner_name.as_str(), tx.type_label.as_str()))
        .collect();

    let unknown = find_unknown(partners.iter().map(|(name, _)| *name), &rules);

    if unknown.is_empty() {
        println!("All partners are already on the known list, nothing to categorize.");
        return Ok(());
    }

    let redactor = Redactor::new(owner_name);
    let redactions: Vec<_> = unknown
        .iter()
        .map(|name| {
            let type_label = partners
                .iter()
                .find(|(partner, _)| *partner == name.as_str())
                .map(|(_, type_label)| *type_label)
                .unwrap_or_default();
            redactor.classify(name, type_label)
        })
        .collect();

    let personal: Vec<_> = redactions.iter().filter(|r| r.is_personal).collect();
    if !personal.is_empty() {
        println!("{} personal data item(s) will be anonymized:", personal.len());
        for redaction in &personal {
            println!(
                "  - \"{}\" -> {} ({})",
                redaction.original, redaction.redacted, redaction.kind
            );
        }
        println!();
    }

    let prompt = prompt::render(&rules, &redactions)?;
    println!("{prompt}");

    Ok(())
}

fn load_rules(config: Option<&Path>) -> Result<RuleSet> {
    match config {
        Some(path) => RuleSet::load(path).context("failed to load config"),
        None => Ok(RuleSet::default()),
    }
}
