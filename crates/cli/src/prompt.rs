use std::fmt::Write;

use anyhow::Result;

use ezbook_core::{DetectionKind, Redaction, RuleSet};

/// Category names from the ezBookkeeping default set; the LLM is told to
/// prefer these over inventing new ones.
pub const AVAILABLE_CATEGORIES: &[&str] = &[
    "Food & Drink",
    "Clothing & Appearance",
    "Housing & Houseware",
    "Transportation",
    "Communication",
    "Entertainment",
    "Education & Studying",
    "Medical & Healthcare",
    "Gift & Social",
    "Finance & Insurance",
    "Miscellaneous",
];

/// Builds the copy-paste review prompt: current config, anonymized placeholder
/// groups with occurrence counts, then the plain business names in first-seen
/// order. Only redacted placeholders and business names appear; personal
/// originals never reach the output.
pub fn render(rules: &RuleSet, redactions: &[Redaction]) -> Result<String> {
    let owner_count = count_kind(redactions, DetectionKind::OwnerName);
    let transfer_count = count_kind(redactions, DetectionKind::TransferPartner);
    let account_count = count_kind(redactions, DetectionKind::AccountNumber);
    let businesses: Vec<&str> = redactions
        .iter()
        .filter(|r| !r.is_personal)
        .map(|r| r.original.as_str())
        .collect();

    let config_toml = toml::to_string_pretty(rules)?;

    let mut out = String::new();

    writeln!(out, "=== PROMPT FOR LLM ===")?;
    writeln!(out, "Copy the text below and paste it into ChatGPT/Gemini:")?;
    writeln!(out)?;
    writeln!(out, "---")?;
    writeln!(
        out,
        "I have a transaction categorization config in TOML format for my personal finance app."
    )?;
    writeln!(
        out,
        "I received new transactions that contain unknown merchants/partners."
    )?;
    writeln!(out)?;
    writeln!(out, "CURRENT CONFIG:")?;
    writeln!(out, "---")?;
    writeln!(out, "{}", config_toml.trim_end())?;
    writeln!(out, "---")?;
    writeln!(out)?;
    writeln!(out, "NEW UNCATEGORIZED MERCHANTS:")?;

    let mut index = 1;
    if owner_count > 0 {
        writeln!(
            out,
            "{index}. [OWNER_NAME] ({owner_count} occurrences) - Account owner's transfers, \
             suggested: Miscellaneous / Other Income or Other Expense"
        )?;
        index += 1;
    }
    if transfer_count > 0 {
        writeln!(
            out,
            "{index}. [TRANSFER_PARTNER] ({transfer_count} occurrences) - Personal transfers \
             detected, suggested: Miscellaneous / Other Income or Other Expense"
        )?;
        index += 1;
    }
    if account_count > 0 {
        writeln!(
            out,
            "{index}. [ACCOUNT_NUMBER] ({account_count} occurrences) - Bank account transfers, \
             suggested: General Transfer / Bank Transfer"
        )?;
        index += 1;
    }
    for business in &businesses {
        writeln!(out, "{index}. \"{business}\"")?;
        index += 1;
    }

    writeln!(out)?;
    writeln!(out, "INSTRUCTIONS:")?;
    writeln!(out, "1. Research each merchant to identify its business type; many Hungarian")?;
    writeln!(out, "   names contain the category directly (pékség = bakery, patika = pharmacy).")?;
    writeln!(out, "2. Add keywords to existing categories where they fit; only create a new")?;
    writeln!(out, "   category when nothing existing matches. For [OWNER_NAME],")?;
    writeln!(out, "   [TRANSFER_PARTNER] and [ACCOUNT_NUMBER] use the suggestions above.")?;
    writeln!(out, "3. Every category must keep a 'subcategory' field, and 'keywords' must be")?;
    writeln!(out, "   a plain TOML array of strings.")?;
    writeln!(out, "4. Reply with the COMPLETE updated config as valid TOML in a single code")?;
    writeln!(out, "   block: all existing categories, the new merchants appended to")?;
    writeln!(out, "   known_partners (placeholders included), and the new keywords.")?;
    writeln!(out)?;
    writeln!(
        out,
        "AVAILABLE CATEGORY NAMES (from ezBookkeeping defaults):"
    )?;
    writeln!(out, "{}", AVAILABLE_CATEGORIES.join(", "))?;
    writeln!(out, "---")?;
    writeln!(out)?;
    writeln!(out, "=== END OF PROMPT ===")?;
    writeln!(out)?;
    writeln!(
        out,
        "Found {} new merchants ({} anonymized for privacy).",
        redactions.len(),
        owner_count + transfer_count + account_count
    )?;
    writeln!(out)?;
    writeln!(out, "Next steps:")?;
    writeln!(out, "1. Paste the prompt into ChatGPT or Gemini.")?;
    writeln!(out, "2. Verify the returned TOML (keywords as plain arrays, subcategory present).")?;
    writeln!(out, "3. Save it over your config file and re-run the convert command.")?;

    Ok(out)
}

fn count_kind(redactions: &[Redaction], kind: DetectionKind) -> usize {
    redactions.iter().filter(|r| r.kind == kind).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ezbook_core::Redactor;

    fn redactions() -> Vec<Redaction> {
        let redactor = Redactor::new(Some("Vigh Daniel"));
        vec![
            redactor.classify("ALDI 241.SZ.", "Kártyás vásárlás"),
            redactor.classify("Kovacs Anna", "Átutalás"),
            redactor.classify("VIGH DANIEL", "Átutalás"),
            redactor.classify("HU93116000060000000012345676", "Átutalás"),
            redactor.classify("SPAR MAGYARORSZAG", "Kártyás vásárlás"),
            redactor.classify("Nagy Bela", "Azonnali átutalás"),
        ]
    }

    #[test]
    fn groups_counts_per_detection_kind() {
        let output = render(&RuleSet::default(), &redactions()).unwrap();
        assert!(output.contains("[OWNER_NAME] (1 occurrences)"));
        assert!(output.contains("[TRANSFER_PARTNER] (2 occurrences)"));
        assert!(output.contains("[ACCOUNT_NUMBER] (1 occurrences)"));
        assert!(output.contains("(4 anonymized for privacy)"));
    }

    #[test]
    fn businesses_listed_in_first_seen_order_after_placeholders() {
        let output = render(&RuleSet::default(), &redactions()).unwrap();
        // Three placeholder sections, then businesses from index 4.
        assert!(output.contains("4. \"ALDI 241.SZ.\""));
        assert!(output.contains("5. \"SPAR MAGYARORSZAG\""));
    }

    #[test]
    fn personal_names_never_appear_verbatim() {
        let output = render(&RuleSet::default(), &redactions()).unwrap();
        assert!(!output.contains("Kovacs Anna"));
        assert!(!output.contains("VIGH DANIEL"));
        assert!(!output.contains("HU93116000060000000012345676"));
    }

    #[test]
    fn placeholder_sections_omitted_when_empty() {
        let redactor = Redactor::new(None);
        let only_business = vec![redactor.classify("ALDI", "Vásárlás")];
        let output = render(&RuleSet::default(), &only_business).unwrap();
        assert!(!output.contains("[OWNER_NAME]"));
        assert!(!output.contains("[TRANSFER_PARTNER]"));
        assert!(!output.contains("[ACCOUNT_NUMBER]"));
        assert!(output.contains("1. \"ALDI\""));
    }

    #[test]
    fn embeds_current_config() {
        let mut rules = RuleSet::default();
        rules.add_known("SPAR");
        let output = render(&rules, &[]).unwrap();
        assert!(output.contains("known_partners"));
        assert!(output.contains("SPAR"));
    }
}
