use crate::rules::RuleSet;

/// Category assignment for a single transaction.
///
/// An empty subcategory means no rule decided one; the conversion layer
/// substitutes "Other Expense" or "Other Income" from the amount sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Categorization {
    pub category: String,
    pub subcategory: String,
}

/// A transaction-type fallback: if the lowercased type label contains one of
/// the phrases, the transaction gets the fixed category pair.
#[derive(Debug, Clone, Copy)]
pub struct TypeFallback {
    pub phrases: &'static [&'static str],
    pub category: &'static str,
    pub subcategory: &'static str,
}

/// Fallback table for K&H transaction-type labels, checked in order after the
/// partner-name rules. The phrases are domain knowledge, not algorithm: credit
/// and salary postings, loan repayment, cash handling, bank fees.
pub const TYPE_FALLBACKS: &[TypeFallback] = &[
    TypeFallback {
        phrases: &["jóváírás", "fizetés"],
        category: "Miscellaneous",
        subcategory: "Other Income",
    },
    TypeFallback {
        phrases: &["hitel törlesztés"],
        category: "Finance & Insurance",
        subcategory: "Interest Expense",
    },
    TypeFallback {
        phrases: &["készpénz"],
        category: "General Transfer",
        subcategory: "Deposits & Withdrawals",
    },
    TypeFallback {
        phrases: &["díj", "költség"],
        category: "Finance & Insurance",
        subcategory: "Service Charge",
    },
];

const DEFAULT_CATEGORY: &str = "Miscellaneous";

/// Assigns a category to a transaction. Total: always returns a result.
///
/// Priority: exact partner match, then keyword substring match, then the
/// transaction-type fallback table, then `("Miscellaneous", "")`. Within the
/// first two tiers rules are tried in lexicographic category order.
pub fn categorize(partner_name: &str, type_label: &str, rules: &RuleSet) -> Categorization {
    // Tier 1: exact match, case-sensitive.
    for (name, category) in &rules.categories {
        if category.exact_matches.iter().any(|m| m == partner_name) {
            return Categorization {
                category: name.clone(),
                subcategory: category.subcategory.clone(),
            };
        }
    }

    // Tier 2: keyword substring, case-insensitive. Keywords are already
    // lowercased at load time.
    let partner_lower = partner_name.to_lowercase();
    for (name, category) in &rules.categories {
        if category.keywords.iter().any(|k| partner_lower.contains(k.as_str())) {
            return Categorization {
                category: name.clone(),
                subcategory: category.subcategory.clone(),
            };
        }
    }

    // Tier 3: transaction-type fallback.
    let type_lower = type_label.to_lowercase();
    for fallback in TYPE_FALLBACKS {
        if fallback.phrases.iter().any(|p| type_lower.contains(p)) {
            return Categorization {
                category: fallback.category.to_string(),
                subcategory: fallback.subcategory.to_string(),
            };
        }
    }

    Categorization {
        category: DEFAULT_CATEGORY.to_string(),
        subcategory: String::new(),
    }
}
