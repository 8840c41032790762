use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// IBAN shape: two country letters followed by 10 to 34 digits, full match.
static ACCOUNT_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}[0-9]{10,34}$").expect("valid IBAN pattern"));

/// Transaction-type phrases that mark person-to-person transfers or credits.
/// Counterparties on these are treated as private individuals even without
/// positive PII detection: over-redaction beats leaking a name into text that
/// gets pasted into a third-party assistant.
pub const TRANSFER_PHRASES: &[&str] = &["átutalás", "átvezetés", "jóváírás"];

pub const ACCOUNT_NUMBER_PLACEHOLDER: &str = "[ACCOUNT_NUMBER]";
pub const OWNER_NAME_PLACEHOLDER: &str = "[OWNER_NAME]";
pub const TRANSFER_PARTNER_PLACEHOLDER: &str = "[TRANSFER_PARTNER]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionKind {
    AccountNumber,
    OwnerName,
    TransferPartner,
    None,
}

impl fmt::Display for DetectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionKind::AccountNumber => write!(f, "account_number"),
            DetectionKind::OwnerName => write!(f, "owner_name"),
            DetectionKind::TransferPartner => write!(f, "transfer_partner"),
            DetectionKind::None => write!(f, "none"),
        }
    }
}

/// Outcome of classifying a single partner name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redaction {
    pub original: String,
    pub redacted: String,
    pub is_personal: bool,
    pub kind: DetectionKind,
}

impl Redaction {
    fn personal(original: &str, placeholder: &str, kind: DetectionKind) -> Self {
        Redaction {
            original: original.to_string(),
            redacted: placeholder.to_string(),
            is_personal: true,
            kind,
        }
    }

    fn passthrough(original: &str) -> Self {
        Redaction {
            original: original.to_string(),
            redacted: original.to_string(),
            is_personal: false,
            kind: DetectionKind::None,
        }
    }
}

/// Decides whether a partner name is personal data and must not be shown
/// verbatim. Pure pattern matching, no network, no external services.
#[derive(Debug, Clone, Default)]
pub struct Redactor {
    owner_name: Option<String>,
}

impl Redactor {
    pub fn new(owner_name: Option<&str>) -> Self {
        let owner_name = owner_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        Redactor { owner_name }
    }

    /// Classifies one partner name. Total: every input yields a result.
    ///
    /// Checks in order: blank name, account-number shape, the account owner's
    /// own name (case-insensitive), then the transfer-phrase heuristic on the
    /// transaction-type label. Anything else is assumed to be a merchant.
    pub fn classify(&self, partner_name: &str, type_label: &str) -> Redaction {
        let trimmed = partner_name.trim();

        if trimmed.is_empty() {
            return Redaction::passthrough(partner_name);
        }

        if ACCOUNT_NUMBER_RE.is_match(trimmed) {
            return Redaction::personal(
                partner_name,
                ACCOUNT_NUMBER_PLACEHOLDER,
                DetectionKind::AccountNumber,
            );
        }

        if let Some(owner) = &self.owner_name {
            if trimmed.to_lowercase() == owner.to_lowercase() {
                return Redaction::personal(
                    partner_name,
                    OWNER_NAME_PLACEHOLDER,
                    DetectionKind::OwnerName,
                );
            }
        }

        let type_lower = type_label.to_lowercase();
        if TRANSFER_PHRASES.iter().any(|p| type_lower.contains(p)) {
            return Redaction::personal(
                partner_name,
                TRANSFER_PARTNER_PLACEHOLDER,
                DetectionKind::TransferPartner,
            );
        }

        Redaction::passthrough(partner_name)
    }

    /// Classifies a batch of names paired with their transaction-type labels.
    pub fn classify_all(&self, partners: &[(String, String)]) -> Vec<Redaction> {
        partners
            .iter()
            .map(|(name, type_label)| self.classify(name, type_label))
            .collect()
    }
}
