pub mod categorize;
pub mod novelty;
pub mod redact;
pub mod rules;

pub use categorize::{categorize, Categorization, TypeFallback, TYPE_FALLBACKS};
pub use novelty::find_unknown;
pub use redact::{DetectionKind, Redaction, Redactor, TRANSFER_PHRASES};
pub use rules::{Category, ConfigError, RuleSet};
