use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Matching rules for a single category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Category {
    pub subcategory: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exact_matches: Vec<String>,
}

/// The categorization ruleset plus the roster of already-reviewed partners.
///
/// Categories live in a BTreeMap so rule iteration is lexicographic and
/// reproducible across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub known_partners: Vec<String>,
    #[serde(default)]
    pub categories: BTreeMap<String, Category>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("category '{category}' in {path} is missing a subcategory")]
    MissingSubcategory { path: String, category: String },
    #[error("failed to write config {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl RuleSet {
    /// Loads a ruleset from a TOML file.
    ///
    /// A missing file is not an error: conversion is expected to work out of
    /// the box with everything falling through to default categorization. A
    /// present but malformed file is fatal to the caller.
    pub fn load(path: &Path) -> Result<RuleSet, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!("config {} not found, using empty ruleset", path.display());
                return Ok(RuleSet::default());
            }
            Err(e) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };

        Self::from_toml(&content, &path.display().to_string())
    }

    pub fn from_toml(content: &str, path: &str) -> Result<RuleSet, ConfigError> {
        let mut rules: RuleSet = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            source: e,
        })?;

        for (name, category) in &mut rules.categories {
            if category.subcategory.trim().is_empty() {
                return Err(ConfigError::MissingSubcategory {
                    path: path.to_string(),
                    category: name.clone(),
                });
            }
            normalize_keywords(&mut category.keywords);
        }

        Ok(rules)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }

    pub fn is_known(&self, partner: &str) -> bool {
        self.known_partners.iter().any(|known| known == partner)
    }

    /// Adds a partner to the known roster. No-op if already present.
    pub fn add_known(&mut self, partner: &str) {
        if !self.is_known(partner) {
            self.known_partners.push(partner.to_string());
        }
    }
}

/// Keywords match case-insensitively, so they are stored lowercased.
/// Order is preserved; duplicates after lowercasing are dropped.
fn normalize_keywords(keywords: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    let mut normalized = Vec::with_capacity(keywords.len());
    for keyword in keywords.drain(..) {
        let lower = keyword.to_lowercase();
        if seen.insert(lower.clone()) {
            normalized.push(lower);
        }
    }
    *keywords = normalized;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_toml_basic() {
        let content = r#"
known_partners = ["SPAR", "ALDI"]

[categories."Food & Drink"]
subcategory = "Food"
keywords = ["aldi", "spar"]
exact_matches = ["ALDI 241.SZ."]
"#;
        let rules = RuleSet::from_toml(content, "test.toml").unwrap();
        assert_eq!(rules.known_partners, vec!["SPAR", "ALDI"]);
        let food = &rules.categories["Food & Drink"];
        assert_eq!(food.subcategory, "Food");
        assert_eq!(food.keywords, vec!["aldi", "spar"]);
        assert_eq!(food.exact_matches, vec!["ALDI 241.SZ."]);
    }

    #[test]
    fn from_toml_rejects_missing_subcategory() {
        let content = r#"
[categories."Transportation"]
subcategory = ""
keywords = ["mav"]
"#;
        let err = RuleSet::from_toml(content, "test.toml").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingSubcategory { ref category, .. } if category == "Transportation"
        ));
    }

    #[test]
    fn from_toml_rejects_malformed() {
        let err = RuleSet::from_toml("known_partners = not-a-list", "broken.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn keywords_lowercased_and_deduplicated() {
        let content = r#"
[categories."Food & Drink"]
subcategory = "Food"
keywords = ["Aldi", "SPAR", "aldi", "spar"]
"#;
        let rules = RuleSet::from_toml(content, "test.toml").unwrap();
        assert_eq!(rules.categories["Food & Drink"].keywords, vec!["aldi", "spar"]);
    }

    #[test]
    fn load_missing_file_yields_empty_ruleset() {
        let rules = RuleSet::load(Path::new("/nonexistent/categories.toml")).unwrap();
        assert!(rules.categories.is_empty());
        assert!(rules.known_partners.is_empty());
    }

    #[test]
    fn add_known_is_idempotent() {
        let mut rules = RuleSet::default();
        rules.add_known("SPAR");
        rules.add_known("SPAR");
        assert_eq!(rules.known_partners, vec!["SPAR"]);
        assert!(rules.is_known("SPAR"));
        assert!(!rules.is_known("spar"));
    }
}
