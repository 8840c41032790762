use std::collections::HashSet;

use crate::rules::RuleSet;

/// Returns partner names not yet on the known roster, in first-seen order.
/// Names are trimmed, blanks skipped, duplicates dropped. The ruleset is not
/// modified; promoting a name to the roster is the review workflow's job.
pub fn find_unknown<'a, I>(partner_names: I, rules: &RuleSet) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut unknown = Vec::new();

    for name in partner_names {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !seen.insert(trimmed.to_string()) {
            continue;
        }
        if rules.is_known(trimmed) {
            continue;
        }
        unknown.push(trimmed.to_string());
    }

    unknown
}
