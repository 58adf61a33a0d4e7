// src/rules.rs
//! First-match rule selection shared by creation and destination rules
//!
//! Rules are tried in document order. An empty pattern matches anything,
//! so a catch-all placed early shadows every rule after it.

use regex::Regex;
use tracing::{debug, warn};

use crate::config::{CreationRule, DestinationRule};
use crate::enums::RuleKind;
use crate::error::{PolicyError, Result};

/// Anything selectable by a path pattern
pub trait PathRule {
    /// Regex source; empty means "match everything"
    fn path_pattern(&self) -> &str;
}

impl PathRule for CreationRule {
    fn path_pattern(&self) -> &str {
        if self.filename_regex.is_empty() {
            return &self.path_regex;
        }
        if self.path_regex.is_empty() {
            warn!(
                filename_regex = %self.filename_regex,
                "filename_regex is deprecated, use path_regex instead"
            );
            return &self.filename_regex;
        }
        warn!(
            path_regex = %self.path_regex,
            filename_regex = %self.filename_regex,
            "both path_regex and filename_regex are set; ignoring deprecated filename_regex"
        );
        &self.path_regex
    }
}

impl PathRule for DestinationRule {
    fn path_pattern(&self) -> &str {
        &self.path_regex
    }
}

/// Return the first rule whose pattern is empty or matches `subject`
pub fn find_matching_rule<'a, R: PathRule>(
    rules: &'a [R],
    subject: &str,
    kind: RuleKind,
) -> Result<&'a R> {
    for (index, rule) in rules.iter().enumerate() {
        let pattern = rule.path_pattern();
        if pattern.is_empty() {
            debug!(%kind, index, subject, "selected catch-all rule");
            return Ok(rule);
        }
        let re = Regex::new(pattern).map_err(|source| PolicyError::RegexCompile {
            pattern: pattern.to_owned(),
            source,
        })?;
        if re.is_match(subject) {
            debug!(%kind, index, pattern, subject, "selected rule");
            return Ok(rule);
        }
    }
    Err(PolicyError::NoMatchingRule {
        kind,
        path: subject.to_owned(),
    })
}
