// src/policy.rs
//! Policy assembly: turn a matched rule into a validated, resolved policy
//!
//! Resolution is a pure function of (config, path, extra context). Nothing
//! here touches a key backend or the clock, so resolving the same input
//! twice yields equal policies.

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::config::{self, relative_to_config_dir, ConfigFile, CreationRule};
use crate::destination::Destination;
use crate::enums::RuleKind;
use crate::error::{PolicyError, Result};
use crate::group::{key_groups_from_rule, KeyGroup};
use crate::keys::EncryptionContext;
use crate::rules::find_matching_rule;

/// Which document fields get encrypted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Selector {
    EncryptedSuffix(String),
    UnencryptedSuffix(String),
    EncryptedRegex(String),
    UnencryptedRegex(String),
    EncryptedCommentRegex(String),
    UnencryptedCommentRegex(String),
}

impl Selector {
    /// Config key this selector was read from
    pub fn field_name(&self) -> &'static str {
        match self {
            Selector::EncryptedSuffix(_) => "encrypted_suffix",
            Selector::UnencryptedSuffix(_) => "unencrypted_suffix",
            Selector::EncryptedRegex(_) => "encrypted_regex",
            Selector::UnencryptedRegex(_) => "unencrypted_regex",
            Selector::EncryptedCommentRegex(_) => "encrypted_comment_regex",
            Selector::UnencryptedCommentRegex(_) => "unencrypted_comment_regex",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Selector::EncryptedSuffix(v)
            | Selector::UnencryptedSuffix(v)
            | Selector::EncryptedRegex(v)
            | Selector::UnencryptedRegex(v)
            | Selector::EncryptedCommentRegex(v)
            | Selector::UnencryptedCommentRegex(v) => v,
        }
    }
}

/// The single selective-encryption selector of `rule`, if any.
///
/// Setting more than one of the six selector keys is an error.
pub fn selector_from_rule(rule: &CreationRule) -> Result<Option<Selector>> {
    let candidates: [(&'static str, &String, fn(String) -> Selector); 6] = [
        ("encrypted_suffix", &rule.encrypted_suffix, Selector::EncryptedSuffix),
        ("unencrypted_suffix", &rule.unencrypted_suffix, Selector::UnencryptedSuffix),
        ("encrypted_regex", &rule.encrypted_regex, Selector::EncryptedRegex),
        ("unencrypted_regex", &rule.unencrypted_regex, Selector::UnencryptedRegex),
        (
            "encrypted_comment_regex",
            &rule.encrypted_comment_regex,
            Selector::EncryptedCommentRegex,
        ),
        (
            "unencrypted_comment_regex",
            &rule.unencrypted_comment_regex,
            Selector::UnencryptedCommentRegex,
        ),
    ];
    let set: Vec<_> = candidates
        .into_iter()
        .filter(|(_, value, _)| !value.is_empty())
        .collect();

    if set.len() > 1 {
        return Err(PolicyError::ExclusiveOptionConflict {
            fields: set.iter().map(|(name, _, _)| *name).collect(),
        });
    }
    Ok(set.first().map(|(_, value, build)| build((*value).clone())))
}

/// Everything needed to encrypt (and optionally publish) one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    pub key_groups: Vec<KeyGroup>,
    pub shamir_threshold: usize,
    pub selector: Option<Selector>,
    pub mac_only_encrypted: bool,
    pub destination: Option<Destination>,
    pub omit_extensions: bool,
}

impl Policy {
    /// Validate `rule` and build its key groups.
    ///
    /// Selector exclusivity is checked before any key descriptor is
    /// instantiated.
    pub fn from_creation_rule(rule: &CreationRule, extra_context: &EncryptionContext) -> Result<Self> {
        let selector = selector_from_rule(rule)?;
        let key_groups = key_groups_from_rule(rule, extra_context)?;
        Ok(Self {
            key_groups,
            shamir_threshold: rule.shamir_threshold,
            selector,
            mac_only_encrypted: rule.mac_only_encrypted,
            destination: None,
            omit_extensions: false,
        })
    }

    /// Total number of keys across all groups
    pub fn key_count(&self) -> usize {
        self.key_groups.iter().map(Vec::len).sum()
    }
}

/// Creation policy for `file_path`.
///
/// `Ok(None)` means the document has no creation rules at all, which
/// callers treat as "not configured" rather than as a failure.
pub fn resolve_creation_policy(
    conf: &ConfigFile,
    config_path: &Path,
    file_path: &Path,
    extra_context: &EncryptionContext,
) -> Result<Option<Policy>> {
    let rules = match conf.creation_rules.as_deref() {
        Some(rules) if !rules.is_empty() => rules,
        _ => {
            debug!(config = %config_path.display(), "no creation rules configured");
            return Ok(None);
        }
    };
    let subject = relative_to_config_dir(config_path, file_path)?;
    let rule = find_matching_rule(rules, &subject, RuleKind::Creation)?;
    Policy::from_creation_rule(rule, extra_context).map(Some)
}

/// Destination policy for `file_path`: the matched rule's recreation rule
/// plus its publish target. Destination rules match the path as given.
pub fn resolve_destination_policy(
    conf: &ConfigFile,
    file_path: &Path,
    extra_context: &EncryptionContext,
) -> Result<Policy> {
    let subject = file_path.to_string_lossy();
    let rule = find_matching_rule(&conf.destination_rules, &subject, RuleKind::Destination)?;
    let destination = Destination::from_rule(rule)?;

    let mut policy = Policy::from_creation_rule(&rule.recreation_rule, extra_context)?;
    policy.destination = destination;
    policy.omit_extensions = rule.omit_extensions;
    Ok(policy)
}

pub fn resolve_creation_policy_from_bytes(
    config_bytes: &[u8],
    config_path: &Path,
    file_path: &Path,
    extra_context: &EncryptionContext,
) -> Result<Option<Policy>> {
    let conf = ConfigFile::parse(config_bytes)?;
    resolve_creation_policy(&conf, config_path, file_path, extra_context)
}

pub fn resolve_destination_policy_from_bytes(
    config_bytes: &[u8],
    file_path: &Path,
    extra_context: &EncryptionContext,
) -> Result<Policy> {
    let conf = ConfigFile::parse(config_bytes)?;
    resolve_destination_policy(&conf, file_path, extra_context)
}

/// Read the config at `config_path` and resolve the creation policy
pub fn load_creation_rule_for_file(
    config_path: &Path,
    file_path: &Path,
    extra_context: &EncryptionContext,
) -> Result<Option<Policy>> {
    let conf = config::load(config_path)?;
    resolve_creation_policy(&conf, config_path, file_path, extra_context)
}

/// Read the config at `config_path` and resolve the destination policy
pub fn load_destination_rule_for_file(
    config_path: &Path,
    file_path: &Path,
    extra_context: &EncryptionContext,
) -> Result<Policy> {
    let conf = config::load(config_path)?;
    resolve_destination_policy(&conf, file_path, extra_context)
}
