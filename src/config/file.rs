// src/config/file.rs
//! On-disk schema of the `.sops.yaml` document
//!
//! These structs mirror the YAML keys one-to-one. They carry no behaviour
//! beyond parsing; matching and assembly live in `rules`, `group` and
//! `policy`.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::config::defaults::StoresConfig;
use crate::error::Result;

/// Whole configuration document
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// `None` when the key is absent or null, the "not configured" case
    pub creation_rules: Option<Vec<CreationRule>>,
    pub destination_rules: Vec<DestinationRule>,
    pub stores: StoresConfig,
}

impl ConfigFile {
    /// Parse a YAML document; an empty or null document yields the default
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_slice(bytes)?;
        if value.is_null() {
            return Ok(ConfigFile::default());
        }
        Ok(serde_yaml::from_value(value)?)
    }
}

/// A flat shorthand field: `"a,b,c"` or `[a, b, c]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StringList {
    Joined(String),
    List(Vec<String>),
}

impl StringList {
    /// Individual entries, trimmed, with empty ones dropped
    pub fn entries(&self) -> Vec<&str> {
        match self {
            StringList::Joined(s) => split_entries([s.as_str()]).collect(),
            StringList::List(items) => split_entries(items.iter().map(String::as_str)).collect(),
        }
    }
}

/// Comma-split, trimmed, non-empty entries of every item
pub(crate) fn split_entries<'a, I>(items: I) -> impl Iterator<Item = &'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    items
        .into_iter()
        .flat_map(|item| item.split(','))
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}

/// Flat entries of an optional shorthand field
pub(crate) fn shorthand_entries(field: &Option<StringList>) -> Vec<&str> {
    field.as_ref().map(StringList::entries).unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CreationRule {
    pub path_regex: String,
    /// Deprecated predecessor of `path_regex`
    pub filename_regex: String,

    pub kms: Option<StringList>,
    pub aws_profile: String,
    pub age: Option<StringList>,
    pub pgp: Option<StringList>,
    pub gcp_kms: Option<StringList>,
    pub azure_keyvault: Option<StringList>,
    pub hc_vault_transit_uri: Option<StringList>,

    pub key_groups: Vec<KeyGroupSpec>,
    pub shamir_threshold: usize,

    pub unencrypted_suffix: String,
    pub encrypted_suffix: String,
    pub unencrypted_regex: String,
    pub encrypted_regex: String,
    pub unencrypted_comment_regex: String,
    pub encrypted_comment_regex: String,
    pub mac_only_encrypted: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DestinationRule {
    pub path_regex: String,

    pub s3_bucket: String,
    pub s3_prefix: String,
    pub gcs_bucket: String,
    pub gcs_prefix: String,

    pub vault_path: String,
    pub vault_address: String,
    pub vault_kv_mount_name: String,
    /// Anything other than 1 selects KV v2
    pub vault_kv_version: i64,

    pub aws_region: String,
    pub aws_secrets_manager_secret_name: String,
    pub aws_parameter_store_path: String,
    pub aws_parameter_store_type: String,

    pub recreation_rule: CreationRule,
    pub omit_extensions: bool,
}

/// One entry of `key_groups`, possibly nesting further groups under `merge`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct KeyGroupSpec {
    pub merge: Vec<KeyGroupSpec>,
    pub kms: Vec<KmsKeySpec>,
    pub gcp_kms: Vec<GcpKmsKeySpec>,
    pub azure_keyvault: Vec<AzureKvKeySpec>,
    pub hc_vault: Vec<String>,
    pub age: Vec<String>,
    pub pgp: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KmsKeySpec {
    pub arn: String,
    pub role: String,
    pub context: BTreeMap<String, String>,
    pub aws_profile: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GcpKmsKeySpec {
    pub resource_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AzureKvKeySpec {
    #[serde(rename = "vaultUrl")]
    pub vault_url: String,
    pub key: String,
    pub version: String,
}
