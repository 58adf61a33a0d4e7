// src/keys/kms.rs
//! AWS KMS keys: ARN, optional IAM role, encryption context and profile

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};
use tracing::warn;

use crate::consts::KMS_ROLE_SEPARATOR;
use crate::enums::KeyKind;
use crate::error::{PolicyError, Result};

/// KMS encryption context; ordered so canonical strings are stable
pub type EncryptionContext = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmsKey {
    pub arn: String,
    pub role: String,
    pub context: EncryptionContext,
    pub aws_profile: String,
}

impl KmsKey {
    pub fn new(
        arn: &str,
        role: &str,
        context: &EncryptionContext,
        aws_profile: &str,
    ) -> Result<Self> {
        if arn.is_empty() {
            return Err(PolicyError::invalid_key(KeyKind::Kms, arn, "ARN is empty"));
        }
        Ok(Self {
            arn: arn.to_owned(),
            role: role.to_owned(),
            context: context.clone(),
            aws_profile: aws_profile.to_owned(),
        })
    }

    pub(crate) fn write_map(&self, out: &mut Map<String, Value>) {
        out.insert("arn".into(), Value::String(self.arn.clone()));
        if !self.role.is_empty() {
            out.insert("role".into(), Value::String(self.role.clone()));
        }
        if !self.context.is_empty() {
            let context = self
                .context
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            out.insert("context".into(), Value::Object(context));
        }
        if !self.aws_profile.is_empty() {
            out.insert("aws_profile".into(), Value::String(self.aws_profile.clone()));
        }
    }
}

impl fmt::Display for KmsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.arn)?;
        if !self.role.is_empty() {
            write!(f, "+{}", self.role)?;
        }
        if self.context.is_empty() && self.aws_profile.is_empty() {
            return Ok(());
        }
        let context: Vec<String> = self.context.iter().map(|(k, v)| format!("{k}:{v}")).collect();
        write!(f, "|{}", context.join(","))?;
        if !self.aws_profile.is_empty() {
            write!(f, "|{}", self.aws_profile)?;
        }
        Ok(())
    }
}

/// Split a shorthand entry (`arn` or `arn+arn:aws:iam::...`) into ARN and role.
/// Whitespace anywhere in the entry is dropped.
pub fn split_arn_and_role(entry: &str) -> (String, String) {
    let arn: String = entry.chars().filter(|c| *c != ' ').collect();
    match arn.find(KMS_ROLE_SEPARATOR) {
        Some(idx) if idx > 0 => (arn[..idx].to_owned(), arn[idx + 1..].to_owned()),
        _ => (arn, String::new()),
    }
}

/// Parse `k1:v1,k2:v2` into an encryption context.
///
/// Returns `None` for empty input, or (with a warning) when any pair is
/// malformed; a partial context is never used.
pub fn parse_kms_context(input: &str) -> Option<EncryptionContext> {
    if input.is_empty() {
        return None;
    }
    let mut out = EncryptionContext::new();
    for pair in input.split(',') {
        let kv: Vec<&str> = pair.split(':').collect();
        if kv.len() != 2 {
            warn!(pair, "invalid encryption context entry, expected key:value; context will not be used");
            return None;
        }
        out.insert(kv[0].to_owned(), kv[1].to_owned());
    }
    Some(out)
}
