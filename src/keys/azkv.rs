// src/keys/azkv.rs
//! Azure Key Vault keys: vault URL, key name and (optional) version

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};
use url::Url;

use crate::enums::KeyKind;
use crate::error::{PolicyError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureKvKey {
    pub vault_url: String,
    pub name: String,
    pub version: String,
}

fn key_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(https://[^/]+)/keys/([^/]+)/([^/]+)$").expect("static regex is valid")
    })
}

/// Split `https://<vault>/keys/<name>/<version>` into its three parts
pub fn parse_key_url(url: &str) -> Result<(String, String, String)> {
    let url = url.trim();
    let caps = key_url_pattern().captures(url).ok_or_else(|| {
        PolicyError::invalid_key(
            KeyKind::AzureKv,
            url,
            "expected https://<vault>/keys/<name>/<version>",
        )
    })?;
    Ok((caps[1].to_owned(), caps[2].to_owned(), caps[3].to_owned()))
}

impl AzureKvKey {
    pub fn new(vault_url: &str, name: &str, version: &str) -> Result<Self> {
        let parsed = Url::parse(vault_url).map_err(|e| {
            PolicyError::invalid_key(KeyKind::AzureKv, vault_url, format!("invalid vault URL: {e}"))
        })?;
        if parsed.host_str().is_none() {
            return Err(PolicyError::invalid_key(
                KeyKind::AzureKv,
                vault_url,
                "vault URL has no host",
            ));
        }
        if name.is_empty() || name.contains('/') {
            return Err(PolicyError::invalid_key(
                KeyKind::AzureKv,
                name,
                "key name must be a single non-empty path segment",
            ));
        }
        Ok(Self {
            vault_url: vault_url.to_owned(),
            name: name.to_owned(),
            version: version.to_owned(),
        })
    }

    pub(crate) fn write_map(&self, out: &mut Map<String, Value>) {
        out.insert("vaultUrl".into(), Value::String(self.vault_url.clone()));
        out.insert("key".into(), Value::String(self.name.clone()));
        out.insert("version".into(), Value::String(self.version.clone()));
    }
}

impl fmt::Display for AzureKvKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/keys/{}/{}", self.vault_url, self.name, self.version)
    }
}
