// src/keys/hcvault.rs
//! HashiCorp Vault transit keys, parsed from their full URI

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};
use url::Url;

use crate::enums::KeyKind;
use crate::error::{PolicyError, Result};

const EXAMPLE_URI: &str = "https://vault.example.com:8200/v1/transit/keys/keyName";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HcVaultKey {
    pub address: String,
    pub engine_path: String,
    pub key_name: String,
}

fn prefixed_path_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"/[^/]+/v\d+/[^/]+/[^/]+/[^/]+").expect("static regex is valid"))
}

fn transit_path_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"/v\d+/[^/]+/[^/]+/[^/]+").expect("static regex is valid"))
}

impl HcVaultKey {
    /// Parse `scheme://host[:port]/v1/<engine>/keys/<name>`
    pub fn from_uri(uri: &str) -> Result<Self> {
        let uri = uri.trim();
        let invalid = |reason: String| PolicyError::invalid_key(KeyKind::HcVault, uri, reason);

        let parsed = Url::parse(uri).map_err(|e| {
            invalid(format!("not an absolute URI ({e}), should look like {EXAMPLE_URI}"))
        })?;
        let address = match (parsed.host_str(), address_as_written(uri)) {
            (Some(_), Some(address)) => address.to_owned(),
            _ => return Err(invalid(format!("missing host, should look like {EXAMPLE_URI}"))),
        };

        let (engine_path, key_name) = engine_and_key_from_path(parsed.path())
            .map_err(|reason| invalid(reason.to_owned()))?;

        Ok(Self {
            address,
            engine_path,
            key_name,
        })
    }

    pub(crate) fn write_map(&self, out: &mut Map<String, Value>) {
        out.insert("vault_address".into(), Value::String(self.address.clone()));
        out.insert("engine_path".into(), Value::String(self.engine_path.clone()));
        out.insert("key_name".into(), Value::String(self.key_name.clone()));
    }
}

/// `scheme://authority` of `uri`, byte for byte; hosts and default ports are
/// not normalized
fn address_as_written(uri: &str) -> Option<&str> {
    let authority_start = uri.find("://")? + 3;
    let end = uri[authority_start..]
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .map_or(uri.len(), |i| authority_start + i);
    Some(&uri[..end])
}

fn engine_and_key_from_path(full_path: &str) -> std::result::Result<(String, String), &'static str> {
    // Reverse proxies with a path prefix are not supported by the Vault client
    if prefixed_path_pattern().is_match(full_path) {
        return Err("running Vault with a prefixed URL is not supported");
    }
    if !transit_path_pattern().is_match(full_path) {
        return Err("vault path does not seem to be formatted correctly");
    }

    let dirs: Vec<&str> = full_path.trim_matches('/').split('/').collect();
    let key_name = dirs[dirs.len() - 1].to_owned();
    let engine_path = dirs[1..dirs.len() - 2].join("/");
    Ok((engine_path, key_name))
}

impl fmt::Display for HcVaultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/v1/{}/keys/{}", self.address, self.engine_path, self.key_name)
    }
}
