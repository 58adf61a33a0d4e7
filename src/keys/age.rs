// src/keys/age.rs
//! age recipients: X25519, plugin and SSH public keys

use std::fmt;

use serde_json::{Map, Value};

use crate::enums::KeyKind;
use crate::error::{PolicyError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeKey {
    pub recipient: String,
}

impl AgeKey {
    /// Parse an X25519 (`age1...`), plugin (`age1<name>1...`) or SSH
    /// (`ssh-ed25519`, `ssh-rsa`) recipient
    pub fn new(recipient: &str) -> Result<Self> {
        let recipient = recipient.trim();
        let invalid = |reason: String| PolicyError::invalid_key(KeyKind::Age, recipient, reason);

        if recipient.starts_with("age1") && recipient.matches('1').count() > 1 {
            recipient.parse::<age::plugin::Recipient>().map_err(|e| {
                invalid(format!("failed to parse input as age key from age plugin: {e}"))
            })?;
        } else if recipient.starts_with("age1") {
            recipient.parse::<age::x25519::Recipient>().map_err(|e| {
                invalid(format!("failed to parse input as Bech32-encoded age public key: {e}"))
            })?;
        } else if recipient.starts_with("ssh-") {
            recipient.parse::<age::ssh::Recipient>().map_err(|e| {
                invalid(format!("failed to parse input as age-ssh public key: {e:?}"))
            })?;
        } else {
            return Err(invalid("unknown recipient type".to_owned()));
        }

        Ok(Self {
            recipient: recipient.to_owned(),
        })
    }

    pub(crate) fn write_map(&self, out: &mut Map<String, Value>) {
        out.insert("recipient".into(), Value::String(self.recipient.clone()));
    }
}

impl fmt::Display for AgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.recipient)
    }
}
