// src/keys/pgp.rs
//! PGP keys, identified by fingerprint

use std::fmt;

use serde_json::{Map, Value};

use crate::enums::KeyKind;
use crate::error::{PolicyError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgpKey {
    pub fingerprint: String,
}

impl PgpKey {
    pub fn new(fingerprint: &str) -> Result<Self> {
        let fingerprint: String = fingerprint.chars().filter(|c| *c != ' ').collect();
        if fingerprint.is_empty() {
            return Err(PolicyError::invalid_key(
                KeyKind::Pgp,
                fingerprint,
                "fingerprint is empty",
            ));
        }
        Ok(Self { fingerprint })
    }

    pub(crate) fn write_map(&self, out: &mut Map<String, Value>) {
        out.insert("fp".into(), Value::String(self.fingerprint.clone()));
    }
}

impl fmt::Display for PgpKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fingerprint)
    }
}
