// src/keys/gcpkms.rs
//! GCP Cloud KMS keys, identified by their full resource id

use std::fmt;

use serde_json::{Map, Value};

use crate::enums::KeyKind;
use crate::error::{PolicyError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcpKmsKey {
    pub resource_id: String,
}

impl GcpKmsKey {
    pub fn new(resource_id: &str) -> Result<Self> {
        let resource_id: String = resource_id.chars().filter(|c| *c != ' ').collect();
        if resource_id.is_empty() {
            return Err(PolicyError::invalid_key(
                KeyKind::GcpKms,
                resource_id,
                "resource id is empty",
            ));
        }
        Ok(Self { resource_id })
    }

    pub(crate) fn write_map(&self, out: &mut Map<String, Value>) {
        out.insert("resource_id".into(), Value::String(self.resource_id.clone()));
    }
}

impl fmt::Display for GcpKmsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resource_id)
    }
}
