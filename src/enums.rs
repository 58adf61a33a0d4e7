// src/enums.rs
//! Public enum types used throughout the crate
//!
//! Central location for the small tag enums that show up in errors,
//! logs and serialized output: key backends and rule families.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Key-provider backend a descriptor or provider handle belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
    Kms,
    GcpKms,
    AzureKv,
    HcVault,
    Pgp,
    Age,
}

impl KeyKind {
    /// Stable identifier, also used as the type half of the dedup identity
    pub fn identifier(self) -> &'static str {
        match self {
            KeyKind::Kms => "kms",
            KeyKind::GcpKms => "gcp_kms",
            KeyKind::AzureKv => "azure_kv",
            KeyKind::HcVault => "hc_vault",
            KeyKind::Pgp => "pgp",
            KeyKind::Age => "age",
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Which rule list a lookup ran against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Creation,
    Destination,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Creation => f.write_str("creation"),
            RuleKind::Destination => f.write_str("destination"),
        }
    }
}
