// src/lib.rs
//! sops-policy: resolve `.sops.yaml` rules into encryption policies
//!
//! Features:
//! - First-match creation and destination rules
//! - Nested key-group merge with duplicate removal
//! - KMS, GCP KMS, Azure Key Vault, Vault transit, PGP and age descriptors
//! - S3, GCS, Vault KV and AWS publish destinations

pub mod aliases;
pub mod config;
pub mod consts;
pub mod destination;
pub mod enums;
pub mod error;
pub mod export;
pub mod group;
pub mod keys;
pub mod policy;
pub mod rules;

// Re-export everything users need at the crate root
pub use aliases::DataKey;
pub use config::load as load_config;
pub use config::{find_config_file, load_stores_config, ConfigFile, FileSystem, OsFileSystem};
pub use destination::Destination;
pub use enums::{KeyKind, RuleKind};
pub use error::{PolicyError, Result};
pub use export::policy_to_json;
pub use group::{deduplicate, resolve_key_group, KeyGroup};
pub use keys::{parse_kms_context, EncryptionContext, KeyDescriptor, KeyService, MasterKey};
pub use policy::{
    load_creation_rule_for_file, load_destination_rule_for_file, resolve_creation_policy,
    resolve_creation_policy_from_bytes, resolve_destination_policy,
    resolve_destination_policy_from_bytes, Policy, Selector,
};
