// src/keys/mod.rs
//! Key descriptors and the provider handles built from them
//!
//! A `KeyDescriptor` is the declarative, backend-tagged reference read
//! from the config document. `MasterKey::from_descriptor` validates it and
//! turns it into a provider handle that can wrap and unwrap data keys
//! through an external `KeyService`.

pub mod age;
pub mod azkv;
pub mod gcpkms;
pub mod hcvault;
pub mod kms;
pub mod master_key;
pub mod pgp;

pub use kms::{parse_kms_context, EncryptionContext};
pub use master_key::{KeyService, KeySource, MasterKey};

use crate::config::{AzureKvKeySpec, GcpKmsKeySpec, KmsKeySpec};
use crate::enums::KeyKind;
use crate::error::Result;

/// One key-provider reference, as written in the config document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyDescriptor {
    Kms {
        arn: String,
        role: String,
        context: EncryptionContext,
        profile: String,
    },
    CloudKms {
        resource_id: String,
    },
    VaultKey {
        vault_url: String,
        key_name: String,
        key_version: String,
    },
    TransitUri {
        uri: String,
    },
    Pgp {
        fingerprint: String,
    },
    AgeRecipient {
        recipient: String,
    },
}

impl KeyDescriptor {
    pub fn kind(&self) -> KeyKind {
        match self {
            KeyDescriptor::Kms { .. } => KeyKind::Kms,
            KeyDescriptor::CloudKms { .. } => KeyKind::GcpKms,
            KeyDescriptor::VaultKey { .. } => KeyKind::AzureKv,
            KeyDescriptor::TransitUri { .. } => KeyKind::HcVault,
            KeyDescriptor::Pgp { .. } => KeyKind::Pgp,
            KeyDescriptor::AgeRecipient { .. } => KeyKind::Age,
        }
    }

    /// Shorthand KMS entry, `arn` or `arn+role-arn`
    pub fn kms_from_arn(entry: &str, context: &EncryptionContext, profile: &str) -> Self {
        let (arn, role) = kms::split_arn_and_role(entry);
        KeyDescriptor::Kms {
            arn,
            role,
            context: context.clone(),
            profile: profile.to_owned(),
        }
    }

    /// Shorthand Azure entry, `https://<vault>/keys/<name>/<version>`
    pub fn vault_key_from_url(url: &str) -> Result<Self> {
        let (vault_url, key_name, key_version) = azkv::parse_key_url(url)?;
        Ok(KeyDescriptor::VaultKey {
            vault_url,
            key_name,
            key_version,
        })
    }

    pub fn pgp(fingerprint: &str) -> Self {
        KeyDescriptor::Pgp {
            fingerprint: fingerprint.to_owned(),
        }
    }

    pub fn cloud_kms(resource_id: &str) -> Self {
        KeyDescriptor::CloudKms {
            resource_id: resource_id.to_owned(),
        }
    }

    pub fn transit_uri(uri: &str) -> Self {
        KeyDescriptor::TransitUri {
            uri: uri.to_owned(),
        }
    }

    pub fn age(recipient: &str) -> Self {
        KeyDescriptor::AgeRecipient {
            recipient: recipient.to_owned(),
        }
    }
}

impl From<&KmsKeySpec> for KeyDescriptor {
    fn from(entry: &KmsKeySpec) -> Self {
        KeyDescriptor::Kms {
            arn: entry.arn.clone(),
            role: entry.role.clone(),
            context: entry.context.clone(),
            profile: entry.aws_profile.clone(),
        }
    }
}

impl From<&GcpKmsKeySpec> for KeyDescriptor {
    fn from(entry: &GcpKmsKeySpec) -> Self {
        KeyDescriptor::cloud_kms(&entry.resource_id)
    }
}

impl From<&AzureKvKeySpec> for KeyDescriptor {
    fn from(entry: &AzureKvKeySpec) -> Self {
        KeyDescriptor::VaultKey {
            vault_url: entry.vault_url.clone(),
            key_name: entry.key.clone(),
            key_version: entry.version.clone(),
        }
    }
}
