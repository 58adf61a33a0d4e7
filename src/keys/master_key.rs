// src/keys/master_key.rs
//! Provider handles, the live form of a key descriptor
//!
//! `MasterKey::from_descriptor` is the single dispatch point from
//! descriptor kind to backend type. Actual wrapping and unwrapping of data
//! keys is delegated to a caller-supplied `KeyService`; this crate never
//! talks to a backend itself.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::{Map, Value};
use secure_gate::RevealSecret;
use tracing::info;

use crate::aliases::DataKey;
use crate::consts::KEY_ROTATION_TTL_DAYS;
use crate::enums::KeyKind;
use crate::error::{BoxError, PolicyError, Result};
use crate::keys::age::AgeKey;
use crate::keys::azkv::AzureKvKey;
use crate::keys::gcpkms::GcpKmsKey;
use crate::keys::hcvault::HcVaultKey;
use crate::keys::kms::KmsKey;
use crate::keys::pgp::PgpKey;
use crate::keys::KeyDescriptor;

/// External backend boundary: performs the actual wrap / unwrap calls
pub trait KeyService {
    fn encrypt(&self, key: &MasterKey, data_key: &[u8]) -> std::result::Result<Vec<u8>, BoxError>;
    fn decrypt(&self, key: &MasterKey, ciphertext: &[u8]) -> std::result::Result<Vec<u8>, BoxError>;
}

/// Validated backend-specific key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    Kms(KmsKey),
    GcpKms(GcpKmsKey),
    AzureKv(AzureKvKey),
    HcVault(HcVaultKey),
    Pgp(PgpKey),
    Age(AgeKey),
}

impl KeySource {
    pub fn kind(&self) -> KeyKind {
        match self {
            KeySource::Kms(_) => KeyKind::Kms,
            KeySource::GcpKms(_) => KeyKind::GcpKms,
            KeySource::AzureKv(_) => KeyKind::AzureKv,
            KeySource::HcVault(_) => KeyKind::HcVault,
            KeySource::Pgp(_) => KeyKind::Pgp,
            KeySource::Age(_) => KeyKind::Age,
        }
    }
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Kms(k) => fmt::Display::fmt(k, f),
            KeySource::GcpKms(k) => fmt::Display::fmt(k, f),
            KeySource::AzureKv(k) => fmt::Display::fmt(k, f),
            KeySource::HcVault(k) => fmt::Display::fmt(k, f),
            KeySource::Pgp(k) => fmt::Display::fmt(k, f),
            KeySource::Age(k) => fmt::Display::fmt(k, f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterKey {
    source: KeySource,
    created_at: Option<DateTime<Utc>>,
    encrypted_key: Option<Vec<u8>>,
}

impl MasterKey {
    /// Validate a descriptor and build its provider handle
    pub fn from_descriptor(descriptor: &KeyDescriptor) -> Result<Self> {
        let source = match descriptor {
            KeyDescriptor::Kms {
                arn,
                role,
                context,
                profile,
            } => KeySource::Kms(KmsKey::new(arn, role, context, profile)?),
            KeyDescriptor::CloudKms { resource_id } => KeySource::GcpKms(GcpKmsKey::new(resource_id)?),
            KeyDescriptor::VaultKey {
                vault_url,
                key_name,
                key_version,
            } => KeySource::AzureKv(AzureKvKey::new(vault_url, key_name, key_version)?),
            KeyDescriptor::TransitUri { uri } => KeySource::HcVault(HcVaultKey::from_uri(uri)?),
            KeyDescriptor::Pgp { fingerprint } => KeySource::Pgp(PgpKey::new(fingerprint)?),
            KeyDescriptor::AgeRecipient { recipient } => KeySource::Age(AgeKey::new(recipient)?),
        };
        Ok(Self::from_source(source))
    }

    pub fn from_source(source: KeySource) -> Self {
        Self {
            source,
            created_at: None,
            encrypted_key: None,
        }
    }

    /// Restore the wrap date of a persisted key
    pub fn with_creation_date(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn kind(&self) -> KeyKind {
        self.source.kind()
    }

    pub fn source(&self) -> &KeySource {
        &self.source
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Dedup identity: backend tag plus canonical string
    pub fn identity(&self) -> (KeyKind, String) {
        (self.kind(), self.to_string())
    }

    pub fn encrypted_data_key(&self) -> Option<&[u8]> {
        self.encrypted_key.as_deref()
    }

    pub fn set_encrypted_data_key(&mut self, ciphertext: Vec<u8>) {
        self.encrypted_key = Some(ciphertext);
    }

    /// Wrap `data_key` with this key and remember the ciphertext
    pub fn encrypt(&mut self, data_key: &DataKey, service: &dyn KeyService) -> Result<()> {
        let ciphertext = service
            .encrypt(self, data_key.expose_secret())
            .map_err(|source| self.provider_error(source))?;
        self.encrypted_key = Some(ciphertext);
        self.created_at = Some(Utc::now());
        info!(backend = %self.kind(), key = %self, "Encryption succeeded");
        Ok(())
    }

    /// Wrap only when no ciphertext is held yet
    pub fn encrypt_if_needed(&mut self, data_key: &DataKey, service: &dyn KeyService) -> Result<()> {
        if self.encrypted_key.is_none() {
            return self.encrypt(data_key, service);
        }
        Ok(())
    }

    /// Unwrap the held ciphertext
    pub fn decrypt(&self, service: &dyn KeyService) -> Result<DataKey> {
        let ciphertext = self
            .encrypted_key
            .as_deref()
            .ok_or_else(|| PolicyError::MissingCiphertext {
                backend: self.kind(),
                key: self.to_string(),
            })?;
        let plaintext = service
            .decrypt(self, ciphertext)
            .map_err(|source| self.provider_error(source))?;
        info!(backend = %self.kind(), key = %self, "Decryption succeeded");
        Ok(DataKey::new(plaintext))
    }

    /// Whether the wrapped data key is old enough to be re-wrapped.
    /// age keys never expire; keys that were never wrapped have nothing to rotate.
    pub fn needs_rotation(&self) -> bool {
        if self.kind() == KeyKind::Age {
            return false;
        }
        self.created_at
            .map(|created| Utc::now().signed_duration_since(created) > Duration::days(KEY_ROTATION_TTL_DAYS))
            .unwrap_or(false)
    }

    /// Serializable form used when persisting key metadata
    pub fn to_map(&self) -> Map<String, Value> {
        let mut out = Map::new();
        match &self.source {
            KeySource::Kms(k) => k.write_map(&mut out),
            KeySource::GcpKms(k) => k.write_map(&mut out),
            KeySource::AzureKv(k) => k.write_map(&mut out),
            KeySource::HcVault(k) => k.write_map(&mut out),
            KeySource::Pgp(k) => k.write_map(&mut out),
            KeySource::Age(k) => k.write_map(&mut out),
        }
        if let Some(created) = self.created_at {
            out.insert(
                "created_at".into(),
                Value::String(created.to_rfc3339_opts(SecondsFormat::Secs, true)),
            );
        }
        if let Some(enc) = &self.encrypted_key {
            out.insert("enc".into(), Value::String(STANDARD.encode(enc)));
        }
        out
    }

    fn provider_error(&self, source: BoxError) -> PolicyError {
        PolicyError::Provider {
            backend: self.kind(),
            key: self.to_string(),
            source,
        }
    }
}

impl fmt::Display for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.source, f)
    }
}
