// tests/keys/provider.rs
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{Duration, Utc};
use sops_policy::{DataKey, EncryptionContext, KeyDescriptor, KeyKind, MasterKey, PolicyError};
use secure_gate::RevealSecret;

use crate::support::{MockKeyService, OfflineKeyService, AGE_RECIPIENT};

fn pgp_key() -> MasterKey {
    MasterKey::from_descriptor(&KeyDescriptor::pgp("FBC7B9E2A4F9289AC0C1D4843D16CEE4A27381B4")).unwrap()
}

#[test]
fn encrypt_then_decrypt_returns_the_data_key() {
    crate::common::setup();

    let mut key = pgp_key();
    let data_key = DataKey::new(vec![1, 2, 3, 4]);

    key.encrypt(&data_key, &MockKeyService).unwrap();
    assert_eq!(key.encrypted_data_key(), Some(&[4u8, 3, 2, 1, 0xA5][..]));
    assert!(key.created_at().is_some());

    let recovered = key.decrypt(&MockKeyService).unwrap();
    assert_eq!(recovered.expose_secret(), &vec![1, 2, 3, 4]);
}

#[test]
fn decrypt_without_ciphertext_fails() {
    let key = pgp_key();
    let err = key.decrypt(&MockKeyService).unwrap_err();
    assert!(matches!(
        err,
        PolicyError::MissingCiphertext {
            backend: KeyKind::Pgp,
            ..
        }
    ));
}

#[test]
fn backend_errors_pass_through_with_key_identity() {
    let mut key = pgp_key();
    let err = key
        .encrypt(&DataKey::new(vec![9; 32]), &OfflineKeyService)
        .unwrap_err();
    match &err {
        PolicyError::Provider { backend, key: id, source } => {
            assert_eq!(*backend, KeyKind::Pgp);
            assert_eq!(id, "FBC7B9E2A4F9289AC0C1D4843D16CEE4A27381B4");
            assert_eq!(source.to_string(), "backend offline");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(key.encrypted_data_key().is_none());
    assert!(key.created_at().is_none());
}

#[test]
fn foreign_ciphertext_is_a_provider_error() {
    let mut key = pgp_key();
    key.set_encrypted_data_key(vec![0, 1, 2]);
    assert!(matches!(
        key.decrypt(&MockKeyService),
        Err(PolicyError::Provider { .. })
    ));
}

#[test]
fn encrypt_if_needed_keeps_existing_ciphertext() {
    let mut key = pgp_key();
    key.set_encrypted_data_key(vec![7, 7, 7]);
    key.encrypt_if_needed(&DataKey::new(vec![1]), &OfflineKeyService)
        .unwrap();
    assert_eq!(key.encrypted_data_key(), Some(&[7u8, 7, 7][..]));

    let mut fresh = pgp_key();
    fresh
        .encrypt_if_needed(&DataKey::new(vec![1]), &MockKeyService)
        .unwrap();
    assert!(fresh.encrypted_data_key().is_some());
}

#[test]
fn rotation_after_six_months() {
    let never_wrapped = pgp_key();
    assert!(!never_wrapped.needs_rotation());

    let recent = pgp_key().with_creation_date(Utc::now() - Duration::days(30));
    assert!(!recent.needs_rotation());

    let stale = pgp_key().with_creation_date(Utc::now() - Duration::days(181));
    assert!(stale.needs_rotation());

    let kms = MasterKey::from_descriptor(&KeyDescriptor::kms_from_arn(
        "arn",
        &EncryptionContext::new(),
        "",
    ))
    .unwrap()
    .with_creation_date(Utc::now() - Duration::days(365));
    assert!(kms.needs_rotation());
}

#[test]
fn age_keys_never_need_rotation() {
    let age = MasterKey::from_descriptor(&KeyDescriptor::age(AGE_RECIPIENT))
        .unwrap()
        .with_creation_date(Utc::now() - Duration::days(3650));
    assert!(!age.needs_rotation());
}

#[test]
fn persistence_map_includes_wrap_state() {
    let mut key = pgp_key();
    assert!(!key.to_map().contains_key("enc"));
    assert!(!key.to_map().contains_key("created_at"));

    key.encrypt(&DataKey::new(vec![1, 2]), &MockKeyService).unwrap();
    let map = key.to_map();
    assert_eq!(map["fp"], "FBC7B9E2A4F9289AC0C1D4843D16CEE4A27381B4");
    assert_eq!(map["enc"], STANDARD.encode([2u8, 1, 0xA5]));
    assert!(map["created_at"].as_str().unwrap().ends_with('Z'));
}
