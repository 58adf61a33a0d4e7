// tests/keys/descriptor.rs
use serde_json::json;
use sops_policy::keys::hcvault::HcVaultKey;
use sops_policy::keys::KeySource;
use sops_policy::{parse_kms_context, EncryptionContext, KeyDescriptor, KeyKind, MasterKey, PolicyError};

use crate::support::{AGE_RECIPIENT, SSH_RECIPIENT};

fn build(descriptor: KeyDescriptor) -> MasterKey {
    MasterKey::from_descriptor(&descriptor).expect("descriptor is valid")
}

fn rejected(descriptor: KeyDescriptor) -> PolicyError {
    MasterKey::from_descriptor(&descriptor).expect_err("descriptor must be rejected")
}

#[test]
fn descriptor_kind_matches_handle_kind() {
    let descriptors = [
        KeyDescriptor::kms_from_arn("arn", &EncryptionContext::new(), ""),
        KeyDescriptor::cloud_kms("projects/p/locations/l/keyRings/r/cryptoKeys/k"),
        KeyDescriptor::vault_key_from_url("https://v.vault.azure.net/keys/k/1").unwrap(),
        KeyDescriptor::transit_uri("https://vault:8200/v1/transit/keys/k"),
        KeyDescriptor::pgp("FBC7B9E2A4F9289AC0C1D4843D16CEE4A27381B4"),
        KeyDescriptor::age(AGE_RECIPIENT),
    ];
    for descriptor in descriptors {
        assert_eq!(build(descriptor.clone()).kind(), descriptor.kind());
    }
}

#[test]
fn kms_canonical_strings() {
    let ctx: EncryptionContext = [("baz".to_string(), "bam".to_string())].into();
    let empty = EncryptionContext::new();

    let cases = [
        (KeyDescriptor::kms_from_arn("foo", &empty, ""), "foo"),
        (KeyDescriptor::kms_from_arn("foo", &empty, "bar"), "foo||bar"),
        (KeyDescriptor::kms_from_arn("foo", &ctx, ""), "foo|baz:bam"),
        (KeyDescriptor::kms_from_arn("foo", &ctx, "bar"), "foo|baz:bam|bar"),
    ];
    for (descriptor, expected) in cases {
        assert_eq!(build(descriptor).to_string(), expected);
    }
}

#[test]
fn kms_shorthand_splits_role_and_strips_spaces() {
    let key = build(KeyDescriptor::kms_from_arn(
        " arn:aws:kms:us-east-1:1:key/k +arn:aws:iam::1:role/r",
        &EncryptionContext::new(),
        "",
    ));
    match key.source() {
        KeySource::Kms(kms) => {
            assert_eq!(kms.arn, "arn:aws:kms:us-east-1:1:key/k");
            assert_eq!(kms.role, "arn:aws:iam::1:role/r");
        }
        other => panic!("unexpected source: {other:?}"),
    }
    assert_eq!(
        key.to_string(),
        "arn:aws:kms:us-east-1:1:key/k+arn:aws:iam::1:role/r"
    );
}

#[test]
fn kms_context_is_ordered_by_key() {
    let ctx: EncryptionContext = [
        ("zeta".to_string(), "1".to_string()),
        ("alpha".to_string(), "2".to_string()),
    ]
    .into();
    let key = build(KeyDescriptor::kms_from_arn("arn", &ctx, ""));
    assert_eq!(key.to_string(), "arn|alpha:2,zeta:1");
}

#[test]
fn empty_values_are_rejected() {
    for descriptor in [
        KeyDescriptor::kms_from_arn("", &EncryptionContext::new(), ""),
        KeyDescriptor::cloud_kms("   "),
        KeyDescriptor::pgp(""),
    ] {
        assert!(matches!(
            rejected(descriptor),
            PolicyError::InvalidKeyDescriptor { .. }
        ));
    }
}

#[test]
fn azure_shorthand_must_be_a_key_url() {
    let (vault, name, version) = match KeyDescriptor::vault_key_from_url(
        "https://myvault.vault.azure.net/keys/mykey/0123abcd",
    )
    .unwrap()
    {
        KeyDescriptor::VaultKey {
            vault_url,
            key_name,
            key_version,
        } => (vault_url, key_name, key_version),
        other => panic!("unexpected descriptor: {other:?}"),
    };
    assert_eq!(vault, "https://myvault.vault.azure.net");
    assert_eq!(name, "mykey");
    assert_eq!(version, "0123abcd");

    for bad in [
        "http://myvault.vault.azure.net/keys/mykey/1",
        "https://myvault.vault.azure.net/secrets/mykey/1",
        "https://myvault.vault.azure.net/keys/mykey",
    ] {
        let err = KeyDescriptor::vault_key_from_url(bad).unwrap_err();
        assert!(matches!(
            err,
            PolicyError::InvalidKeyDescriptor {
                backend: KeyKind::AzureKv,
                ..
            }
        ));
    }
}

#[test]
fn azure_structured_key_needs_host_and_name() {
    let missing_name = KeyDescriptor::VaultKey {
        vault_url: "https://v.vault.azure.net".into(),
        key_name: String::new(),
        key_version: "1".into(),
    };
    assert!(matches!(rejected(missing_name), PolicyError::InvalidKeyDescriptor { .. }));

    let bad_url = KeyDescriptor::VaultKey {
        vault_url: "not a url".into(),
        key_name: "k".into(),
        key_version: "1".into(),
    };
    assert!(matches!(rejected(bad_url), PolicyError::InvalidKeyDescriptor { .. }));
}

#[test]
fn transit_uri_is_split_into_address_engine_and_key() {
    let key = HcVaultKey::from_uri("https://vault.example.com:8200/v1/my/transit/keys/app").unwrap();
    assert_eq!(key.address, "https://vault.example.com:8200");
    assert_eq!(key.engine_path, "my/transit");
    assert_eq!(key.key_name, "app");
    assert_eq!(
        key.to_string(),
        "https://vault.example.com:8200/v1/my/transit/keys/app"
    );
}

#[test]
fn transit_uri_address_is_kept_as_written() {
    let key = build(KeyDescriptor::transit_uri("https://foz:443/v1/foz/keys/foz"));
    assert_eq!(key.to_string(), "https://foz:443/v1/foz/keys/foz");

    let key = HcVaultKey::from_uri("http://4:8200/v1/4/keys/4").unwrap();
    assert_eq!(key.address, "http://4:8200");
    assert_eq!(key.to_string(), "http://4:8200/v1/4/keys/4");

    // Default port spelled out or omitted are distinct identities
    let explicit = build(KeyDescriptor::transit_uri("https://foz:443/v1/foz/keys/foz"));
    let implicit = build(KeyDescriptor::transit_uri("https://foz/v1/foz/keys/foz"));
    assert_ne!(explicit.identity(), implicit.identity());
}

#[test]
fn malformed_transit_uris_are_rejected() {
    for bad in [
        "vault.example.com/v1/transit/keys/app",
        "https://vault.example.com/transit/keys/app",
        "https://vault.example.com/v1/transit",
    ] {
        let err = rejected(KeyDescriptor::transit_uri(bad));
        assert!(
            matches!(err, PolicyError::InvalidKeyDescriptor { backend: KeyKind::HcVault, .. }),
            "{bad} should be rejected"
        );
    }
}

#[test]
fn age_recipients_are_validated() {
    assert_eq!(build(KeyDescriptor::age(AGE_RECIPIENT)).to_string(), AGE_RECIPIENT);
    assert_eq!(
        build(KeyDescriptor::age(&format!("  {AGE_RECIPIENT}\n"))).to_string(),
        AGE_RECIPIENT
    );
    build(KeyDescriptor::age(SSH_RECIPIENT));

    for bad in ["age1short", "AGE1QL3Z7", "ssh-dss AAAA", "pgp:abc"] {
        assert!(matches!(
            rejected(KeyDescriptor::age(bad)),
            PolicyError::InvalidKeyDescriptor {
                backend: KeyKind::Age,
                ..
            }
        ));
    }
}

#[test]
fn age_recipients_are_decoded_not_pattern_matched() {
    // Last character flipped: valid charset and length, broken checksum
    let broken_checksum = format!("{}q", &AGE_RECIPIENT[..AGE_RECIPIENT.len() - 1]);
    let all_zero = format!("age1{}", "q".repeat(58));
    let truncated_ssh = "ssh-ed25519 AAAA";
    let bad_plugin = "age1yubikey1notbech32";

    for bad in [broken_checksum.as_str(), all_zero.as_str(), truncated_ssh, bad_plugin] {
        match rejected(KeyDescriptor::age(bad)) {
            PolicyError::InvalidKeyDescriptor { backend, reason, .. } => {
                assert_eq!(backend, KeyKind::Age);
                assert!(reason.starts_with("failed to parse input as"), "{bad}: {reason}");
            }
            other => panic!("unexpected error for {bad}: {other}"),
        }
    }
}

#[test]
fn persistence_maps_per_backend() {
    let ctx: EncryptionContext = [("env".to_string(), "prod".to_string())].into();
    let kms = build(KeyDescriptor::kms_from_arn("arn+arn:aws:iam::1:role/r", &ctx, "ops"));
    assert_eq!(
        serde_json::Value::Object(kms.to_map()),
        json!({
            "arn": "arn",
            "role": "arn:aws:iam::1:role/r",
            "context": { "env": "prod" },
            "aws_profile": "ops",
        })
    );

    let vault = build(KeyDescriptor::transit_uri("https://v:8200/v1/transit/keys/k"));
    assert_eq!(
        serde_json::Value::Object(vault.to_map()),
        json!({
            "vault_address": "https://v:8200",
            "engine_path": "transit",
            "key_name": "k",
        })
    );

    let pgp = build(KeyDescriptor::pgp("ABCD"));
    assert_eq!(serde_json::Value::Object(pgp.to_map()), json!({ "fp": "ABCD" }));
}

#[test]
fn kms_context_parsing() {
    let ctx = parse_kms_context("a:1,b:2").unwrap();
    assert_eq!(ctx.get("a").map(String::as_str), Some("1"));
    assert_eq!(ctx.get("b").map(String::as_str), Some("2"));

    assert_eq!(parse_kms_context(""), None);
    assert_eq!(parse_kms_context("a:1,broken"), None);
    assert_eq!(parse_kms_context("a:1:2"), None);
}
