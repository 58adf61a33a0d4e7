// src/export.rs
//! JSON rendering of a resolved policy
//!
//! Key groups are written as their persistence maps, so the output has the
//! same per-backend shape as stored key metadata.

use serde_json::{json, Value};

use crate::policy::Policy;

/// Render `policy` as JSON.
///
/// When `file_name` is given and the policy has a destination, the full
/// publish location of that file is included as `destination_path`.
pub fn policy_to_json(policy: &Policy, file_name: Option<&str>) -> Value {
    let key_groups: Vec<Value> = policy
        .key_groups
        .iter()
        .map(|group| {
            Value::Array(
                group
                    .iter()
                    .map(|key| {
                        let mut entry = key.to_map();
                        entry.insert("type".into(), Value::String(key.kind().identifier().into()));
                        Value::Object(entry)
                    })
                    .collect(),
            )
        })
        .collect();

    let destination_path = match (&policy.destination, file_name) {
        (Some(dest), Some(name)) => Value::String(dest.path(name)),
        _ => Value::Null,
    };

    json!({
        "key_groups": key_groups,
        "shamir_threshold": policy.shamir_threshold,
        "selector": policy.selector,
        "mac_only_encrypted": policy.mac_only_encrypted,
        "destination": policy.destination,
        "destination_path": destination_path,
        "omit_extensions": policy.omit_extensions,
        "exporter_version": env!("CARGO_PKG_VERSION"),
    })
}
