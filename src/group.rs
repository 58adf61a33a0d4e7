// src/group.rs
//! Key-group assembly: flatten nested `merge` groups, instantiate every
//! descriptor and drop duplicates.
//!
//! Order is depth-first: a group's `merge` children come first (in order),
//! then its own age, pgp, kms, gcp_kms, azure_keyvault and hc_vault
//! entries. Deduplication keeps the first occurrence of each
//! (backend, canonical string) pair.

use std::collections::HashSet;

use crate::config::file::{shorthand_entries, split_entries};
use crate::config::{CreationRule, KeyGroupSpec};
use crate::error::Result;
use crate::keys::{EncryptionContext, KeyDescriptor, MasterKey};

/// Resolved, duplicate-free group of provider handles
pub type KeyGroup = Vec<MasterKey>;

/// Descriptors of `group` in depth-first merge order, duplicates included
pub fn flatten_descriptors(group: &KeyGroupSpec) -> Vec<KeyDescriptor> {
    let mut out = Vec::new();
    collect(group, &mut out);
    out
}

fn collect(group: &KeyGroupSpec, out: &mut Vec<KeyDescriptor>) {
    for child in &group.merge {
        collect(child, out);
    }
    out.extend(split_entries(group.age.iter().map(String::as_str)).map(KeyDescriptor::age));
    out.extend(group.pgp.iter().map(|fp| KeyDescriptor::pgp(fp)));
    out.extend(group.kms.iter().map(KeyDescriptor::from));
    out.extend(group.gcp_kms.iter().map(KeyDescriptor::from));
    out.extend(group.azure_keyvault.iter().map(KeyDescriptor::from));
    out.extend(group.hc_vault.iter().map(|uri| KeyDescriptor::transit_uri(uri)));
}

/// Remove later duplicates, keeping the first occurrence and its position
pub fn deduplicate(group: KeyGroup) -> KeyGroup {
    let mut seen = HashSet::new();
    group
        .into_iter()
        .filter(|key| seen.insert(key.identity()))
        .collect()
}

/// Instantiate descriptors in order and deduplicate the result.
/// The first descriptor that fails validation aborts the whole group.
pub fn build_group(descriptors: &[KeyDescriptor]) -> Result<KeyGroup> {
    let keys = descriptors
        .iter()
        .map(MasterKey::from_descriptor)
        .collect::<Result<KeyGroup>>()?;
    Ok(deduplicate(keys))
}

/// Resolve one `key_groups` entry, including any nested `merge` groups
pub fn resolve_key_group(group: &KeyGroupSpec) -> Result<KeyGroup> {
    build_group(&flatten_descriptors(group))
}

/// Descriptors of a rule's flat shorthand fields, in the order
/// age, pgp, kms, gcp_kms, azure_keyvault, hc_vault_transit_uri.
///
/// `extra_context` becomes the encryption context of every KMS entry.
pub fn shorthand_descriptors(
    rule: &CreationRule,
    extra_context: &EncryptionContext,
) -> Result<Vec<KeyDescriptor>> {
    let mut out: Vec<KeyDescriptor> = Vec::new();
    out.extend(shorthand_entries(&rule.age).into_iter().map(KeyDescriptor::age));
    out.extend(shorthand_entries(&rule.pgp).into_iter().map(KeyDescriptor::pgp));
    out.extend(
        shorthand_entries(&rule.kms)
            .into_iter()
            .map(|arn| KeyDescriptor::kms_from_arn(arn, extra_context, &rule.aws_profile)),
    );
    out.extend(shorthand_entries(&rule.gcp_kms).into_iter().map(KeyDescriptor::cloud_kms));
    for url in shorthand_entries(&rule.azure_keyvault) {
        out.push(KeyDescriptor::vault_key_from_url(url)?);
    }
    out.extend(
        shorthand_entries(&rule.hc_vault_transit_uri)
            .into_iter()
            .map(KeyDescriptor::transit_uri),
    );
    Ok(out)
}

/// All key groups of a creation rule.
///
/// Explicit `key_groups` are resolved independently; otherwise the flat
/// shorthand fields collapse into exactly one implicit group (possibly
/// empty).
pub fn key_groups_from_rule(
    rule: &CreationRule,
    extra_context: &EncryptionContext,
) -> Result<Vec<KeyGroup>> {
    if !rule.key_groups.is_empty() {
        return rule.key_groups.iter().map(resolve_key_group).collect();
    }
    Ok(vec![build_group(&shorthand_descriptors(rule, extra_context)?)?])
}
