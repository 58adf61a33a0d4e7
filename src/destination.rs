// src/destination.rs
//! Publish targets for encrypted files
//!
//! A destination rule names at most one target. The target only computes
//! where a file would land; uploading is left to the caller.

use std::fmt;

use serde::Serialize;

use crate::config::DestinationRule;
use crate::consts::{
    DEFAULT_PARAMETER_STORE_TYPE, DEFAULT_VAULT_ADDRESS, DEFAULT_VAULT_KV_MOUNT,
    DEFAULT_VAULT_KV_VERSION, VAULT_ADDR_ENV,
};
use crate::error::{PolicyError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Destination {
    S3 {
        bucket: String,
        prefix: String,
    },
    Gcs {
        bucket: String,
        prefix: String,
    },
    Vault {
        address: String,
        path: String,
        kv_mount_name: String,
        kv_version: u8,
    },
    AwsSecretsManager {
        region: String,
        secret_name: String,
    },
    AwsParameterStore {
        region: String,
        path: String,
        parameter_type: String,
    },
}

fn with_trailing_slash(s: &str) -> String {
    if s.ends_with('/') {
        s.to_owned()
    } else {
        format!("{s}/")
    }
}

impl Destination {
    pub fn s3(bucket: &str, prefix: &str) -> Self {
        Destination::S3 {
            bucket: bucket.to_owned(),
            prefix: prefix.to_owned(),
        }
    }

    pub fn gcs(bucket: &str, prefix: &str) -> Self {
        Destination::Gcs {
            bucket: bucket.to_owned(),
            prefix: prefix.to_owned(),
        }
    }

    /// Vault KV target. `address` is kept as configured (possibly empty;
    /// see [`Destination::vault_address`]); empty `kv_mount_name` means
    /// `secret/`; any version other than 1 means KV v2.
    pub fn vault(address: &str, path: &str, kv_mount_name: &str, kv_version: i64) -> Self {
        let kv_mount_name = if kv_mount_name.is_empty() {
            DEFAULT_VAULT_KV_MOUNT.to_owned()
        } else {
            with_trailing_slash(kv_mount_name)
        };
        let kv_version = if kv_version == 1 { 1 } else { DEFAULT_VAULT_KV_VERSION };
        Destination::Vault {
            address: address.to_owned(),
            path: with_trailing_slash(path),
            kv_mount_name,
            kv_version,
        }
    }

    /// Effective Vault address: the configured one, else `$VAULT_ADDR`,
    /// else the local default. Read at publish time, never during
    /// resolution.
    pub fn vault_address(configured: &str) -> String {
        if !configured.is_empty() {
            return configured.to_owned();
        }
        std::env::var(VAULT_ADDR_ENV)
            .ok()
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| DEFAULT_VAULT_ADDRESS.to_owned())
    }

    pub fn aws_secrets_manager(region: &str, secret_name: &str) -> Self {
        Destination::AwsSecretsManager {
            region: region.to_owned(),
            secret_name: secret_name.to_owned(),
        }
    }

    /// Parameter Store target; the path always starts with `/` and the type
    /// defaults to `SecureString`
    pub fn aws_parameter_store(region: &str, path: &str, parameter_type: &str) -> Self {
        let path = if path.is_empty() || path.starts_with('/') {
            path.to_owned()
        } else {
            format!("/{path}")
        };
        let parameter_type = if parameter_type.is_empty() {
            DEFAULT_PARAMETER_STORE_TYPE.to_owned()
        } else {
            parameter_type.to_owned()
        };
        Destination::AwsParameterStore {
            region: region.to_owned(),
            path,
            parameter_type,
        }
    }

    /// The destination configured by `rule`, if any.
    ///
    /// Fails when more than one destination field is set.
    pub fn from_rule(rule: &DestinationRule) -> Result<Option<Self>> {
        let candidates: [(&'static str, &String, fn(&DestinationRule) -> Destination); 5] = [
            ("s3_bucket", &rule.s3_bucket, |r: &DestinationRule| {
                Destination::s3(&r.s3_bucket, &r.s3_prefix)
            }),
            ("gcs_bucket", &rule.gcs_bucket, |r: &DestinationRule| {
                Destination::gcs(&r.gcs_bucket, &r.gcs_prefix)
            }),
            ("vault_path", &rule.vault_path, |r: &DestinationRule| {
                Destination::vault(
                    &r.vault_address,
                    &r.vault_path,
                    &r.vault_kv_mount_name,
                    r.vault_kv_version,
                )
            }),
            (
                "aws_secrets_manager_secret_name",
                &rule.aws_secrets_manager_secret_name,
                |r: &DestinationRule| {
                    Destination::aws_secrets_manager(&r.aws_region, &r.aws_secrets_manager_secret_name)
                },
            ),
            (
                "aws_parameter_store_path",
                &rule.aws_parameter_store_path,
                |r: &DestinationRule| {
                    Destination::aws_parameter_store(
                        &r.aws_region,
                        &r.aws_parameter_store_path,
                        &r.aws_parameter_store_type,
                    )
                },
            ),
        ];
        let set: Vec<_> = candidates
            .into_iter()
            .filter(|(_, value, _)| !value.is_empty())
            .collect();
        if set.len() > 1 {
            return Err(PolicyError::MultipleDestinations {
                fields: set.iter().map(|(name, _, _)| *name).collect(),
            });
        }
        Ok(set.first().map(|(_, _, build)| build(rule)))
    }

    /// Full location `file_name` would be published to
    pub fn path(&self, file_name: &str) -> String {
        match self {
            Destination::S3 { bucket, prefix } => format!("s3://{bucket}/{prefix}{file_name}"),
            Destination::Gcs { bucket, prefix } => format!("gcs://{bucket}/{prefix}{file_name}"),
            Destination::Vault {
                address,
                path,
                kv_mount_name,
                kv_version,
            } => {
                let address = Destination::vault_address(address);
                let data = if *kv_version == 1 { "" } else { "data/" };
                format!("{address}/v1/{kv_mount_name}{data}{path}{file_name}")
            }
            Destination::AwsSecretsManager {
                region,
                secret_name,
            } => {
                let name = if secret_name.is_empty() {
                    file_name
                } else {
                    secret_name.as_str()
                };
                format!("arn:aws:secretsmanager:{region}:*:secret:{name}")
            }
            Destination::AwsParameterStore { path, .. } => {
                if path.is_empty() {
                    if file_name.starts_with('/') {
                        file_name.to_owned()
                    } else {
                        format!("/{file_name}")
                    }
                } else if path.ends_with('/') {
                    format!("{path}{file_name}")
                } else {
                    path.clone()
                }
            }
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::S3 { bucket, prefix } => write!(f, "s3://{bucket}/{prefix}"),
            Destination::Gcs { bucket, prefix } => write!(f, "gcs://{bucket}/{prefix}"),
            Destination::Vault { .. } => f.write_str(&self.path("")),
            Destination::AwsSecretsManager { region, secret_name } => {
                write!(f, "arn:aws:secretsmanager:{region}:*:secret:{secret_name}")
            }
            Destination::AwsParameterStore { path, .. } => f.write_str(path),
        }
    }
}
