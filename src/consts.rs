// src/consts.rs
//! Shared constants: file names, search limits and provider defaults

/// Name of the configuration file looked up by discovery
pub const CONFIG_FILE_NAME: &str = ".sops.yaml";

/// Common misspelling of the config file name; noticed but never used
pub const ALTERNATE_CONFIG_FILE_NAME: &str = ".sops.yml";

/// Maximum number of parent directories walked during discovery
pub const MAX_CONFIG_SEARCH_DEPTH: usize = 100;

/// Environment variable the CLI reads an explicit config path from
pub const CONFIG_PATH_ENV: &str = "SOPS_CONFIG";

/// Age of a wrapped data key after which it should be rotated (≈ 6 months)
pub const KEY_ROTATION_TTL_DAYS: i64 = 30 * 6;

/// Substring separating an ARN from an IAM role in KMS shorthand entries
pub const KMS_ROLE_SEPARATOR: &str = "+arn:aws:iam::";

/// Vault address used when neither the rule nor `VAULT_ADDR` provide one
pub const DEFAULT_VAULT_ADDRESS: &str = "https://127.0.0.1:8200";

/// Environment variable consulted for the Vault address
pub const VAULT_ADDR_ENV: &str = "VAULT_ADDR";

/// Default KV mount for Vault destinations
pub const DEFAULT_VAULT_KV_MOUNT: &str = "secret/";

/// Default KV engine version for Vault destinations
pub const DEFAULT_VAULT_KV_VERSION: u8 = 2;

/// Default parameter type for AWS Parameter Store destinations
pub const DEFAULT_PARAMETER_STORE_TYPE: &str = "SecureString";
