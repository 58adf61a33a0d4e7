// src/config/mod.rs
//! Configuration system for sops-policy
//!
//! Parsing of the `.sops.yaml` document, store defaults, config-file
//! discovery and the config-relative path normalizer.

pub use defaults::{default_stores, StoresConfig};
pub use discovery::{find_config_file, lookup_config_file, ConfigFileResult, FileSystem, OsFileSystem};
pub use file::{
    AzureKvKeySpec, ConfigFile, CreationRule, DestinationRule, GcpKmsKeySpec, KeyGroupSpec,
    KmsKeySpec, StringList,
};
pub use path::relative_to_config_dir;

use std::path::Path;

use crate::error::{PolicyError, Result};

pub mod defaults;
pub mod discovery;
pub mod file;
pub mod path;

/// Read and parse the config file at `path`
pub fn load(path: &Path) -> Result<ConfigFile> {
    let bytes = std::fs::read(path).map_err(|source| PolicyError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    ConfigFile::parse(&bytes)
}

/// The `stores` section of the config file at `path`
pub fn load_stores_config(path: &Path) -> Result<StoresConfig> {
    Ok(load(path)?.stores)
}
