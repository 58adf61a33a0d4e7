// src/config/defaults.rs
//! Store-format defaults, the only process-wide state in the crate
//!
//! Built once and read-only afterwards.

use std::sync::OnceLock;

use serde::Deserialize;

/// Indent value meaning "let the emitter decide"
pub const DEFAULT_JSON_INDENT: i32 = -1;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DotenvStoreConfig {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IniStoreConfig {}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct JsonStoreConfig {
    pub indent: i32,
}

impl Default for JsonStoreConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_JSON_INDENT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct JsonBinaryStoreConfig {
    pub indent: i32,
}

impl Default for JsonBinaryStoreConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_JSON_INDENT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct YamlStoreConfig {
    pub indent: i32,
}

/// `stores:` section of the config document
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoresConfig {
    pub dotenv: DotenvStoreConfig,
    pub ini: IniStoreConfig,
    pub json_binary: JsonBinaryStoreConfig,
    pub json: JsonStoreConfig,
    pub yaml: YamlStoreConfig,
}

static DEFAULT_STORES: OnceLock<StoresConfig> = OnceLock::new();

/// Shared default store settings
pub fn default_stores() -> &'static StoresConfig {
    DEFAULT_STORES.get_or_init(StoresConfig::default)
}
