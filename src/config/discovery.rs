// src/config/discovery.rs
//! Config-file discovery: walk up from a file towards the filesystem root
//!
//! The filesystem is an injected capability so lookups can be tested
//! without touching the disk or any global state.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::path::clean;
use crate::consts::{ALTERNATE_CONFIG_FILE_NAME, CONFIG_FILE_NAME, MAX_CONFIG_SEARCH_DEPTH};
use crate::error::{PolicyError, Result};

/// Minimal filesystem capability needed by discovery
pub trait FileSystem {
    /// `Ok(())` when something exists at `path`
    fn stat(&self, path: &Path) -> io::Result<()>;
}

/// The real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn stat(&self, path: &Path) -> io::Result<()> {
        std::fs::metadata(path).map(|_| ())
    }
}

/// Outcome of a successful lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFileResult {
    pub path: PathBuf,
    /// Set when a misnamed `.sops.yml` was seen and ignored
    pub warning: Option<String>,
}

/// Search `start`'s directory and up to `MAX_CONFIG_SEARCH_DEPTH` parents
/// for a config file.
pub fn lookup_config_file(fs: &dyn FileSystem, start: &Path) -> Result<ConfigFileResult> {
    let mut dir = match start.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut alternate: Option<PathBuf> = None;

    for _ in 0..MAX_CONFIG_SEARCH_DEPTH {
        let candidate = clean(&dir.join(CONFIG_FILE_NAME));
        if fs.stat(&candidate).is_ok() {
            debug!(path = %candidate.display(), "found config file");
            let warning = alternate.map(|alt| {
                format!(
                    "ignoring {:?} when searching for config file; the config file must be called {:?}; using {:?} instead",
                    alt.display().to_string(),
                    CONFIG_FILE_NAME,
                    candidate.display().to_string()
                )
            });
            if let Some(w) = &warning {
                warn!("{w}");
            }
            return Ok(ConfigFileResult {
                path: candidate,
                warning,
            });
        }

        if alternate.is_none() {
            let alt = clean(&dir.join(ALTERNATE_CONFIG_FILE_NAME));
            if fs.stat(&alt).is_ok() {
                alternate = Some(alt);
            }
        }

        dir = clean(&dir.join(".."));
    }

    let warning = alternate.map(|alt| {
        format!(
            "ignoring {:?} when searching for config file; the config file must be called {:?}",
            alt.display().to_string(),
            CONFIG_FILE_NAME
        )
    });
    if let Some(w) = &warning {
        warn!("{w}");
    }
    Err(PolicyError::ConfigNotFound { warning })
}

/// Like `lookup_config_file`, returning only the path
pub fn find_config_file(fs: &dyn FileSystem, start: &Path) -> Result<PathBuf> {
    lookup_config_file(fs, start).map(|found| found.path)
}
