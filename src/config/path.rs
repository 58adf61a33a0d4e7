// src/config/path.rs
//! Path helpers: lexical cleaning and config-relative matching subjects

use std::path::{Component, Path, PathBuf};

use crate::error::Result;

/// Lexically normalize a path: drop `.` and fold `name/..` pairs.
///
/// Leading `..` components of relative paths are kept; `..` directly under
/// the root is dropped. An empty result becomes `.`.
pub fn clean(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// Absolute, cleaned form of `path` (no symlink resolution, no I/O besides
/// reading the working directory for relative input)
pub fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(clean(path));
    }
    let cwd = std::env::current_dir()?;
    Ok(clean(&cwd.join(path)))
}

/// The string rules are matched against: `file_path` relative to the
/// directory holding `config_path`, or `file_path` untouched when it lies
/// outside that directory.
pub fn relative_to_config_dir(config_path: &Path, file_path: &Path) -> Result<String> {
    let config_dir = absolute(config_path.parent().unwrap_or_else(|| Path::new(".")))?;
    let subject = match file_path.strip_prefix(&config_dir) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.to_string_lossy().into_owned(),
        _ => file_path.to_string_lossy().into_owned(),
    };
    Ok(subject)
}
