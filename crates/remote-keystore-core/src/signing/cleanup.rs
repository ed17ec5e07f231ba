//! Removal of credential files once the build no longer needs them

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use crate::blob::is_contained_name;
use crate::credentials::{normalize_file_name, DESCRIPTOR_EXTENSION, KEYSTORE_EXTENSION};
use crate::resolver::ResolvedConfig;

use super::properties::DEFAULT_KEYSTORE_FILE_NAME;

/// Delete downloaded and materialized credential files under `root`
///
/// Removes the normalized keystore and descriptor names from `config` plus
/// the materialized default keystore. Files that are already gone, and names
/// that would resolve outside `root`, are skipped. Returns the paths actually
/// removed.
pub fn cleanup(root: impl AsRef<Path>, config: &ResolvedConfig) -> io::Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let names = [
        blank_to_none(&config.key_store_file_name).map(|n| normalize_file_name(n, KEYSTORE_EXTENSION)),
        blank_to_none(&config.support_document_filename).map(|n| normalize_file_name(n, DESCRIPTOR_EXTENSION)),
        Some(DEFAULT_KEYSTORE_FILE_NAME.to_string()),
    ];

    let mut removed = Vec::new();
    for name in names.into_iter().flatten() {
        if !is_contained_name(&name) {
            crate::logging::warn("cleanup", &format!("Skipping {}: outside {}", name, root.display()));
            continue;
        }
        let path = root.join(name);
        match fs::remove_file(&path) {
            Ok(()) => {
                crate::logging::debug("cleanup", &format!("Removed {}", path.display()));
                removed.push(path);
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }
    Ok(removed)
}

fn blank_to_none(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
