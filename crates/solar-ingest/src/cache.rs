//! Process-scoped cache of merged datasets.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::discovery::list_csv_files;
use crate::error::{IngestError, Result};
use crate::merge::{IngestOptions, MergeResult, load_all_with_options};
use crate::naming::is_clean_artifact;

#[derive(Debug)]
struct CacheEntry {
    signature: String,
    result: Arc<MergeResult>,
}

/// Merged datasets keyed by directory and ingest options.
///
/// An entry is reused while the directory signature (file names, sizes and
/// modification times of its CSV files) is unchanged.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<(PathBuf, IngestOptions), CacheEntry>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached merge for `dir`, reloading when files changed.
    pub fn get_or_load(&mut self, dir: &Path, options: &IngestOptions) -> Result<Arc<MergeResult>> {
        let signature = directory_signature(dir, options)?;
        let key = (canonical(dir)?, *options);
        if let Some(entry) = self.entries.get(&key)
            && entry.signature == signature
        {
            debug!(dir = %dir.display(), "dataset cache hit");
            return Ok(Arc::clone(&entry.result));
        }
        debug!(dir = %dir.display(), "dataset cache miss");
        let result = Arc::new(load_all_with_options(dir, options)?);
        self.entries.insert(
            key,
            CacheEntry {
                signature,
                result: Arc::clone(&result),
            },
        );
        Ok(result)
    }

    /// Drops every entry for `dir`. Returns whether anything was removed.
    pub fn invalidate(&mut self, dir: &Path) -> bool {
        let target = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        let before = self.entries.len();
        self.entries.retain(|(path, _), _| path != &target);
        before != self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn canonical(dir: &Path) -> Result<PathBuf> {
    dir.canonicalize().map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })
}

/// Hex SHA-256 over the sorted name, size and mtime of the CSV files a
/// merge with `options` would read.
pub fn directory_signature(dir: &Path, options: &IngestOptions) -> Result<String> {
    let mut hasher = Sha256::new();
    for path in list_csv_files(dir)? {
        if options.exclude_artifacts && is_clean_artifact(&path) {
            continue;
        }
        let metadata = std::fs::metadata(&path).map_err(|e| IngestError::FileRead {
            path: path.clone(),
            source: e,
        })?;
        let modified = metadata
            .modified()
            .ok()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .map_or(0, |duration| duration.as_nanos());
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
        hasher.update(metadata.len().to_le_bytes());
        hasher.update(modified.to_le_bytes());
    }
    Ok(hex::encode(hasher.finalize()))
}
