//! Whole-file replacement through a sibling temp file.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::error::{ReportError, Result};

/// Writes `path` by filling `<path>.tmp` and renaming it over the target.
///
/// A failure leaves the previous file (if any) in place.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ReportError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let temp_path = temp_path_for(path);
    let mut file = File::create(&temp_path).map_err(|e| ReportError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;

    if let Err(err) = write(&mut file) {
        drop(file);
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }

    if let Err(e) = file.sync_all() {
        drop(file);
        let _ = fs::remove_file(&temp_path);
        return Err(ReportError::Io {
            operation: "sync",
            path: temp_path,
            source: e,
        });
    }
    drop(file);

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(ReportError::AtomicWriteFailed {
            temp_path,
            target_path: path.to_path_buf(),
            source: e,
        });
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
