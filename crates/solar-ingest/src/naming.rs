//! File-name heuristics for group identifiers.
//!
//! Both functions are pure and return `None` instead of inventing a group, so
//! an oddly named file shows up as a visible no-match.

use std::path::Path;

use solar_model::CLEAN_ARTIFACT_SUFFIX;

/// Guesses a group identifier from a raw measurement file name.
///
/// The base name is lowercased; the part before the first hyphen wins, else
/// the part before the first underscore, else the name without extension:
///
/// - `benin-malanville.csv` -> `benin`
/// - `sierraleone-bumbuna.csv` -> `sierraleone`
/// - `togo_dapaong.csv` -> `togo`
/// - `Niger.csv` -> `niger`
pub fn group_from_filename(path: &Path) -> Option<String> {
    let base = path.file_name()?.to_str()?.to_lowercase();
    let group = if let Some((head, _)) = base.split_once('-') {
        head.to_string()
    } else if let Some((head, _)) = base.split_once('_') {
        head.to_string()
    } else {
        Path::new(&base)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_string()
    };
    if group.trim().is_empty() {
        None
    } else {
        Some(group)
    }
}

/// Recovers the group of an exported artifact named `<group>_clean.csv`.
pub fn group_from_artifact_name(path: &Path) -> Option<String> {
    let group = artifact_stem(path)?.strip_suffix(CLEAN_ARTIFACT_SUFFIX)?;
    if group.trim().is_empty() {
        None
    } else {
        Some(group.to_string())
    }
}

/// File name of the exported artifact for a group.
pub fn artifact_file_name(group: &str) -> String {
    format!("{group}{CLEAN_ARTIFACT_SUFFIX}.csv")
}

/// Whether a path is named like an exported artifact (`*_clean.csv`).
///
/// Also true for a bare `_clean.csv`, whose group is unrecoverable.
pub fn is_clean_artifact(path: &Path) -> bool {
    artifact_stem(path).is_some_and(|stem| stem.ends_with(CLEAN_ARTIFACT_SUFFIX))
}

fn artifact_stem(path: &Path) -> Option<&str> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return None;
    }
    path.file_stem()?.to_str()
}
