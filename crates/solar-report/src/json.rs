//! JSON comparison report output.

use std::io::Write;
use std::path::Path;

use tracing::info;

use solar_model::ComparisonReport;

use crate::atomic::write_atomic;
use crate::error::{ReportError, Result};

/// Renders the report as pretty-printed JSON with a trailing newline.
pub fn render_report(report: &ComparisonReport) -> Result<String> {
    let json = serde_json::to_string_pretty(report)?;
    Ok(format!("{json}\n"))
}

/// Writes the report to `path`, replacing any previous report atomically.
pub fn write_report(report: &ComparisonReport, path: &Path) -> Result<()> {
    let rendered = render_report(report)?;
    write_atomic(path, |file| {
        file.write_all(rendered.as_bytes())
            .map_err(|e| ReportError::Io {
                operation: "write",
                path: path.to_path_buf(),
                source: e,
            })
    })?;
    info!(path = %path.display(), "report written");
    Ok(())
}
