use std::path::Path;

use tracing::debug;

use crate::error::ReportError;

/// Write `content` to `path`, replacing whatever was there.
pub fn write_report(path: &Path, content: &str) -> Result<(), ReportError> {
    std::fs::write(path, content).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), bytes = content.len(), "Report written");
    Ok(())
}
