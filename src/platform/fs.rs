// DRCScope - platform/fs.rs
//
// Filesystem helpers used by the ingestion layer.

use std::io;
use std::path::Path;

/// Read the full raw content of a report file.
///
/// Decoding is left to the caller: invalid UTF-8 must surface as an error
/// naming the report, never be silently replaced.
pub fn read_bytes(path: &Path) -> io::Result<Vec<u8>> {
    std::fs::read(path)
}

/// Name used to identify a report in tables and exports.
///
/// `full_path` selects the whole path; otherwise the bare file name, falling
/// back to the full path when the path has no final component.
pub fn display_name(path: &Path, full_path: bool) -> String {
    if full_path {
        return path.display().to_string();
    }
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
