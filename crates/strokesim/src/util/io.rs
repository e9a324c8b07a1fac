//! I/O utility functions

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Temporary sibling of `path` with `.tmp` appended to the file name
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write content to a file atomically using write-then-rename pattern.
///
/// The content is first written to a temporary file next to `path`, then
/// renamed over the target, so readers never see a partial file.
pub fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let temp = temp_path(path);
    fs::write(&temp, content)?;
    fs::rename(&temp, path)
}
