//! Data file discovery.

use crate::error::{EtlError, Result};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of the newline-delimited JSON data files.
pub const DATA_FILE_EXTENSION: &str = "json";

/// Recursively collect the absolute paths of all files under `root` with the
/// given extension.
///
/// Entries are visited depth-first with siblings sorted by file name, so the
/// result is stable across runs. Callers must not rely on any other ordering.
pub fn find_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let root = fs::canonicalize(root).map_err(|e| EtlError::io(root, e))?;
    let metadata = fs::metadata(&root).map_err(|e| EtlError::io(&root, e))?;
    if !metadata.is_dir() {
        return Err(EtlError::io(
            &root,
            io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && entry.path().extension() == Some(OsStr::new(extension))
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
