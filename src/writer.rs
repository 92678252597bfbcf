//! Filesystem sink: writes emitted Vinyl files under an output directory.

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::file::{Contents, VinylFile};

/// Target path of `file` under `out_dir`, or `None` for files without a path.
pub fn target_path(file: &VinylFile, out_dir: &Path) -> Option<PathBuf> {
    file.relative().map(|relative| out_dir.join(relative))
}

/// Writes a buffered file under `out_dir` and returns where it went.
///
/// # Errors
/// * `Error::ConfigError` if the file has no path or is not buffered
/// * `Error::IoError` if writing fails
pub fn write_file(file: &VinylFile, out_dir: &Path) -> Result<PathBuf> {
    let target = target_path(file, out_dir)
        .ok_or_else(|| Error::ConfigError("cannot write a file without a path".to_string()))?;
    let bytes = match &file.contents {
        Contents::Buffer(bytes) => bytes,
        _ => {
            return Err(Error::ConfigError(format!(
                "cannot write '{}' without buffered contents",
                target.display()
            )))
        }
    };

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    debug!("Writing file: {}", target.display());
    fs::write(&target, bytes)?;
    Ok(target)
}
