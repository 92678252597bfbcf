//! Filesystem producer: turns command-line inputs into Vinyl files.

use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::file::VinylFile;

/// Compiles the patterns selecting files inside input directories.
pub fn build_globset<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern.as_ref()).map_err(|e| {
            Error::ConfigError(format!("Invalid glob pattern '{}': {}", pattern.as_ref(), e))
        })?);
    }
    builder
        .build()
        .map_err(|e| Error::ConfigError(format!("Glob set loading failed: {e}")))
}

/// Reads one file into a buffered Vinyl file rooted at `base`.
pub fn read_file<P: AsRef<Path>>(path: P, base: &Path) -> Result<VinylFile> {
    let path = path.as_ref();
    let contents = fs::read(path)?;
    Ok(VinylFile::new(contents).with_path(path).with_base(base))
}

/// Expands inputs into files, in command-line order.
///
/// Files given directly are always included and use their parent directory as
/// base. Directories are walked in sorted order; only entries matching `globs`
/// (relative to the directory) are included, using the directory as base.
pub fn collect_inputs<P: AsRef<Path>>(inputs: &[P], globs: &GlobSet) -> Result<Vec<VinylFile>> {
    let mut files = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry.map_err(|e| Error::IoError(e.into()))?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let relative = entry.path().strip_prefix(input).unwrap_or(entry.path());
                if !globs.is_match(relative) {
                    debug!("Skipping {}", entry.path().display());
                    continue;
                }
                files.push(read_file(entry.path(), input)?);
            }
        } else {
            let base = input.parent().map(Path::to_path_buf).unwrap_or_else(PathBuf::new);
            files.push(read_file(input, &base)?);
        }
    }
    Ok(files)
}
