//! Configuration handling for vinyl-component.
//! Loads transformer options from JSON or YAML files.

use crate::error::{Error, Result};
use crate::options::{Options, EXTRACT_CSS_KEY, ON_ERROR_KEY, ON_WARN_KEY};
use indexmap::IndexMap;
use log::debug;
use std::path::{Path, PathBuf};

/// Supported configuration file names
pub const CONFIG_FILES: [&str; 3] = [
    "component.config.json",
    "component.config.yml",
    "component.config.yaml",
];

/// Finds the first configuration file present in `dir`.
pub fn find_config<P: AsRef<Path>>(dir: P) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|file| dir.as_ref().join(file))
        .find(|path| path.exists())
}

/// Loads options from a configuration file.
///
/// # Arguments
/// * `path` - Path to a JSON or YAML configuration file
///
/// # Returns
/// * `Result<Options>` - Parsed options
///
/// # Errors
/// * `Error::IoError` if the file cannot be read
/// * `Error::ConfigError` if the content is not a valid configuration
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Options> {
    let path = path.as_ref();
    debug!("Loading configuration from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    parse_options(&content)
}

/// Parses configuration content into [`Options`].
///
/// JSON is tried first, then YAML. `extractCss` maps to the extraction flag,
/// every other key is kept as a compiler option in file order. Handlers can
/// only be installed from code, so `onwarn` and `onerror` are rejected.
pub fn parse_options(content: &str) -> Result<Options> {
    let raw: IndexMap<String, serde_json::Value> = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration format: {e}")))?,
    };

    let mut options = Options::default();
    for (key, value) in raw {
        match key.as_str() {
            EXTRACT_CSS_KEY => {
                options.extract_css = value.as_bool().ok_or_else(|| {
                    Error::ConfigError(format!("`{EXTRACT_CSS_KEY}` must be a boolean"))
                })?;
            }
            ON_WARN_KEY | ON_ERROR_KEY => {
                return Err(Error::ConfigError(format!(
                    "`{key}` cannot be set from a configuration file"
                )));
            }
            _ => {
                options.compiler_options.insert(key, value);
            }
        }
    }
    Ok(options)
}
