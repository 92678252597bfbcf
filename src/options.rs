//! Transformer configuration.

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

use crate::compiler::{Warning, WarnHandler};
use crate::error::{CompileError, Error, Result};

/// Handler absorbing compile errors.
pub type ErrorHandler = Arc<dyn Fn(&CompileError) + Send + Sync>;

/// Key of the style extraction flag in option maps.
pub const EXTRACT_CSS_KEY: &str = "extractCss";
/// Key of the error handler in option maps.
pub const ON_ERROR_KEY: &str = "onerror";
/// Key of the warning handler in option maps.
pub const ON_WARN_KEY: &str = "onwarn";

/// Keys meaningful only to the transformer; never forwarded to the compiler.
pub const TRANSFORMER_KEYS: [&str; 2] = [EXTRACT_CSS_KEY, ON_ERROR_KEY];

#[derive(Clone, Default)]
pub struct Options {
    /// Emit styles as a separate `.css` file instead of injecting them into the script.
    pub extract_css: bool,
    /// Receives compiler warnings. Warnings are dropped when unset.
    pub on_warn: Option<WarnHandler>,
    /// Receives compile errors instead of failing the file. Errors propagate when unset.
    pub on_error: Option<ErrorHandler>,
    /// Passed through to the compiler.
    pub compiler_options: IndexMap<String, serde_json::Value>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extract_css(mut self, extract_css: bool) -> Self {
        self.extract_css = extract_css;
        self
    }

    pub fn on_warn<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Warning) + Send + Sync + 'static,
    {
        self.on_warn = Some(Arc::new(handler));
        self
    }

    pub fn on_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(&CompileError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(handler));
        self
    }

    pub fn compiler_option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.compiler_options.insert(key.into(), value);
        self
    }

    /// The compiler options with transformer-only keys removed.
    pub fn forwarded(&self) -> IndexMap<String, serde_json::Value> {
        self.compiler_options
            .iter()
            .filter(|(key, _)| !TRANSFORMER_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("extract_css", &self.extract_css)
            .field("on_warn", &self.on_warn.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("compiler_options", &self.compiler_options)
            .finish()
    }
}

/// Reduces the entry point's argument list to a single [`Options`].
///
/// Zero arguments yield the defaults; more than one is a usage error.
pub fn from_args(args: Vec<Options>) -> Result<Options> {
    let got = args.len();
    let mut args = args.into_iter();
    match (args.next(), got) {
        (None, _) => Ok(Options::default()),
        (Some(options), 1) => Ok(options),
        (Some(_), _) => Err(Error::Usage { got }),
    }
}
