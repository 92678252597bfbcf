//! The contract between the transformer and the template compiler it drives.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Handler receiving compiler warnings.
pub type WarnHandler = Arc<dyn Fn(&Warning) + Send + Sync>;

/// A non-fatal diagnostic reported during compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<PathBuf>,
}

/// A compilation failure as reported by the compiler, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerError {
    pub message: String,
    pub filename: Option<PathBuf>,
    pub line: Option<usize>,
}

impl CompilerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            filename: None,
            line: None,
        }
    }
}

impl fmt::Display for CompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CompilerError {}

/// Where the compiler should put a component's styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CssOutput {
    /// Embedded in the generated script.
    #[default]
    Injected,
    /// Returned separately in [`Compiled::css`] and left out of the script.
    External,
}

/// Options handed to [`Compiler::compile`].
#[derive(Clone, Default)]
pub struct CompileOptions {
    pub filename: Option<PathBuf>,
    pub css: CssOutput,
    pub on_warn: Option<WarnHandler>,
    /// Caller options forwarded verbatim.
    pub extra: IndexMap<String, serde_json::Value>,
}

impl CompileOptions {
    /// Reports a warning to the caller's handler, if one was supplied.
    pub fn warn(&self, warning: Warning) {
        if let Some(on_warn) = &self.on_warn {
            on_warn(&warning);
        }
    }
}

impl fmt::Debug for CompileOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileOptions")
            .field("filename", &self.filename)
            .field("css", &self.css)
            .field("on_warn", &self.on_warn.is_some())
            .field("extra", &self.extra)
            .finish()
    }
}

/// Output of a successful compilation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Compiled {
    pub js: String,
    pub css: Option<String>,
}

/// A synchronous template compiler.
pub trait Compiler {
    /// Compiles component source text.
    ///
    /// # Arguments
    /// * `source` - Component source text
    /// * `options` - Filename, style placement, warning handler and forwarded options
    ///
    /// # Returns
    /// * `Result<Compiled, CompilerError>` - Generated script and, when available, styles
    fn compile(&self, source: &str, options: &CompileOptions) -> Result<Compiled, CompilerError>;
}

impl<C: Compiler + ?Sized> Compiler for &C {
    fn compile(&self, source: &str, options: &CompileOptions) -> Result<Compiled, CompilerError> {
        (**self).compile(source, options)
    }
}
