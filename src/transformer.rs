//! Core file transformation.
//! Validates each incoming pipeline item, drives the compiler and shapes
//! its results into output files or a single normalized error.

use log::{debug, trace};
use std::path::Path;

use crate::compiler::{CompileOptions, Compiler, CssOutput};
use crate::error::{CompileError, Error, Result};
use crate::file::{Contents, VinylFile};
use crate::input::{kind_of, Input};
use crate::options::{self, Options};

/// Extension of the generated script file.
pub const SCRIPT_EXTENSION: &str = "js";
/// Extension of the extracted style file.
pub const STYLE_EXTENSION: &str = "css";

/// Terminal state of one successful invocation.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// The file had no contents and is emitted as it came in.
    Passthrough(VinylFile),
    /// The file compiled; the style file is present only when extracted and non-empty.
    Emitted {
        script: VinylFile,
        style: Option<VinylFile>,
    },
    /// The compiler failed and the error handler absorbed it.
    Handled,
}

impl Outcome {
    /// Files to push downstream, in emission order.
    pub fn into_files(self) -> Vec<VinylFile> {
        match self {
            Outcome::Passthrough(file) => vec![file],
            Outcome::Emitted { script, style } => std::iter::once(script).chain(style).collect(),
            Outcome::Handled => Vec::new(),
        }
    }
}

/// Compiles component files flowing through a pipeline.
pub struct FileTransformer<C> {
    compiler: C,
    options: Options,
}

impl<C: Compiler> FileTransformer<C> {
    pub fn new(compiler: C, options: Options) -> Self {
        Self { compiler, options }
    }

    /// Creates a transformer from the entry point's argument list.
    ///
    /// # Errors
    /// * `Error::Usage` if more than one options argument is given
    pub fn from_args(compiler: C, args: Vec<Options>) -> Result<Self> {
        Ok(Self::new(compiler, options::from_args(args)?))
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Processes a single pipeline item.
    ///
    /// # Arguments
    /// * `input` - The item delivered by the upstream producer
    ///
    /// # Returns
    /// * `Result<Outcome>` - What to emit for this item
    ///
    /// # Errors
    /// * `Error::NotAFile` if the item is not a Vinyl file
    /// * `Error::LegacyFile` if the item is a pre-v2 Vinyl file
    /// * `Error::StreamingNotSupported` if the file carries a live stream
    /// * `Error::Compile` if compilation fails and no error handler is set
    pub fn process(&self, input: impl Into<Input>) -> Result<Outcome> {
        let file = match input.into() {
            Input::File(file) => file,
            Input::Legacy(_) => return Err(Error::LegacyFile),
            Input::Foreign(value) => {
                return Err(Error::NotAFile {
                    rendered: value.to_string(),
                    kind: kind_of(&value),
                })
            }
        };

        let source = match &file.contents {
            Contents::Null => {
                debug!("Passing through empty file {}", display_path(file.path.as_deref()));
                return Ok(Outcome::Passthrough(file));
            }
            Contents::Stream(_) => return Err(Error::StreamingNotSupported),
            Contents::Buffer(bytes) => bytes,
        };

        debug!("Compiling {}", display_path(file.path.as_deref()));

        let compiled = std::str::from_utf8(source)
            .map_err(|e| e.to_string())
            .and_then(|text| {
                self.compiler
                    .compile(text, &self.compile_options(&file))
                    .map_err(|e| e.message)
            });

        match compiled {
            Ok(compiled) => {
                let script = file.derive(SCRIPT_EXTENSION, compiled.js);
                let style = compiled
                    .css
                    .filter(|css| self.options.extract_css && !css.is_empty())
                    .map(|css| file.derive(STYLE_EXTENSION, css));
                Ok(Outcome::Emitted { script, style })
            }
            Err(message) => {
                let err = CompileError::new(message, file.path.as_deref());
                match &self.options.on_error {
                    Some(on_error) => {
                        debug!("Compile error handled by caller: {}", err);
                        on_error(&err);
                        Ok(Outcome::Handled)
                    }
                    None => Err(Error::Compile(err)),
                }
            }
        }
    }

    /// Builds the options handed to the compiler for `file`.
    pub fn compile_options(&self, file: &VinylFile) -> CompileOptions {
        let options = CompileOptions {
            filename: file.path.clone(),
            css: if self.options.extract_css {
                CssOutput::External
            } else {
                CssOutput::Injected
            },
            on_warn: self.options.on_warn.clone(),
            extra: self.options.forwarded(),
        };
        trace!("Compiler options: {:?}", options);
        options
    }

    /// Lazily transforms a sequence of pipeline items.
    pub fn stream<I>(&self, inputs: I) -> TransformStream<'_, C, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: Into<Input>,
    {
        TransformStream {
            transformer: self,
            inputs: inputs.into_iter(),
            pending: Vec::new(),
        }
    }
}

fn display_path(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "<unnamed>".to_string())
}

/// Iterator yielding the outputs of each input in delivery order.
///
/// A failing input yields one `Err` item; subsequent inputs are still processed.
pub struct TransformStream<'a, C, I> {
    transformer: &'a FileTransformer<C>,
    inputs: I,
    /// Outputs of the current input, reversed so `pop` yields them in order.
    pending: Vec<VinylFile>,
}

impl<C, I> Iterator for TransformStream<'_, C, I>
where
    C: Compiler,
    I: Iterator,
    I::Item: Into<Input>,
{
    type Item = Result<VinylFile>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(file) = self.pending.pop() {
                return Some(Ok(file));
            }
            let input = self.inputs.next()?;
            match self.transformer.process(input) {
                Ok(outcome) => {
                    self.pending = outcome.into_files();
                    self.pending.reverse();
                }
                Err(err) => return Some(Err(err)),
            }
        }
    }
}
