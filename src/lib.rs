//! vinyl-component compiles component templates flowing through a Vinyl file pipeline.
//! Each incoming file is validated, handed to a [`compiler::Compiler`] and re-emitted
//! as a script file plus an optional extracted style file.

/// Command-line interface module for the vinyl-component binary
pub mod cli;

/// Compiler contract: options, results, warnings and raw errors
pub mod compiler;

/// Options loading from component.config.json / .yml / .yaml
pub mod config;

/// Error types and handling
pub mod error;

/// Vinyl file model
pub mod file;

/// Classification of untyped pipeline objects
pub mod input;

/// Filesystem producer for the binary
pub mod loader;

/// Built-in MiniJinja component compiler
pub mod minijinja_compiler;

/// Transformer options and the arity-checked entry point
pub mod options;

/// Producer-to-sink drivers used by the binary
pub mod runner;

/// Core file transformation
pub mod transformer;

/// Filesystem sink for the binary
pub mod writer;

pub use error::{CompileError, Error, Result};
pub use file::{Contents, VinylFile};
pub use input::Input;
pub use options::Options;
pub use transformer::{FileTransformer, Outcome};
