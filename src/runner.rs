//! Drivers behind the binary: assemble the transformer from command-line
//! arguments and pump files from a producer into a sink.

use serde_json::json;
use std::io::{BufRead, Write};
use std::path::Path;

use crate::cli::Args;
use crate::compiler::Compiler;
use crate::config::{find_config, load_config};
use crate::error::Result;
use crate::file::VinylFile;
use crate::input::{self, Input};
use crate::minijinja_compiler::MiniJinjaCompiler;
use crate::transformer::FileTransformer;
use crate::writer::write_file;
use crate::Options;

/// Collects the options arguments: one per `--config` occurrence, or the
/// configuration file found in `dir` when none is given. `--extract-css`
/// is merged into the first one.
pub fn options_args(args: &Args, dir: &Path) -> Result<Vec<Options>> {
    let mut options: Vec<Options> = if args.config.is_empty() {
        find_config(dir).map(load_config).transpose()?.into_iter().collect()
    } else {
        args.config.iter().map(load_config).collect::<Result<Vec<_>>>()?
    };
    if args.extract_css {
        match options.first_mut() {
            Some(first) => first.extract_css = true,
            None => options.push(Options::new().extract_css(true)),
        }
    }
    Ok(options)
}

/// Builds the transformer the binary runs, logging compiler warnings.
///
/// # Errors
/// * `Error::Usage` if `--config` was given more than once
pub fn build_transformer(args: &Args, dir: &Path) -> Result<FileTransformer<MiniJinjaCompiler>> {
    let options = options_args(args, dir)?
        .into_iter()
        .map(|o| o.on_warn(|w| log::warn!("{} ({})", w.message, w.code)))
        .collect();
    FileTransformer::from_args(MiniJinjaCompiler::new(), options)
}

/// Compiles `files` into `out_dir`, reporting written paths to `report` and
/// failures to `errors`. Returns whether every file succeeded.
pub fn run_files<C, O, E>(
    transformer: &FileTransformer<C>,
    files: Vec<VinylFile>,
    out_dir: &Path,
    bail: bool,
    report: &mut O,
    errors: &mut E,
) -> Result<bool>
where
    C: Compiler,
    O: Write,
    E: Write,
{
    let mut ok = true;
    for result in transformer.stream(files) {
        match result {
            Ok(file) => {
                let target = write_file(&file, out_dir)?;
                writeln!(report, "Compiled: '{}'", target.display())?;
            }
            Err(err) => {
                writeln!(errors, "{err}")?;
                ok = false;
                if bail {
                    break;
                }
            }
        }
    }
    Ok(ok)
}

/// JSON-lines mode: one Vinyl object per input line, one output object or
/// `{"error": ...}` record per output line.
///
/// Lines are processed as they are read. A line that is not JSON yields an
/// error record like any other failing item.
pub fn run_json<C, R, W>(
    transformer: &FileTransformer<C>,
    reader: R,
    writer: &mut W,
    bail: bool,
) -> Result<bool>
where
    C: Compiler,
    R: BufRead,
    W: Write,
{
    let mut ok = true;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match Input::from_json_str(&line).and_then(|item| transformer.process(item)) {
            Ok(outcome) => {
                for file in outcome.into_files() {
                    writeln!(writer, "{}", input::to_json(&file))?;
                }
            }
            Err(err) => {
                ok = false;
                writeln!(writer, "{}", json!({ "error": err.to_record() }))?;
                if bail {
                    break;
                }
            }
        }
    }
    Ok(ok)
}
