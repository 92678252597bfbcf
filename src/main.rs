//! vinyl-component's main application entry point.
//! Wires a producer (files on disk or JSON lines on stdin) through the
//! transformer into a sink (an output directory or JSON lines on stdout).

use std::io;
use std::path::Path;

use anyhow::Context;
use vinyl_component::{
    cli::{get_args, Args},
    error::{default_error_handler, Error},
    loader::{build_globset, collect_inputs},
    runner::{build_transformer, run_files, run_json},
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Trace
        } else {
            log::LevelFilter::Off
        })
        .init();

    match run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => match err.downcast::<Error>() {
            Ok(err) => default_error_handler(err),
            Err(err) => {
                eprintln!("{err:#}");
                std::process::exit(1);
            }
        },
    }
}

/// Runs the pipeline. Returns whether every file succeeded.
fn run(args: Args) -> anyhow::Result<bool> {
    let transformer = build_transformer(&args, Path::new("."))?;

    if args.json {
        let ok = run_json(&transformer, io::stdin().lock(), &mut io::stdout().lock(), args.bail)
            .context("JSON-lines pipeline failed")?;
        return Ok(ok);
    }

    let globs = build_globset(&args.glob)?;
    let files = collect_inputs(&args.inputs, &globs).context("failed to read inputs")?;
    let ok = run_files(
        &transformer,
        files,
        &args.out_dir,
        args.bail,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )
    .with_context(|| format!("failed to write into {}", args.out_dir.display()))?;
    Ok(ok)
}
