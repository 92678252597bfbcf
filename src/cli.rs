//! Command-line interface implementation for vinyl-component.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for vinyl-component.
#[derive(Parser, Debug)]
#[command(author, version, about = "vinyl-component: compile component templates into JS and CSS", long_about = None)]
pub struct Args {
    /// Component files or directories to compile
    #[arg(value_name = "INPUTS", required_unless_present = "json")]
    pub inputs: Vec<PathBuf>,

    /// Directory where compiled files are written
    #[arg(short, long, value_name = "OUT_DIR", default_value = "dist")]
    pub out_dir: PathBuf,

    /// Options file (JSON or YAML). Accepted at most once.
    #[arg(short, long, value_name = "FILE")]
    pub config: Vec<PathBuf>,

    /// Emit component styles as separate .css files
    #[arg(long)]
    pub extract_css: bool,

    /// Glob patterns selecting files inside input directories
    #[arg(short, long, value_name = "GLOB", default_values_t = [String::from("**/*.html")])]
    pub glob: Vec<String>,

    /// Read Vinyl objects as JSON lines from stdin and write results to stdout
    #[arg(long)]
    pub json: bool,

    /// Stop at the first failing file
    #[arg(long)]
    pub bail: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                if let Err(err) = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help()
                {
                    eprintln!("{err}");
                }
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
