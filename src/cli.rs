//! Command-line interface implementation for postgen.
//! Provides argument parsing and help text formatting using clap.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments structure for postgen.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "postgen: remove generated files that do not apply to the chosen template options",
    long_about = None
)]
pub struct Args {
    /// Paths to remove, relative to the output directory.
    /// These are processed before the paths derived from cleanup rules.
    #[arg(value_name = "PATHS")]
    pub paths: Vec<String>,

    /// Print a line for every removed file or directory
    #[arg(short, long)]
    pub verbose: bool,

    /// Read the hook payload (template_dir, output_dir, context) as JSON from stdin
    #[arg(short, long)]
    pub stdin: bool,

    /// Directory that relative paths are resolved against.
    /// Defaults to the payload's output_dir, then to the current directory.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Cleanup rules file (JSON or YAML).
    /// Defaults to cleanup.{json,yml,yaml} in the template's hooks/ directory or root.
    #[arg(short, long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Refuse to remove or rename anything outside the output directory
    #[arg(long)]
    pub contain: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With clap's default error handling for argument errors
pub fn get_args() -> Args {
    Args::parse()
}
