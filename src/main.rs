use std::path::PathBuf;

use clap::Parser;

mod build;
mod commands;
mod config;
mod diagnostics;

/// Convert a directory of markup documents into a framed HTML site.
///
/// With no arguments, converts `../gridlabd/docs/` into the `docs`
/// directory.
#[derive(Parser)]
#[command(version, about)]
struct BuildArgs {
    /// Directory containing the markup sources
    source: Option<PathBuf>,

    /// Directory the site is written to
    target: Option<PathBuf>,

    /// Base URL written into every page (defaults to the target directory)
    base: Option<String>,

    /// The path to the configuration file
    #[arg(short, long = "config")]
    config_file: Option<PathBuf>,

    /// Report every file converted, copied or skipped
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    /// Silence error messages
    #[arg(short = 'q', long, default_value = "false")]
    silent: bool,

    /// Silence warnings
    #[arg(long, default_value = "false")]
    no_warnings: bool,

    /// Annotate generated HTML with a comment per writer call
    #[arg(long, default_value = "false")]
    trace_comments: bool,
}

fn main() -> Result<(), anyhow::Error> {
    let args = BuildArgs::parse();
    diagnostics::init_logger();

    commands::build::run(&args)
}
