//! Helix CLI entry point.

mod cli;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Command};
use helix::config::HelixConfig;
use helix::diagnostics::print_diagnostic;
use helix::discover::discover_sources;
use helix::error::DriverResult;
use helix::pipeline::compile_file;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "HELIX_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(explicit: Option<&PathBuf>, path: &Path) -> DriverResult<HelixConfig> {
    if let Some(file) = explicit {
        return HelixConfig::load(file);
    }
    let dir = if path.is_dir() {
        path
    } else {
        path.parent().unwrap_or_else(|| Path::new("."))
    };
    HelixConfig::discover(dir)
}

/// Returns whether every file compiled without errors.
fn run(cli: &Cli) -> DriverResult<bool> {
    let path = cli.command.path();
    let config = load_config(cli.config.as_ref(), path)?;
    let sources = discover_sources(path)?;

    let mut clean = true;
    for source in &sources {
        let file = compile_file(source, &config)?;
        for diag in &file.result.diagnostics {
            if diag.is_error() || config.transpiler.warnings {
                print_diagnostic(diag, &file.source, &file.path);
            }
        }
        clean &= !file.result.has_errors();

        match &cli.command {
            Command::Check { .. } => {
                tracing::info!(
                    path = %file.path,
                    functions = file.result.functions.len(),
                    diagnostics = file.result.diagnostics.len(),
                    "checked"
                );
            }
            Command::Emit { .. } => {
                if sources.len() > 1 {
                    println!("# {}", file.path);
                }
                let output = file.result.output();
                if !output.is_empty() {
                    println!("{output}\n");
                }
            }
        }
    }

    if matches!(cli.command, Command::Check { .. }) && clean {
        println!("{} file(s) checked, no errors", sources.len());
    }
    Ok(clean)
}
