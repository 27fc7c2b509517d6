//! Command-line interface for the Helix transpiler.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "helix")]
#[command(about = "Helix function declaration transpiler", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to `helix.toml` next to the sources)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compile declarations and report diagnostics
    Check {
        /// A `.hlx` file or a directory to search
        path: PathBuf,
    },
    /// Print the emitted declarations
    Emit {
        /// A `.hlx` file or a directory to search
        path: PathBuf,
    },
}

impl Command {
    pub fn path(&self) -> &PathBuf {
        match self {
            Command::Check { path } | Command::Emit { path } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check_with_global_flags() {
        let cli = Cli::try_parse_from(["helix", "check", "src", "-v", "--config", "h.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("h.toml")));
        assert!(matches!(cli.command, Command::Check { .. }));
        assert_eq!(cli.command.path(), &PathBuf::from("src"));
    }

    #[test]
    fn test_emit_requires_path() {
        assert!(Cli::try_parse_from(["helix", "emit"]).is_err());
    }
}
