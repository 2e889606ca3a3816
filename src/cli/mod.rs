//! CLI module - Command-line interface for Warden
//!
//! This module provides a structured CLI using clap for argument parsing.

use clap::{Parser, Subcommand};

/// Warden - account registration and bearer-token authentication service
#[derive(Parser)]
#[command(name = "warden")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP API (default)
    #[command(alias = "daemon")]
    Serve,

    /// Create default config file
    Init,
}

impl Cli {
    /// The subcommand to run, `serve` when none was given.
    #[must_use]
    pub fn selected_command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_serve() {
        let cli = Cli::parse_from(["warden"]);
        assert_eq!(cli.selected_command(), &Commands::Serve);
    }

    #[test]
    fn test_parses_subcommands() {
        assert_eq!(Cli::parse_from(["warden", "init"]).selected_command(), &Commands::Init);
        assert_eq!(
            Cli::parse_from(["warden", "daemon"]).selected_command(),
            &Commands::Serve
        );
    }
}
