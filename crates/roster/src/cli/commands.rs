//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::render::OutputFormat;

/// Shell command arguments.
#[derive(Debug, Args)]
pub struct ShellCommand {
    /// Read commands from this file instead of stdin
    #[arg(short, long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Listing format (defaults to the configured format)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Hide the short id column
    #[arg(long)]
    pub hide_ids: bool,
}

/// Groups command arguments.
#[derive(Debug, Args)]
pub struct GroupsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_command_debug() {
        let cmd = ShellCommand {
            script: Some(PathBuf::from("demo.roster")),
            format: Some(OutputFormat::Json),
            hide_ids: false,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("demo.roster"));
        assert!(debug_str.contains("Json"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }

    #[test]
    fn test_groups_command_debug() {
        let cmd = GroupsCommand { json: true };
        assert!(format!("{cmd:?}").contains("json"));
    }
}
