//! Command-line interface for roster.
//!
//! This module provides the CLI structure, the line-oriented shell and its
//! command parser for the `roster` binary.

mod commands;
pub mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, GroupsCommand, ShellCommand};
pub use shell::{Action, Flow, RunSummary, Shell};

use crate::logging::Verbosity;

/// roster - Keep a list of students in memory
///
/// An interactive editor for student records with add, edit and delete,
/// case-insensitive search and group filtering. Nothing is saved: records
/// live only as long as the session.
#[derive(Debug, Parser)]
#[command(name = "roster")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an editing session
    Shell(ShellCommand),

    /// List the available groups
    Groups(GroupsCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            Verbosity::from_occurrences(self.verbose)
        }
    }
}
