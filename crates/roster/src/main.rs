//! `roster` - CLI for the in-memory student roster
//!
//! This binary provides the interactive editing shell and a few helper
//! commands for inspecting groups and configuration.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::fs::File;
use std::io::{self, BufReader, IsTerminal, Write};

use anyhow::Context;
use clap::Parser;

use roster::cli::{Cli, Command, ConfigCommand, GroupsCommand, Shell, ShellCommand};
use roster::{init_logging, Config, Group};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Shell(shell_cmd) => handle_shell(&config, &shell_cmd),
        Command::Groups(groups_cmd) => handle_groups(&groups_cmd),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn handle_shell(config: &Config, cmd: &ShellCommand) -> anyhow::Result<()> {
    let mut shell = Shell::new(config);
    if let Some(format) = cmd.format {
        shell = shell.with_format(format);
    }
    if cmd.hide_ids {
        shell = shell.with_ids(false);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let summary = if let Some(path) = &cmd.script {
        let file = File::open(path)
            .with_context(|| format!("opening script {}", path.display()))?;
        shell.run(BufReader::new(file), &mut out, false)?
    } else {
        let stdin = io::stdin();
        let interactive = stdin.is_terminal();
        if interactive {
            writeln!(
                out,
                "roster {} - type 'help' for commands",
                env!("CARGO_PKG_VERSION")
            )?;
        }
        shell.run(stdin.lock(), &mut out, interactive)?
    };

    if summary.errors > 0 && cmd.script.is_some() {
        anyhow::bail!(
            "{} of {} script commands failed",
            summary.errors,
            summary.commands
        );
    }
    Ok(())
}

fn handle_groups(cmd: &GroupsCommand) -> anyhow::Result<()> {
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&Group::ALL)?);
    } else {
        for group in Group::ALL {
            println!("{group}");
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Notifications]");
                println!("  Capacity:           {}", config.notifications.capacity);
                println!("  Display (seconds):  {}", config.notifications.display_secs);
                println!();
                println!("[Display]");
                println!("  Format:             {:?}", config.display.format);
                println!("  Show ids:           {}", config.display.show_ids);
                println!();
                println!("[Shell]");
                println!("  Prompt:             {:?}", config.shell.prompt);
                println!("  Echo commands:      {}", config.shell.echo_commands);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
