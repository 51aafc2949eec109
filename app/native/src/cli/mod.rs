//! CLI module for Wallswitch.
//!
//! The binary doubles as a small command-line tool. Without a subcommand it
//! starts the tray app; the other commands inspect and change the settings
//! file or run the rotation once or in the foreground.

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;

use crate::error::WallswitchError;

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), WallswitchError> {
    let cli = Cli::parse();
    cli.execute()
}
