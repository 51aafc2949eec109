//! CLI command definitions using Clap.
//!
//! This module defines all CLI commands and their arguments, organized into
//! domain-specific submodules:
//!
//! - `rotation` - Running the rotation once or listing its candidates
//! - `settings` - Settings file management commands

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::config::default_settings_path;
use crate::error::WallswitchError;

pub mod rotation;
pub mod settings;

pub use settings::SettingsCommands;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wallswitch CLI - rotates the desktop wallpaper from a folder of images.
#[derive(Parser, Debug)]
#[command(name = "wallswitch")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the settings file.
    ///
    /// Defaults to `wallswitch/settings.json` in the user's config directory.
    #[arg(long, global = true, value_name = "PATH", env = "WALLSWITCH_SETTINGS")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Start the tray application.
    ///
    /// This is the default when no command is given. The first launch
    /// registers Wallswitch to start when you log in.
    Tray {
        /// Launched by the login entry; skips registering it again.
        #[arg(long)]
        startup: bool,
    },

    /// Run the rotation loop in the foreground without a tray icon.
    ///
    /// The settings file is re-read on every cycle. Stop with Ctrl+C.
    Run,

    /// Change the wallpaper once, right now.
    ///
    /// Exits with status 1 when no wallpaper could be applied.
    Next,

    /// List the images that would be picked, in selection order.
    #[command(after_long_help = r#"Examples:
  wallswitch list          # One path per line
  wallswitch list --json   # Output as JSON"#)]
    List {
        /// Output as JSON.
        #[arg(long, short)]
        json: bool,
    },

    /// Settings file management commands.
    ///
    /// Show, change, or reset the settings used by the tray and the rotation.
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Generate shell completions.
    ///
    /// Outputs shell completion script to stdout for the specified shell.
    ///
    /// Usage:
    ///   wallswitch completions --shell powershell >> $PROFILE
    ///   eval "$(wallswitch completions --shell bash)"
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Returns the settings file path, from `--settings`, the environment or
    /// the default location.
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.settings.clone().unwrap_or_else(default_settings_path)
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), WallswitchError> {
        let path = self.settings_path();

        match &self.command {
            None => crate::run_tray(path, false),
            Some(Commands::Tray { startup }) => crate::run_tray(path, *startup),
            Some(Commands::Run) => crate::run_headless(path),
            Some(Commands::Next) => rotation::execute_next(&path),
            Some(Commands::List { json }) => rotation::execute_list(&path, *json),
            Some(Commands::Settings(cmd)) => settings::execute(cmd, &path),
            Some(Commands::Completions { shell }) => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "wallswitch", &mut io::stdout());
    }
}
