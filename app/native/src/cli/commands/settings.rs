//! Settings CLI commands.
//!
//! Commands for inspecting and changing the Wallswitch settings file.

use std::path::Path;

use clap::Subcommand;

use crate::cli::output;
use crate::config::{
    self, DisplayMode, ImageOrder, MAX_INTERVAL_SECS, MIN_INTERVAL_SECS, Settings, SettingsError,
};
use crate::error::WallswitchError;

/// Settings management commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum SettingsCommands {
    /// Show the current settings.
    #[command(after_long_help = r#"Examples:
  wallswitch settings show          # Human-readable
  wallswitch settings show --json   # Output as JSON"#)]
    Show {
        /// Output as JSON.
        #[arg(long, short)]
        json: bool,
    },

    /// Change one or more settings.
    ///
    /// Only the given options change; the others keep their saved value.
    #[command(after_long_help = r#"Examples:
  wallswitch settings set --directory "C:\Users\me\Pictures\Walls"
  wallswitch settings set --interval 300 --order ascending
  wallswitch settings set --display-mode "Fit Screen""#)]
    Set {
        /// Folder containing the wallpaper images.
        #[arg(long, short, value_name = "PATH")]
        directory: Option<String>,

        /// Seconds between wallpaper changes (10 to 86400).
        #[arg(
            long,
            short,
            value_name = "SECONDS",
            value_parser = clap::value_parser!(u64).range(MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS)
        )]
        interval: Option<u64>,

        /// Image order: random, ascending or descending.
        #[arg(long, short, value_name = "ORDER")]
        order: Option<ImageOrder>,

        /// Display mode: fill, fit, stretch or center.
        #[arg(long = "display-mode", short = 'm', value_name = "MODE")]
        display_mode: Option<DisplayMode>,
    },

    /// Restore the default settings.
    Reset,

    /// Show the path to the settings file.
    Path,
}

/// Execute settings subcommands.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cmd: &SettingsCommands, path: &Path) -> Result<(), WallswitchError> {
    match cmd {
        SettingsCommands::Show { json } => show(path, *json),
        SettingsCommands::Set { directory, interval, order, display_mode } => {
            let changes = SettingsChanges {
                directory: directory.as_deref(),
                interval: *interval,
                order: *order,
                display_mode: *display_mode,
            };
            set(path, &changes)
        }
        SettingsCommands::Reset => reset(path),
        SettingsCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

/// Fields given to `settings set`.
#[derive(Debug, Default, Clone, Copy)]
struct SettingsChanges<'a> {
    directory: Option<&'a str>,
    interval: Option<u64>,
    order: Option<ImageOrder>,
    display_mode: Option<DisplayMode>,
}

impl SettingsChanges<'_> {
    const fn is_empty(&self) -> bool {
        self.directory.is_none()
            && self.interval.is_none()
            && self.order.is_none()
            && self.display_mode.is_none()
    }

    /// Validates the changes and applies them to `settings`.
    fn apply(&self, settings: &mut Settings) -> Result<(), SettingsError> {
        if let Some(directory) = self.directory {
            let candidate = Settings { directory: directory.trim().to_string(), ..Settings::default() };
            if !candidate.has_valid_directory() {
                return Err(SettingsError::InvalidDirectory(directory.to_string()));
            }
            settings.directory = candidate.directory;
        }

        if let Some(interval) = self.interval {
            if config::clamp_interval(interval) != interval {
                return Err(SettingsError::InvalidInterval(interval));
            }
            settings.interval = interval;
        }

        if let Some(order) = self.order {
            settings.order = order;
        }
        if let Some(display_mode) = self.display_mode {
            settings.display_mode = display_mode;
        }

        Ok(())
    }
}

/// Loads the settings strictly, reporting a corrupted file instead of hiding it.
fn load_reporting(path: &Path) -> Settings {
    match config::try_load(path) {
        Ok(settings) => settings,
        Err(err) if err.is_not_found() => Settings::default(),
        Err(err) => {
            output::print_warning(&format!("{err}; using defaults"));
            Settings::default()
        }
    }
}

fn show(path: &Path, json: bool) -> Result<(), WallswitchError> {
    let settings = load_reporting(path);

    if json {
        let value = serde_json::to_value(&settings).map_err(SettingsError::from)?;
        output::print_json(&value);
    } else {
        output::print_settings(&settings, path);
    }

    Ok(())
}

fn set(path: &Path, changes: &SettingsChanges<'_>) -> Result<(), WallswitchError> {
    if changes.is_empty() {
        return Err(WallswitchError::InvalidArguments(
            "Nothing to change. Pass at least one of --directory, --interval, --order or --display-mode."
                .to_string(),
        ));
    }

    let mut settings = load_reporting(path);
    changes.apply(&mut settings)?;
    config::save(path, &settings)?;

    tracing::info!(path = %path.display(), "settings saved");
    output::print_success("Settings saved");
    output::print_settings(&settings, path);
    Ok(())
}

fn reset(path: &Path) -> Result<(), WallswitchError> {
    let settings = Settings::default();
    config::save(path, &settings)?;
    output::print_success("Settings reset to defaults");
    output::print_settings(&settings, path);
    Ok(())
}
