//! Rotation CLI commands.
//!
//! `next` runs a single rotation cycle with the saved settings and `list`
//! shows which images the rotation would pick from.

use std::path::Path;

use crate::cli::output;
use crate::config::{self, Settings, SettingsError};
use crate::error::WallswitchError;
use crate::modules::wallpaper::{CycleOutcome, apply_next, list_candidates};
use crate::platform;

/// Execute the next command.
///
/// # Errors
///
/// Returns an error when no wallpaper was applied.
pub fn execute_next(path: &Path) -> Result<(), WallswitchError> {
    let settings = config::load(path);

    match apply_next(platform::native().as_ref(), &settings) {
        CycleOutcome::Applied(image) => {
            output::print_success(&format!("Wallpaper set to {}", image.display()));
            Ok(())
        }
        outcome => Err(WallswitchError::Wallpaper(describe_failure(&outcome, &settings))),
    }
}

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if the wallpaper directory is unset or unreadable.
pub fn execute_list(path: &Path, json: bool) -> Result<(), WallswitchError> {
    let settings = config::load(path);
    let candidates = list_candidates(&settings)
        .map_err(|_| SettingsError::InvalidDirectory(directory_label(&settings)))?;

    if json {
        let paths: Vec<String> = candidates.iter().map(|p| p.display().to_string()).collect();
        output::print_json(&serde_json::json!(paths));
    } else if candidates.is_empty() {
        output::print_warning(&format!("No images found in {}", directory_label(&settings)));
    } else {
        for candidate in &candidates {
            println!("{}", candidate.display());
        }
    }

    Ok(())
}

fn directory_label(settings: &Settings) -> String {
    if settings.directory.trim().is_empty() {
        "(not set)".to_string()
    } else {
        settings.directory.clone()
    }
}

fn describe_failure(outcome: &CycleOutcome, settings: &Settings) -> String {
    match outcome {
        CycleOutcome::Applied(image) => format!("Wallpaper set to {}", image.display()),
        CycleOutcome::MissingDirectory => format!(
            "Wallpaper directory {} is missing; set one with `wallswitch settings set --directory`",
            directory_label(settings)
        ),
        CycleOutcome::NoImages => format!("No images found in {}", directory_label(settings)),
        CycleOutcome::InvalidImage(image) => {
            format!("Skipped {}: the file is not a valid image", image.display())
        }
        CycleOutcome::ApplyFailed(image) => {
            format!("The desktop refused {}; see the log for details", image.display())
        }
    }
}
