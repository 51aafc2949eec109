//! Platform abstractions for Wallswitch.
//!
//! The rotation worker only talks to the desktop through the
//! [`DesktopEnvironment`] trait:
//!
//! - [`windows`] - registry and `SystemParametersInfoW` implementation
//! - [`unsupported`] - used on every other target; all calls fail
//! - [`path`] - path expansion helpers
//! - [`thread`] - named thread spawning

pub mod path;
pub mod thread;

#[cfg(not(windows))]
pub mod unsupported;
#[cfg(windows)]
pub mod windows;

use std::path::Path;
use std::sync::Arc;

use crate::config::DisplayMode;

/// Name of the auto-run entry and of the application in OS surfaces.
pub const APP_NAME: &str = "wallswitch";

/// Errors returned by [`DesktopEnvironment`] operations.
#[derive(Debug)]
pub enum DesktopError {
    /// The wallpaper file does not exist.
    FileNotFound(String),
    /// The OS refused to set the wallpaper.
    SetWallpaperFailed(String),
    /// Reading or writing a registry value failed.
    Registry(String),
    /// The current executable path could not be determined.
    CurrentExe(String),
    /// The operation is not available on this platform.
    Unsupported(&'static str),
}

impl std::fmt::Display for DesktopError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileNotFound(path) => write!(f, "Wallpaper file not found: {path}"),
            Self::SetWallpaperFailed(msg) => write!(f, "Failed to set wallpaper: {msg}"),
            Self::Registry(msg) => write!(f, "Registry error: {msg}"),
            Self::CurrentExe(msg) => write!(f, "Cannot locate executable: {msg}"),
            Self::Unsupported(op) => write!(f, "{op} is not supported on this platform"),
        }
    }
}

impl std::error::Error for DesktopError {}

/// Desktop capabilities needed by Wallswitch.
///
/// Implementations must be safe to call from the rotation thread.
pub trait DesktopEnvironment: Send + Sync {
    /// Sets the desktop wallpaper to the image at `path` using `mode`.
    ///
    /// The call either applies the image or fails; a failure leaves the
    /// previous wallpaper in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or the OS call fails.
    fn set_wallpaper(&self, path: &Path, mode: DisplayMode) -> Result<(), DesktopError>;

    /// Registers `command` to run when the user logs in.
    ///
    /// # Errors
    ///
    /// Returns an error if the auto-run entry cannot be written.
    fn register_autostart(&self, command: &str) -> Result<(), DesktopError>;
}

/// Returns the `WallpaperStyle` code the Windows desktop uses for `mode`.
#[must_use]
pub const fn style_code(mode: DisplayMode) -> u32 {
    match mode {
        DisplayMode::Fill => 10,
        DisplayMode::Fit => 6,
        DisplayMode::Stretch => 2,
        DisplayMode::Center => 0,
    }
}

/// Returns the desktop implementation for the current target.
#[cfg(windows)]
#[must_use]
pub fn native() -> Arc<dyn DesktopEnvironment> { Arc::new(windows::WindowsDesktop) }

/// Returns the desktop implementation for the current target.
#[cfg(not(windows))]
#[must_use]
pub fn native() -> Arc<dyn DesktopEnvironment> { Arc::new(unsupported::UnsupportedDesktop) }

/// Builds the auto-run command line for the current executable.
///
/// The `--startup` flag stops the launched instance from registering itself again.
///
/// # Errors
///
/// Returns an error if the current executable path is unavailable.
pub fn autostart_command() -> Result<String, DesktopError> {
    let exe = std::env::current_exe().map_err(|e| DesktopError::CurrentExe(e.to_string()))?;
    Ok(format!("\"{}\" tray --startup", exe.display()))
}

/// Registers the auto-run entry, logging instead of failing.
pub fn register_autostart_best_effort(desktop: &dyn DesktopEnvironment) {
    let result = autostart_command().and_then(|command| {
        desktop.register_autostart(&command)?;
        Ok(command)
    });

    match result {
        Ok(command) => tracing::info!(%command, "registered for startup"),
        Err(err) => tracing::warn!(error = %err, "failed to register for startup"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_code_mapping() {
        assert_eq!(style_code(DisplayMode::Fill), 10);
        assert_eq!(style_code(DisplayMode::Fit), 6);
        assert_eq!(style_code(DisplayMode::Stretch), 2);
        assert_eq!(style_code(DisplayMode::Center), 0);
    }

    #[test]
    fn test_style_codes_are_distinct() {
        let mut codes: Vec<u32> = DisplayMode::ALL.iter().map(|m| style_code(*m)).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), DisplayMode::ALL.len());
    }

    #[test]
    fn test_desktop_error_display() {
        let err = DesktopError::FileNotFound("C:/missing.png".to_string());
        assert!(err.to_string().contains("not found"));
        assert!(err.to_string().contains("C:/missing.png"));

        let err = DesktopError::Unsupported("Setting the wallpaper");
        assert_eq!(err.to_string(), "Setting the wallpaper is not supported on this platform");
    }

    #[test]
    fn test_desktop_error_is_error_trait() {
        let err = DesktopError::Registry("access denied".to_string());
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_autostart_command_quotes_exe_and_marks_startup() {
        let command = autostart_command().unwrap();
        assert!(command.starts_with('"'));
        assert!(command.ends_with("\" tray --startup"));
    }

    #[test]
    fn test_native_desktop_is_constructible() {
        let _desktop = native();
    }
}
