//! Error types for Wallswitch.
//!
//! Each layer keeps its own error type. Desktop and image failures end a
//! single rotation cycle and are only logged; [`SettingsError`] reaches the
//! user through [`WallswitchError`], the error of the CLI commands and the
//! tray app.

use thiserror::Error;

use crate::config::SettingsError;

/// Errors reported to the user by CLI commands and the tray app.
#[derive(Debug, Error)]
pub enum WallswitchError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// Reading or writing the settings failed.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// Wallpaper rotation failed.
    #[error("Wallpaper error: {0}")]
    Wallpaper(String),
    /// Tray surface error.
    #[error("Tray error: {0}")]
    Tray(String),
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_arguments_display() {
        let err = WallswitchError::InvalidArguments("Nothing to change".to_string());
        assert_eq!(err.to_string(), "Nothing to change");
    }

    #[test]
    fn test_settings_error_is_transparent() {
        let err: WallswitchError = SettingsError::InvalidInterval(5).into();
        assert_eq!(err.to_string(), SettingsError::InvalidInterval(5).to_string());
        assert!(matches!(err, WallswitchError::Settings(_)));
    }

    #[test]
    fn test_settings_io_error_names_file() {
        let err: WallswitchError = SettingsError::Io {
            path: std::path::PathBuf::from("settings.json"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        }
        .into();
        assert!(err.to_string().contains("settings.json"));
    }

    #[test]
    fn test_wallpaper_error_display() {
        let err = WallswitchError::Wallpaper("No images found".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Wallpaper error"));
        assert!(msg.contains("No images found"));
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        let err: WallswitchError = io_err.into();
        assert!(matches!(err, WallswitchError::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_error_is_debug() {
        let err = WallswitchError::Tray("icon".to_string());
        assert!(format!("{err:?}").contains("Tray"));
    }
}
