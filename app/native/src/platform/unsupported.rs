//! Fallback desktop for targets without a wallpaper implementation.
//!
//! Every call fails with [`DesktopError::Unsupported`]; the rotation worker
//! logs the failure and keeps running.

use std::path::Path;

use super::{DesktopEnvironment, DesktopError};
use crate::config::DisplayMode;

/// Desktop that supports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedDesktop;

impl DesktopEnvironment for UnsupportedDesktop {
    fn set_wallpaper(&self, path: &Path, _mode: DisplayMode) -> Result<(), DesktopError> {
        if !path.exists() {
            return Err(DesktopError::FileNotFound(path.display().to_string()));
        }
        Err(DesktopError::Unsupported("Setting the wallpaper"))
    }

    fn register_autostart(&self, _command: &str) -> Result<(), DesktopError> {
        Err(DesktopError::Unsupported("Startup registration"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_wallpaper_missing_file_reports_not_found() {
        let result =
            UnsupportedDesktop.set_wallpaper(Path::new("/nonexistent/wall.png"), DisplayMode::Fill);
        assert!(matches!(result, Err(DesktopError::FileNotFound(_))));
    }

    #[test]
    fn test_set_wallpaper_existing_file_is_unsupported() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let result = UnsupportedDesktop.set_wallpaper(file.path(), DisplayMode::Fit);
        assert!(matches!(result, Err(DesktopError::Unsupported(_))));
    }

    #[test]
    fn test_register_autostart_is_unsupported() {
        let result = UnsupportedDesktop.register_autostart("wallswitch");
        assert!(matches!(result, Err(DesktopError::Unsupported(_))));
    }
}
