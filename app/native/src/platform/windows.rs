//! Windows desktop implementation.
//!
//! The wallpaper style lives in `HKCU\Control Panel\Desktop` and must be
//! written before the image is applied, since `SystemParametersInfoW` reads
//! it when it refreshes the desktop.

use std::path::Path;

use winreg::RegKey;
use winreg::enums::{HKEY_CURRENT_USER, KEY_QUERY_VALUE, KEY_SET_VALUE};

use super::path::absolute;
use super::{APP_NAME, DesktopEnvironment, DesktopError, style_code};
use crate::config::DisplayMode;

/// Registry key holding the desktop wallpaper preferences.
const DESKTOP_KEY: &str = r"Control Panel\Desktop";

/// Registry key listing programs started at login.
const RUN_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Run";

/// Desktop backed by the Win32 registry and `SystemParametersInfoW`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsDesktop;

impl WindowsDesktop {
    /// Writes `WallpaperStyle` and disables tiling.
    fn write_style(mode: DisplayMode) -> Result<(), DesktopError> {
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let key = hkcu
            .open_subkey_with_flags(DESKTOP_KEY, KEY_SET_VALUE)
            .map_err(|e| DesktopError::Registry(format!("{DESKTOP_KEY}: {e}")))?;

        key.set_value("WallpaperStyle", &style_code(mode).to_string())
            .map_err(|e| DesktopError::Registry(format!("WallpaperStyle: {e}")))?;
        key.set_value("TileWallpaper", &"0".to_string())
            .map_err(|e| DesktopError::Registry(format!("TileWallpaper: {e}")))?;

        Ok(())
    }
}

impl DesktopEnvironment for WindowsDesktop {
    fn set_wallpaper(&self, path: &Path, mode: DisplayMode) -> Result<(), DesktopError> {
        if !path.exists() {
            return Err(DesktopError::FileNotFound(path.display().to_string()));
        }

        // A missing style still leaves a usable wallpaper, so keep going
        if let Err(err) = Self::write_style(mode) {
            tracing::warn!(error = %err, "failed to write wallpaper style");
        }

        let path = absolute(path);
        let path_str = path.display().to_string();

        wallpaper::set_from_path(&path_str)
            .map_err(|e| DesktopError::SetWallpaperFailed(e.to_string()))
    }

    fn register_autostart(&self, command: &str) -> Result<(), DesktopError> {
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let key = hkcu
            .open_subkey_with_flags(RUN_KEY, KEY_SET_VALUE | KEY_QUERY_VALUE)
            .map_err(|e| DesktopError::Registry(format!("{RUN_KEY}: {e}")))?;

        key.set_value(APP_NAME, &command.to_string())
            .map_err(|e| DesktopError::Registry(format!("{APP_NAME}: {e}")))
    }
}
