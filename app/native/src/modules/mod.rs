//! Application feature modules for Wallswitch.
//!
//! - [`wallpaper`] - image discovery and the background rotation worker
//! - `tray` - system tray icon and menu (Windows only)

#[cfg(windows)]
pub mod tray;
pub mod wallpaper;
