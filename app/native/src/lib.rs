//! Wallswitch - rotates the desktop wallpaper from a folder of images.
//!
//! This library provides both the tray application and CLI functionality.
//! A background worker picks an image from the configured folder on every
//! cycle, checks that it decodes and hands it to the desktop.

pub mod cli;
pub mod config;
pub mod error;
pub mod modules;
pub mod platform;

use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::{SettingsFile, SettingsSource, SettingsStore};
use crate::error::WallswitchError;
use crate::modules::wallpaper::RotationWorker;

/// Log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "wallswitch=info,wallswitch_lib=info";

/// Installs the global `tracing` subscriber writing to stderr.
///
/// Honors `RUST_LOG`; falls back to [`DEFAULT_LOG_FILTER`].
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("wallswitch: warning: failed to initialize logging: {err}");
    }
}

/// Runs the tray application until the user exits it.
///
/// Registers the startup entry unless `startup` is set, starts the rotation
/// worker and hands the thread to the tray menu. On exit the worker is
/// stopped before the icon is removed.
///
/// # Errors
///
/// Returns an error if the worker thread or the tray icon cannot be created.
#[cfg(windows)]
pub fn run_tray(settings_path: PathBuf, startup: bool) -> Result<(), WallswitchError> {
    let store = Arc::new(SettingsStore::open(settings_path));
    let desktop = platform::native();

    if !startup {
        platform::register_autostart_best_effort(desktop.as_ref());
    }

    let source: Arc<dyn SettingsSource> = store.clone();
    let handle = RotationWorker::new(source, desktop).spawn()?;

    let tray = modules::tray::Tray::new(Arc::clone(&store))?;
    tray.run();

    handle.stop();
    drop(tray);
    tracing::info!("wallswitch exited");
    Ok(())
}

/// Runs the tray application until the user exits it.
///
/// There is no tray on this platform, so this runs the headless loop instead.
///
/// # Errors
///
/// Returns an error if the worker cannot be started.
#[cfg(not(windows))]
pub fn run_tray(settings_path: PathBuf, _startup: bool) -> Result<(), WallswitchError> {
    tracing::warn!("the tray is only available on Windows, running headless");
    run_headless(settings_path)
}

/// Runs the rotation loop in the foreground until the process is killed.
///
/// The settings file is re-read every cycle, so `wallswitch settings set`
/// takes effect without a restart.
///
/// # Errors
///
/// Currently infallible; the signature matches [`run_tray`].
#[allow(clippy::unnecessary_wraps)]
pub fn run_headless(settings_path: PathBuf) -> Result<(), WallswitchError> {
    let initial = SettingsStore::open(settings_path.clone());
    if !initial.snapshot().has_valid_directory() {
        tracing::warn!(
            path = %initial.path().display(),
            "no valid wallpaper directory configured, set one with `wallswitch settings set --directory`"
        );
    }

    let source: Arc<dyn SettingsSource> = Arc::new(SettingsFile::new(settings_path));
    RotationWorker::new(source, platform::native()).run();
    Ok(())
}
