//! Settings module for Wallswitch.
//!
//! This module provides the settings types, loading and saving of the
//! settings file, and the [`SettingsSource`] implementations that hand
//! immutable snapshots to the rotation worker.
//!
//! A missing or corrupted settings file is never fatal: [`load`] logs the
//! problem and returns the default settings.

pub mod types;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;

pub use types::{
    DEFAULT_INTERVAL_SECS, DisplayMode, INTERVAL_PRESETS, ImageOrder, MAX_INTERVAL_SECS,
    MIN_INTERVAL_SECS, Settings, SettingsError, clamp_interval, default_settings_path,
};

/// Indentation used when writing the settings file.
const SETTINGS_INDENT: &[u8] = b"    ";

/// Reads and parses the settings file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not contain a valid
/// settings object.
pub fn try_load(path: &Path) -> Result<Settings, SettingsError> {
    let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let settings: Settings = serde_json::from_str(&content).map_err(|source| {
        SettingsError::Parse { path: path.to_path_buf(), source }
    })?;

    Ok(settings.normalized())
}

/// Loads the settings file, falling back to defaults.
///
/// A missing file is expected on first run and is logged at debug level;
/// any other failure is logged as a warning.
#[must_use]
pub fn load(path: &Path) -> Settings {
    load_or_report(path).0
}

/// Loads the settings file like [`load`], also returning the error that made
/// it fall back to defaults. A missing file is not reported.
fn load_or_report(path: &Path) -> (Settings, Option<SettingsError>) {
    match try_load(path) {
        Ok(settings) => (settings, None),
        Err(err) if err.is_not_found() => {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            (Settings::default(), None)
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to load settings, using defaults");
            (Settings::default(), Some(err))
        }
    }
}

/// Writes the settings file with 4-space indentation.
///
/// Creates the parent directory if needed.
///
/// # Errors
///
/// Returns an error if the settings cannot be serialized or written.
pub fn save(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    let io_err = |source| SettingsError::Io { path: path.to_path_buf(), source };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(SETTINGS_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    settings.serialize(&mut serializer)?;
    buffer.push(b'\n');

    fs::write(path, buffer).map_err(io_err)?;
    tracing::debug!(path = %path.display(), "settings saved");
    Ok(())
}

/// Read-only access to the current settings.
///
/// The rotation worker calls [`SettingsSource::snapshot`] once at the start of
/// every cycle and never holds on to it afterwards.
pub trait SettingsSource: Send + Sync {
    /// Returns the current settings.
    fn snapshot(&self) -> Arc<Settings>;
}

impl SettingsSource for Settings {
    fn snapshot(&self) -> Arc<Settings> { Arc::new(self.clone()) }
}

/// Modification time and length of the settings file.
type FileStamp = (SystemTime, u64);

fn file_stamp(path: &Path) -> Option<FileStamp> {
    let metadata = fs::metadata(path).ok()?;
    Some((metadata.modified().ok()?, metadata.len()))
}

/// Owns the settings file and the current in-memory settings.
///
/// Saves replace the whole record at once, so a reader either sees the old
/// settings or the new ones, never a mix of both. Writes made to the file by
/// another process (`wallswitch settings set`) are picked up by the next
/// [`SettingsSource::snapshot`] and are never overwritten by [`SettingsStore::update`].
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    current: RwLock<Arc<Settings>>,
    stamp: Mutex<Option<FileStamp>>,
    load_error: Option<String>,
}

impl SettingsStore {
    /// Opens the store, loading the settings file or falling back to defaults.
    #[must_use]
    pub fn open(path: PathBuf) -> Self {
        let stamp = file_stamp(&path);
        let (settings, load_error) = load_or_report(&path);
        tracing::info!(
            path = %path.display(),
            directory = %settings.directory,
            interval = settings.interval,
            order = %settings.order,
            display_mode = %settings.display_mode,
            "settings loaded"
        );
        Self {
            path,
            current: RwLock::new(Arc::new(settings)),
            stamp: Mutex::new(stamp),
            load_error: load_error.map(|err| err.to_string()),
        }
    }

    /// Returns the path of the settings file.
    #[must_use]
    pub fn path(&self) -> &Path { &self.path }

    /// Returns why the settings file could not be used when the store was
    /// opened, if it existed but was unreadable or corrupted.
    #[must_use]
    pub fn load_error(&self) -> Option<&str> { self.load_error.as_deref() }

    /// Persists the settings, then makes them the current snapshot.
    ///
    /// The in-memory settings are left untouched when writing fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be written.
    pub fn save(&self, settings: Settings) -> Result<(), SettingsError> {
        let settings = settings.normalized();
        let mut stamp = self.stamp.lock();
        save(&self.path, &settings)?;
        *self.current.write() = Arc::new(settings);
        *stamp = file_stamp(&self.path);
        Ok(())
    }

    /// Applies `change` to the settings saved on disk and saves the result.
    ///
    /// The file is re-read first so that values written by another process
    /// survive. When it cannot be read the in-memory settings are used.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be written.
    pub fn update<F>(&self, change: F) -> Result<Settings, SettingsError>
    where F: FnOnce(&mut Settings) {
        let mut settings = try_load(&self.path).unwrap_or_else(|err| {
            if !err.is_not_found() {
                tracing::warn!(error = %err, "settings file unreadable, updating current settings");
            }
            (**self.current.read()).clone()
        });
        change(&mut settings);
        self.save(settings.clone())?;
        Ok(settings)
    }

    /// Reloads the file when it changed since the last load or save.
    ///
    /// A file that disappeared or no longer parses keeps the current settings.
    fn refresh(&self) {
        let stamp = file_stamp(&self.path);
        let mut last = self.stamp.lock();
        if *last == stamp {
            return;
        }
        *last = stamp;
        if stamp.is_none() {
            return;
        }

        match try_load(&self.path) {
            Ok(settings) => {
                tracing::info!(
                    directory = %settings.directory,
                    interval = settings.interval,
                    order = %settings.order,
                    display_mode = %settings.display_mode,
                    "settings file changed, reloaded"
                );
                *self.current.write() = Arc::new(settings);
            }
            Err(err) => {
                tracing::warn!(error = %err, "settings file changed but cannot be loaded, keeping current settings");
            }
        }
    }
}

impl SettingsSource for SettingsStore {
    fn snapshot(&self) -> Arc<Settings> {
        self.refresh();
        Arc::clone(&self.current.read())
    }
}

/// Settings source that re-reads the file on every snapshot.
///
/// Used by the headless loop so changes written by other processes apply on
/// the next cycle.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    /// Creates a source reading `path`.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self { Self { path } }
}

impl SettingsSource for SettingsFile {
    fn snapshot(&self) -> Arc<Settings> { Arc::new(load(&self.path)) }
}
