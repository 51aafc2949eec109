//! Settings types for Wallswitch.
//!
//! The settings file is a flat JSON object with the keys `directory`,
//! `interval`, `order` and `display_mode`. Labels are kept compatible with
//! the files written by earlier releases ("Ascending Order", "Fill Screen", ...).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::platform::path::expand;

/// Shortest allowed rotation interval, in seconds.
pub const MIN_INTERVAL_SECS: u64 = 10;

/// Longest allowed rotation interval (24 hours), in seconds.
pub const MAX_INTERVAL_SECS: u64 = 86_400;

/// Interval used when no settings file exists.
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Intervals offered in the tray menu, shortest first.
pub const INTERVAL_PRESETS: [(u64, &str); 6] = [
    (10, "10 seconds"),
    (60, "1 minute"),
    (300, "5 minutes"),
    (900, "15 minutes"),
    (3_600, "1 hour"),
    (86_400, "24 hours"),
];

/// Order in which images are picked from the wallpaper directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ImageOrder {
    /// Uniform random pick every cycle.
    #[default]
    Random,
    /// Lexicographically first file name.
    Ascending,
    /// Lexicographically last file name.
    Descending,
}

impl ImageOrder {
    /// All orders, in menu order.
    pub const ALL: [Self; 3] = [Self::Random, Self::Ascending, Self::Descending];

    /// Label written to the settings file.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Random => "Random",
            Self::Ascending => "Ascending Order",
            Self::Descending => "Descending Order",
        }
    }

    /// Parses a label, falling back to [`ImageOrder::Random`] for unknown values.
    #[must_use]
    pub fn from_label_lossy(label: &str) -> Self {
        label.parse().unwrap_or_else(|_| {
            tracing::warn!(order = label, "unknown image order, falling back to random");
            Self::Random
        })
    }
}

impl FromStr for ImageOrder {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "ascending order" | "ascending" | "asc" => Ok(Self::Ascending),
            "descending order" | "descending" | "desc" => Ok(Self::Descending),
            _ => Err(SettingsError::UnknownOrder(s.to_string())),
        }
    }
}

impl fmt::Display for ImageOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

impl Serialize for ImageOrder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ImageOrder {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label_lossy(&label))
    }
}

/// How the wallpaper image is scaled to the screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    /// Scale to cover the screen, cropping the overflow.
    #[default]
    Fill,
    /// Scale to fit inside the screen, letterboxing the rest.
    Fit,
    /// Stretch to the screen size, ignoring aspect ratio.
    Stretch,
    /// Center the image at its native size.
    Center,
}

impl DisplayMode {
    /// All display modes, in menu order.
    pub const ALL: [Self; 4] = [Self::Fill, Self::Fit, Self::Stretch, Self::Center];

    /// Label written to the settings file.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fill => "Fill Screen",
            Self::Fit => "Fit Screen",
            Self::Stretch => "Stretch",
            Self::Center => "Center",
        }
    }

    /// Parses a label, falling back to [`DisplayMode::Fill`] for unknown values.
    #[must_use]
    pub fn from_label_lossy(label: &str) -> Self {
        label.parse().unwrap_or_else(|_| {
            tracing::warn!(display_mode = label, "unknown display mode, falling back to fill");
            Self::Fill
        })
    }
}

impl FromStr for DisplayMode {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fill screen" | "fill" => Ok(Self::Fill),
            "fit screen" | "fit" => Ok(Self::Fit),
            "stretch" => Ok(Self::Stretch),
            "center" | "centre" => Ok(Self::Center),
            _ => Err(SettingsError::UnknownDisplayMode(s.to_string())),
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

impl Serialize for DisplayMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for DisplayMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label_lossy(&label))
    }
}

/// User settings persisted between runs.
///
/// Missing keys take their default value, so a partially written file still
/// loads. A key holding the wrong kind of value falls back on its own and
/// leaves the other keys intact. Only explicit user actions modify this
/// record; the rotation worker reads immutable snapshots of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory containing the wallpaper images. Empty means unset.
    /// Supports `~` for the home directory.
    #[serde(deserialize_with = "lenient")]
    pub directory: String,

    /// Seconds between wallpaper changes, within
    /// [`MIN_INTERVAL_SECS`]..=[`MAX_INTERVAL_SECS`].
    #[serde(deserialize_with = "lenient_interval")]
    pub interval: u64,

    /// Order in which images are picked.
    #[serde(deserialize_with = "lenient")]
    pub order: ImageOrder,

    /// How the image is scaled to the screen.
    #[serde(deserialize_with = "lenient")]
    pub display_mode: DisplayMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            directory: String::new(),
            interval: DEFAULT_INTERVAL_SECS,
            order: ImageOrder::default(),
            display_mode: DisplayMode::default(),
        }
    }
}

impl Settings {
    /// Returns the expanded wallpaper directory, or `None` when unset.
    #[must_use]
    pub fn directory_path(&self) -> Option<PathBuf> {
        if self.directory.trim().is_empty() {
            return None;
        }
        Some(expand(&self.directory))
    }

    /// Returns whether the directory is set and exists on disk.
    #[must_use]
    pub fn has_valid_directory(&self) -> bool {
        self.directory_path().is_some_and(|dir| dir.is_dir())
    }

    /// Returns the rotation interval as a [`Duration`], clamped to the allowed range.
    #[must_use]
    pub fn interval_duration(&self) -> Duration { Duration::from_secs(clamp_interval(self.interval)) }

    /// Returns a copy with the interval clamped to the allowed range.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let clamped = clamp_interval(self.interval);
        if clamped != self.interval {
            tracing::warn!(
                interval = self.interval,
                clamped,
                "settings interval out of range, clamping"
            );
            self.interval = clamped;
        }
        self
    }
}

/// Reads one settings value, using the type's default when it does not fit.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(&value).unwrap_or_else(|err| {
        tracing::warn!(value = %value, error = %err, "invalid settings value, using default");
        T::default()
    }))
}

/// Reads the interval. Negative numbers become the minimum; anything that is
/// not an integer becomes the default.
fn lenient_interval<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    if let Some(secs) = value.as_u64() {
        return Ok(secs);
    }
    if value.is_i64() {
        tracing::warn!(interval = %value, clamped = MIN_INTERVAL_SECS, "negative settings interval, clamping");
        return Ok(MIN_INTERVAL_SECS);
    }
    tracing::warn!(interval = %value, "invalid settings interval, using default");
    Ok(DEFAULT_INTERVAL_SECS)
}

/// Clamps an interval to [`MIN_INTERVAL_SECS`]..=[`MAX_INTERVAL_SECS`].
#[must_use]
pub const fn clamp_interval(secs: u64) -> u64 {
    if secs < MIN_INTERVAL_SECS {
        MIN_INTERVAL_SECS
    } else if secs > MAX_INTERVAL_SECS {
        MAX_INTERVAL_SECS
    } else {
        secs
    }
}

/// Errors raised while reading, validating or writing settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read or written.
    #[error("Failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The settings file does not contain a valid settings object.
    #[error("Settings file {path} is corrupted: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The settings could not be serialized.
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The configured directory does not exist or is not a directory.
    #[error("Invalid wallpaper directory: {0}")]
    InvalidDirectory(String),
    /// The interval is outside the allowed range.
    #[error("Interval must be between 10 and 86400 seconds, got {0}")]
    InvalidInterval(u64),
    /// The order label is not recognized.
    #[error("Unknown image order: {0}")]
    UnknownOrder(String),
    /// The display mode label is not recognized.
    #[error("Unknown display mode: {0}")]
    UnknownDisplayMode(String),
}

impl SettingsError {
    /// Returns whether the settings file does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Returns the default settings file location.
///
/// Uses `<config dir>/wallswitch/settings.json`, falling back to
/// `settings.json` in the working directory when no config dir is known.
#[must_use]
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir().map_or_else(
        || PathBuf::from("settings.json"),
        |dir| dir.join("wallswitch").join("settings.json"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // ImageOrder tests
    // ========================================================================

    #[test]
    fn test_image_order_parses_file_labels() {
        assert_eq!("Random".parse::<ImageOrder>().unwrap(), ImageOrder::Random);
        assert_eq!("Ascending Order".parse::<ImageOrder>().unwrap(), ImageOrder::Ascending);
        assert_eq!("Descending Order".parse::<ImageOrder>().unwrap(), ImageOrder::Descending);
    }

    #[test]
    fn test_image_order_parses_short_names_case_insensitive() {
        assert_eq!("ASC".parse::<ImageOrder>().unwrap(), ImageOrder::Ascending);
        assert_eq!(" descending ".parse::<ImageOrder>().unwrap(), ImageOrder::Descending);
    }

    #[test]
    fn test_image_order_unknown_label_is_error_when_strict() {
        let err = "Foo".parse::<ImageOrder>().unwrap_err();
        assert!(matches!(err, SettingsError::UnknownOrder(ref s) if s == "Foo"));
    }

    #[test]
    fn test_image_order_unknown_label_falls_back_to_random() {
        assert_eq!(ImageOrder::from_label_lossy("Foo"), ImageOrder::Random);
    }

    #[test]
    fn test_image_order_labels_round_trip() {
        for order in ImageOrder::ALL {
            assert_eq!(order.label().parse::<ImageOrder>().unwrap(), order);
        }
    }

    // ========================================================================
    // DisplayMode tests
    // ========================================================================

    #[test]
    fn test_display_mode_parses_file_labels() {
        assert_eq!("Fill Screen".parse::<DisplayMode>().unwrap(), DisplayMode::Fill);
        assert_eq!("Fit Screen".parse::<DisplayMode>().unwrap(), DisplayMode::Fit);
        assert_eq!("Stretch".parse::<DisplayMode>().unwrap(), DisplayMode::Stretch);
        assert_eq!("center".parse::<DisplayMode>().unwrap(), DisplayMode::Center);
    }

    #[test]
    fn test_display_mode_unknown_label_falls_back_to_fill() {
        assert_eq!(DisplayMode::from_label_lossy("Tile"), DisplayMode::Fill);
    }

    #[test]
    fn test_display_mode_display_uses_label() {
        assert_eq!(DisplayMode::Fit.to_string(), "Fit Screen");
    }

    // ========================================================================
    // Settings tests
    // ========================================================================

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert!(settings.directory.is_empty());
        assert_eq!(settings.interval, 60);
        assert_eq!(settings.order, ImageOrder::Random);
        assert_eq!(settings.display_mode, DisplayMode::Fill);
    }

    #[test]
    fn test_settings_serializes_with_file_keys_and_labels() {
        let settings = Settings {
            directory: "C:/Wallpapers".to_string(),
            interval: 300,
            order: ImageOrder::Descending,
            display_mode: DisplayMode::Center,
        };
        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["directory"], "C:/Wallpapers");
        assert_eq!(value["interval"], 300);
        assert_eq!(value["order"], "Descending Order");
        assert_eq!(value["display_mode"], "Center");
    }

    #[test]
    fn test_settings_missing_keys_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"interval": 120}"#).unwrap();
        assert_eq!(settings.interval, 120);
        assert!(settings.directory.is_empty());
        assert_eq!(settings.order, ImageOrder::Random);
    }

    #[test]
    fn test_settings_unknown_order_deserializes_as_random() {
        let settings: Settings = serde_json::from_str(r#"{"order": "Foo"}"#).unwrap();
        assert_eq!(settings.order, ImageOrder::Random);
    }

    #[test]
    fn test_settings_wrong_type_keeps_other_fields() {
        let settings: Settings = serde_json::from_str(
            r#"{"directory": "C:/Walls", "interval": "soon", "order": 3, "display_mode": "Center"}"#,
        )
        .unwrap();

        assert_eq!(settings.directory, "C:/Walls");
        assert_eq!(settings.interval, DEFAULT_INTERVAL_SECS);
        assert_eq!(settings.order, ImageOrder::Random);
        assert_eq!(settings.display_mode, DisplayMode::Center);
    }

    #[test]
    fn test_settings_negative_interval_clamps_to_minimum() {
        let settings: Settings = serde_json::from_str(
            r#"{"directory": "C:/Walls", "interval": -5, "order": "Ascending Order"}"#,
        )
        .unwrap();

        assert_eq!(settings.directory, "C:/Walls");
        assert_eq!(settings.interval, MIN_INTERVAL_SECS);
        assert_eq!(settings.order, ImageOrder::Ascending);
    }

    #[test]
    fn test_settings_null_directory_is_unset() {
        let settings: Settings =
            serde_json::from_str(r#"{"directory": null, "interval": 90.5}"#).unwrap();
        assert!(settings.directory.is_empty());
        assert_eq!(settings.interval, DEFAULT_INTERVAL_SECS);
    }

    #[test]
    fn test_interval_presets_are_sorted_and_in_range() {
        for window in INTERVAL_PRESETS.windows(2) {
            assert!(window[0].0 < window[1].0);
        }
        for (secs, label) in INTERVAL_PRESETS {
            assert_eq!(clamp_interval(secs), secs, "{label} is out of range");
        }
        assert!(INTERVAL_PRESETS.iter().any(|(secs, _)| *secs == DEFAULT_INTERVAL_SECS));
    }

    #[test]
    fn test_settings_normalized_clamps_interval() {
        let low = Settings { interval: 1, ..Default::default() }.normalized();
        assert_eq!(low.interval, MIN_INTERVAL_SECS);

        let high = Settings { interval: 1_000_000, ..Default::default() }.normalized();
        assert_eq!(high.interval, MAX_INTERVAL_SECS);

        let ok = Settings { interval: 42, ..Default::default() }.normalized();
        assert_eq!(ok.interval, 42);
    }

    #[test]
    fn test_settings_interval_duration_is_clamped() {
        let settings = Settings { interval: 0, ..Default::default() };
        assert_eq!(settings.interval_duration(), Duration::from_secs(MIN_INTERVAL_SECS));
    }

    #[test]
    fn test_settings_directory_path_unset() {
        let settings = Settings { directory: "   ".to_string(), ..Default::default() };
        assert!(settings.directory_path().is_none());
        assert!(!settings.has_valid_directory());
    }

    #[test]
    fn test_settings_has_valid_directory() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            directory: dir.path().display().to_string(),
            ..Default::default()
        };
        assert!(settings.has_valid_directory());
    }

    #[test]
    fn test_default_settings_path_file_name() {
        let path = default_settings_path();
        assert!(path.ends_with("settings.json"));
    }

    #[test]
    fn test_settings_error_display_invalid_interval() {
        let err = SettingsError::InvalidInterval(5);
        let msg = err.to_string();
        assert!(msg.contains("between 10 and 86400"));
        assert!(msg.contains('5'));
    }

    #[test]
    fn test_settings_error_is_not_found() {
        let missing = SettingsError::Io {
            path: PathBuf::from("settings.json"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(missing.is_not_found());

        let denied = SettingsError::Io {
            path: PathBuf::from("settings.json"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(!denied.is_not_found());
        assert!(!SettingsError::InvalidInterval(1).is_not_found());
    }
}
