/// User settings
///
/// Starting filter, starting intensity and where saved photos go.
/// Stored as JSON in the user's config directory:
/// - Linux: ~/.config/insta-filter/settings.json
/// - macOS: ~/Library/Application Support/insta-filter/settings.json
/// - Windows: %APPDATA%\insta-filter\settings.json

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::pipeline::DEFAULT_INTENSITY;
use crate::error::SettingsError;
use crate::filter::FilterKind;

/// Name of the folder created inside the pictures directory
const LIBRARY_FOLDER: &str = "InstaFilter";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Filter selected when the app starts
    pub default_filter: FilterKind,

    /// Slider position when the app starts (0.0 to 1.0)
    pub default_intensity: f32,

    /// Where saved photos are written
    /// - None = `<Pictures>/InstaFilter`
    pub output_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_filter: FilterKind::default(),
            default_intensity: DEFAULT_INTENSITY,
            output_dir: None,
        }
    }
}

impl Settings {
    /// Convert to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from a JSON string, clamping the intensity into range
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.default_intensity = if settings.default_intensity.is_finite() {
            settings.default_intensity.clamp(0.0, 1.0)
        } else {
            DEFAULT_INTENSITY
        };
        Ok(settings)
    }

    /// Path of the settings file
    pub fn path() -> Result<PathBuf, SettingsError> {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or(SettingsError::NoConfigDir)?;

        path.push("insta-filter");
        path.push("settings.json");
        Ok(path)
    }

    /// Read settings from `path`; a missing file gives the defaults
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        match fs::read_to_string(path) {
            Ok(json) => Ok(Self::from_json(&json)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Load from the standard location, falling back to defaults on error
    ///
    /// On first run the defaults are written out so the file can be edited.
    pub fn load_or_default() -> Self {
        let loaded = Self::path().and_then(|path| {
            if !path.exists() {
                let defaults = Self::default();
                defaults.save_to(&path)?;
                info!("📁 Wrote default settings to {}", path.display());
                return Ok(defaults);
            }
            let settings = Self::load_from(&path)?;
            info!("📁 Settings loaded from {}", path.display());
            Ok(settings)
        });

        loaded.unwrap_or_else(|e| {
            warn!("⚠️  Using default settings: {}", e);
            Self::default()
        })
    }

    /// Write settings to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Directory saved photos go to
    ///
    /// Without a pictures or home directory this is a folder relative to
    /// the working directory.
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| {
            dirs::picture_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_default()
                .join(LIBRARY_FOLDER)
        })
    }
}
