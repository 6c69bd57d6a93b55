/// Error types for the application
///
/// Each concern gets its own enum. The UI turns any of them into an
/// `Alert` through their `Display` text.

use std::path::PathBuf;
use thiserror::Error;

/// Saving could not start
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    #[error("Select an image to save!")]
    NoImage,
}

/// Writing an image to the photo library failed
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Failed to create {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A picked file could not be turned into a source image
#[derive(Error, Debug)]
pub enum PickError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Settings could not be loaded or stored
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Could not determine a config directory")]
    NoConfigDir,
    #[error("Settings I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
}
