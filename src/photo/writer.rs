/// Photo library writer
///
/// Saves processed images as PNG files into the configured output
/// directory (by default `<Pictures>/InstaFilter`).

use chrono::{DateTime, Local};
use image::ImageFormat;
use log::info;
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::task;

use crate::error::WriteError;
use crate::state::data::ProcessedImage;

/// Boxed future returned by the library writer
pub type WriteFuture = Pin<Box<dyn Future<Output = Result<PathBuf, WriteError>> + Send + 'static>>;

/// Something that can persist a processed image
///
/// `write` starts the write and returns a future that completes exactly once
/// with the saved location or the reason it failed.
pub trait ImageWriter {
    type Pending: Future<Output = Result<PathBuf, WriteError>> + Send + 'static;

    fn write(&self, image: ProcessedImage) -> Self::Pending;
}

/// Writes into a directory on disk
#[derive(Debug, Clone)]
pub struct PhotoLibraryWriter {
    output_dir: PathBuf,
}

impl PhotoLibraryWriter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl ImageWriter for PhotoLibraryWriter {
    type Pending = WriteFuture;

    fn write(&self, image: ProcessedImage) -> Self::Pending {
        let dir = self.output_dir.clone();
        Box::pin(async move { task::spawn_blocking(move || write_blocking(&image, &dir)).await? })
    }
}

/// Blocking implementation of the write
fn write_blocking(image: &ProcessedImage, dir: &Path) -> Result<PathBuf, WriteError> {
    fs::create_dir_all(dir).map_err(|source| WriteError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = next_free_path(dir, Local::now());
    image.pixels().save_with_format(&path, ImageFormat::Png)?;

    info!("✅ Saved {}x{} image to {}", image.width(), image.height(), path.display());
    Ok(path)
}

/// Timestamped file name for an image saved at `now`
pub fn file_name(now: DateTime<Local>) -> String {
    format!("InstaFilter_{}.png", now.format("%Y%m%d_%H%M%S_%3f"))
}

/// First path in `dir` for `now` that does not exist yet
fn next_free_path(dir: &Path, now: DateTime<Local>) -> PathBuf {
    let name = file_name(now);
    let mut path = dir.join(&name);

    let stem = name.trim_end_matches(".png");
    let mut n = 1;
    while path.exists() {
        path = dir.join(format!("{}-{}.png", stem, n));
        n += 1;
    }

    path
}
