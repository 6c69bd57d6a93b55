/// Image picker
///
/// Shows the native file dialog and decodes the chosen file into a
/// `SourceImage`. Decoding is CPU-bound, so it runs on the blocking pool.

use log::{info, warn};
use rfd::AsyncFileDialog;
use tokio::task;

use crate::error::PickError;
use crate::state::data::SourceImage;

/// File extensions offered in the dialog
pub const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff"];

/// Result of a single pick request
#[derive(Debug, Clone)]
pub enum PickOutcome {
    /// The user chose a file and it decoded
    Picked(SourceImage),
    /// The dialog was dismissed
    Cancelled,
    /// The chosen file could not be read as an image
    Failed(String),
}

/// Ask the user for a photo
pub async fn pick_image() -> PickOutcome {
    let file = AsyncFileDialog::new()
        .set_title("Select a picture")
        .add_filter("Images", &IMAGE_EXTENSIONS)
        .pick_file()
        .await;

    let Some(file) = file else {
        info!("Image picker cancelled");
        return PickOutcome::Cancelled;
    };

    info!("📷 Picked {}", file.file_name());
    let bytes = file.read().await;

    match decode(bytes).await {
        Ok(image) => PickOutcome::Picked(image),
        Err(e) => {
            warn!("⚠️  Could not load {}: {}", file.file_name(), e);
            PickOutcome::Failed(e.to_string())
        }
    }
}

/// Decode encoded image bytes into a source image
pub async fn decode(bytes: Vec<u8>) -> Result<SourceImage, PickError> {
    let image = task::spawn_blocking(move || image::load_from_memory(&bytes)).await??;
    Ok(SourceImage::from_dynamic(image))
}
