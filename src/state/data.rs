/// Shared image types for the application state
///
/// These structs represent the images that flow between the picker,
/// the filter pipeline and the display/save layers. Pixels are held behind
/// an `Arc` so handing an image to a background task never copies it.

use image::{imageops, imageops::FilterType, DynamicImage, RgbaImage};
use std::sync::Arc;

/// Longest side of the working copy the interactive preview renders from
pub const WORKING_SIZE: u32 = 1280;

/// The most recently picked raw image
///
/// `scale` is the size of this buffer relative to the picked original:
/// 1.0 for the original itself, less for a downscaled working copy.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    pixels: Arc<RgbaImage>,
    scale: f32,
}

impl SourceImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
            scale: 1.0,
        }
    }

    /// Convert any decoded image into an RGBA source
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self::new(image.into_rgba8())
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Downscale so the longest side is at most `max_side`
    ///
    /// Images that already fit share the same buffer.
    pub fn working_copy(&self, max_side: u32) -> SourceImage {
        let (width, height) = self.pixels.dimensions();
        let longest = width.max(height);
        if max_side == 0 || longest <= max_side {
            return self.clone();
        }

        let ratio = max_side as f32 / longest as f32;
        let new_width = ((width as f32 * ratio).round() as u32).max(1);
        let new_height = ((height as f32 * ratio).round() as u32).max(1);
        let resized = imageops::resize(
            &*self.pixels,
            new_width,
            new_height,
            FilterType::Triangle,
        );

        SourceImage {
            pixels: Arc::new(resized),
            scale: self.scale * ratio,
        }
    }

    /// True when both handles point at the same pixel buffer
    #[cfg(test)]
    pub fn same_buffer(&self, other: &SourceImage) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

/// The output of the last successful filter render
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedImage {
    pixels: Arc<RgbaImage>,
}

impl ProcessedImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Raw RGBA bytes, row-major
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.as_raw().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_working_copy_downscales_long_side() {
        let source = SourceImage::new(RgbaImage::from_pixel(2560, 1000, Rgba([9, 9, 9, 255])));

        let working = source.working_copy(WORKING_SIZE);

        assert_eq!((working.width(), working.height()), (1280, 500));
        assert_eq!(working.scale(), 0.5);
        assert_eq!(source.scale(), 1.0);
        assert_eq!(source.width(), 2560);
    }

    #[test]
    fn test_working_copy_of_small_image_shares_buffer() {
        let source = SourceImage::new(RgbaImage::new(640, 480));

        let working = source.working_copy(WORKING_SIZE);

        assert!(working.same_buffer(&source));
        assert_eq!(working.scale(), 1.0);
    }

    #[test]
    fn test_working_copy_keeps_thin_images_visible() {
        let source = SourceImage::new(RgbaImage::new(3, 5000));

        let working = source.working_copy(WORKING_SIZE);

        assert_eq!(working.height(), 1280);
        assert_eq!(working.width(), 1);
    }
}
