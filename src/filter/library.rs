/// The production filter library
///
/// Renders every filter on the CPU with `image` and `imageproc`.
/// The source buffer is never touched: each render clones it, runs the
/// effect on the copy and returns the copy as a new `ProcessedImage`.

use log::{debug, warn};

use super::{effects, FilterKind, FilterLibrary, FilterParams, ParamKey};
use crate::state::data::{ProcessedImage, SourceImage};

/// CPU filter library backed by the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageFilterLibrary;

impl ImageFilterLibrary {
    pub fn new() -> Self {
        Self
    }

    /// Reject requests the library cannot honour
    fn validate(kind: FilterKind, source: &SourceImage, params: &FilterParams) -> bool {
        if source.width() == 0 || source.height() == 0 {
            warn!("⚠️  {} declined: empty source image", kind);
            return false;
        }

        for (key, value) in params.iter() {
            if !kind.declares(key) {
                warn!("⚠️  {} declined: undeclared parameter '{}'", kind, key);
                return false;
            }
            if !value.is_finite() || value < 0.0 {
                warn!("⚠️  {} declined: {} = {} is out of range", kind, key, value);
                return false;
            }
        }

        true
    }
}

impl FilterLibrary for ImageFilterLibrary {
    fn render(
        &self,
        kind: FilterKind,
        source: &SourceImage,
        params: &FilterParams,
    ) -> Option<ProcessedImage> {
        if !Self::validate(kind, source, params) {
            return None;
        }

        // Keys the caller left unset fall back to the filter's neutral value.
        // Pixel distances are given against the original, so shrink them
        // along with a downscaled working copy.
        let intensity = params.get(ParamKey::Intensity).unwrap_or(0.0);
        let radius = params.get(ParamKey::Radius).unwrap_or(0.0) * source.scale();
        let scale = params.get(ParamKey::Scale).unwrap_or(0.0) * source.scale();

        let mut output = source.pixels().clone();
        match kind {
            FilterKind::Crystallize => effects::crystallize(&mut output, radius),
            FilterKind::Edges => effects::edges(&mut output, intensity),
            FilterKind::GaussianBlur => effects::gaussian_blur(&mut output, radius),
            FilterKind::Pixellate => effects::pixellate(&mut output, scale),
            FilterKind::SepiaTone => effects::sepia(&mut output, intensity),
            FilterKind::UnsharpMask => effects::unsharp_mask(&mut output, radius, intensity),
            FilterKind::Vignette => effects::vignette(&mut output, radius, intensity),
        }

        debug!(
            "🎨 Rendered {} {} on {}x{} (x{:.3})",
            kind.id(),
            params,
            source.width(),
            source.height(),
            source.scale()
        );

        Some(ProcessedImage::new(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba, RgbaImage};

    fn source() -> SourceImage {
        SourceImage::new(ImageBuffer::from_fn(10, 10, |x, y| {
            Rgba([(x * 25) as u8, (y * 25) as u8, 128, 255])
        }))
    }

    #[test]
    fn test_every_filter_renders() {
        let library = ImageFilterLibrary::new();
        let source = source();

        for kind in FilterKind::ALL {
            let params = FilterParams::from_intensity(kind.parameter_keys(), 0.5);
            let output = library.render(kind, &source, &params);
            let output = output.unwrap_or_else(|| panic!("{} declined", kind));
            assert_eq!(output.width(), 10);
            assert_eq!(output.height(), 10);
        }
    }

    #[test]
    fn test_render_leaves_source_untouched() {
        let library = ImageFilterLibrary::new();
        let source = source();
        let before = source.pixels().clone();

        let params = FilterParams::from_intensity(&[ParamKey::Intensity], 1.0);
        library.render(FilterKind::SepiaTone, &source, &params);

        assert_eq!(source.pixels(), &before);
    }

    #[test]
    fn test_undeclared_key_is_declined() {
        let library = ImageFilterLibrary::new();
        let mut params = FilterParams::new();
        params.set(ParamKey::Intensity, 0.5);

        assert!(library.render(FilterKind::GaussianBlur, &source(), &params).is_none());
    }

    #[test]
    fn test_empty_source_is_declined() {
        let library = ImageFilterLibrary::new();
        let empty = SourceImage::new(RgbaImage::new(0, 0));
        let params = FilterParams::from_intensity(&[ParamKey::Intensity], 0.5);

        assert!(library.render(FilterKind::SepiaTone, &empty, &params).is_none());
    }

    #[test]
    fn test_non_finite_value_is_declined() {
        let library = ImageFilterLibrary::new();
        let mut params = FilterParams::new();
        params.set(ParamKey::Radius, f32::NAN);

        assert!(library.render(FilterKind::Crystallize, &source(), &params).is_none());
    }

    #[test]
    fn test_pixel_sizes_follow_working_copy_scale() {
        let library = ImageFilterLibrary::new();
        let original = SourceImage::new(ImageBuffer::from_fn(2560, 40, |x, y| {
            Rgba([(x % 251) as u8, (y * 6) as u8, 64, 255])
        }));
        let working = original.working_copy(1280);
        assert_eq!(working.scale(), 0.5);

        let mut params = FilterParams::new();
        params.set(ParamKey::Scale, 10.0);
        let output = library
            .render(FilterKind::Pixellate, &working, &params)
            .expect("pixellate declined");

        let mut expected = working.pixels().clone();
        effects::pixellate(&mut expected, 5.0);
        assert_eq!(output.pixels(), &expected);
    }

    #[test]
    fn test_render_is_deterministic() {
        let library = ImageFilterLibrary::new();
        let source = source();

        for kind in FilterKind::ALL {
            let params = FilterParams::from_intensity(kind.parameter_keys(), 0.3);
            let a = library.render(kind, &source, &params);
            let b = library.render(kind, &source, &params);
            assert_eq!(a, b, "{} is not deterministic", kind);
        }
    }
}
