/// The filter pipeline
///
/// Owns the selected filter, the intensity, the picked source image and the
/// last rendered output. Every input change re-renders from the source, so
/// filters never stack on top of each other.
///
/// Interactive renders run on a working copy capped at `WORKING_SIZE`;
/// only `save` renders the picked image at its full resolution.

use log::{debug, info, warn};

use super::data::{ProcessedImage, SourceImage, WORKING_SIZE};
use crate::error::SaveError;
use crate::filter::{FilterKind, FilterLibrary, FilterParams};
use crate::photo::writer::ImageWriter;

/// Intensity used before the user touches the slider
pub const DEFAULT_INTENSITY: f32 = 0.5;

/// What a call to `apply` did to the processed image
///
/// The presentation layer uses this to decide whether the display needs
/// to be refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A new processed image replaced the previous one
    Rendered,
    /// The library returned nothing; the previous output is still current
    Declined,
    /// Nothing to render yet
    NoSource,
}

/// Filter pipeline state
pub struct FilterPipeline<L: FilterLibrary> {
    library: L,
    filter: FilterKind,
    intensity: f32,
    source: Option<SourceImage>,
    working: Option<SourceImage>,
    processed: Option<ProcessedImage>,
}

impl<L: FilterLibrary> FilterPipeline<L> {
    /// Create a pipeline with the default filter and intensity
    #[cfg(test)]
    pub fn new(library: L) -> Self {
        Self::with_defaults(library, FilterKind::default(), DEFAULT_INTENSITY)
    }

    /// Create a pipeline starting from the given filter and intensity
    pub fn with_defaults(library: L, filter: FilterKind, intensity: f32) -> Self {
        Self {
            library,
            filter,
            intensity,
            source: None,
            working: None,
            processed: None,
        }
    }

    pub fn filter(&self) -> FilterKind {
        self.filter
    }

    /// Label of the active filter
    pub fn display_name(&self) -> &'static str {
        self.filter.display_name()
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// The picked image at full size
    #[cfg(test)]
    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    /// The downscaled copy interactive renders start from
    pub fn working(&self) -> Option<&SourceImage> {
        self.working.as_ref()
    }

    pub fn processed(&self) -> Option<&ProcessedImage> {
        self.processed.as_ref()
    }

    #[cfg(test)]
    pub fn library(&self) -> &L {
        &self.library
    }

    /// Take a freshly picked image as the filter input and render it
    pub fn load_source(&mut self, image: SourceImage) -> ApplyOutcome {
        let working = image.working_copy(WORKING_SIZE);
        info!(
            "🖼️  Loaded source image {}x{} (working copy {}x{})",
            image.width(),
            image.height(),
            working.width(),
            working.height()
        );
        self.source = Some(image);
        self.working = Some(working);
        self.apply()
    }

    /// Switch filters and re-render from the original source
    ///
    /// Without a source only the selection changes.
    pub fn select_filter(&mut self, filter: FilterKind) -> ApplyOutcome {
        debug!("Selected filter {}", filter);
        self.filter = filter;
        self.apply()
    }

    /// Update the intensity and re-render
    ///
    /// The value is expected in [0, 1]; the slider is responsible for that.
    pub fn set_intensity(&mut self, value: f32) -> ApplyOutcome {
        self.intensity = value;
        self.apply()
    }

    /// Parameters for the current filter at the current intensity
    fn params(&self) -> FilterParams {
        let keys = self.library.parameter_keys(self.filter);
        FilterParams::from_intensity(keys, self.intensity)
    }

    /// Render the working copy with the current filter and intensity
    pub(crate) fn apply(&mut self) -> ApplyOutcome {
        let Some(working) = self.working.as_ref() else {
            return ApplyOutcome::NoSource;
        };

        let params = self.params();
        match self.library.render(self.filter, working, &params) {
            Some(output) => {
                self.processed = Some(output);
                ApplyOutcome::Rendered
            }
            None => {
                // The previous output stays on screen and nothing is shown to the user
                warn!(
                    "⚠️  {} {} produced no output, keeping previous image",
                    self.filter, params
                );
                ApplyOutcome::Declined
            }
        }
    }

    /// Hand the processed image to `writer`
    ///
    /// Fails without contacting the writer when there is nothing to save.
    /// When the preview came from a downscaled copy the filter is run again
    /// over the full-size source; if that render declines, the preview is
    /// written instead. The returned future resolves to the writer's single
    /// completion.
    pub fn save<W: ImageWriter>(&self, writer: &W) -> Result<W::Pending, SaveError> {
        let preview = self.processed.as_ref().ok_or(SaveError::NoImage)?;
        let image = self.render_full_size().unwrap_or_else(|| preview.clone());
        info!("💾 Saving {}x{} image", image.width(), image.height());
        Ok(writer.write(image))
    }

    /// Run the current filter over the full-size source
    ///
    /// `None` when the preview is already full size or the library declines.
    fn render_full_size(&self) -> Option<ProcessedImage> {
        let source = self.source.as_ref()?;
        if self.working.as_ref()?.scale() >= 1.0 {
            return None;
        }

        let params = self.params();
        let output = self.library.render(self.filter, source, &params);
        if output.is_none() {
            warn!(
                "⚠️  {} {} declined at full size, saving the preview",
                self.filter, params
            );
        }
        output
    }
}

impl<L: FilterLibrary> std::fmt::Debug for FilterPipeline<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterPipeline")
            .field("filter", &self.filter)
            .field("intensity", &self.intensity)
            .field("has_source", &self.source.is_some())
            .field("has_processed", &self.processed.is_some())
            .finish()
    }
}
