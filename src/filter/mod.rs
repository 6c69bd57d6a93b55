/// Filter catalog and the filter library seam
///
/// This module holds:
/// - The closed set of filters offered to the user (`FilterKind`)
/// - The parameter keys a filter may declare (`ParamKey`)
/// - The key/value mapping handed to a render (`FilterParams`)
/// - The `FilterLibrary` trait the pipeline renders through (library.rs)
///
/// Pixel-level implementations of each filter live in effects.rs.

pub mod effects;
pub mod library;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::state::data::{ProcessedImage, SourceImage};

pub use library::ImageFilterLibrary;

/// The filters offered in the selection menu
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    Crystallize,
    Edges,
    GaussianBlur,
    Pixellate,
    #[default]
    SepiaTone,
    UnsharpMask,
    Vignette,
}

impl FilterKind {
    /// Every filter, in menu order
    pub const ALL: [FilterKind; 7] = [
        FilterKind::Crystallize,
        FilterKind::Edges,
        FilterKind::GaussianBlur,
        FilterKind::Pixellate,
        FilterKind::SepiaTone,
        FilterKind::UnsharpMask,
        FilterKind::Vignette,
    ];

    /// Human-readable label shown in the menu
    pub fn display_name(&self) -> &'static str {
        match self {
            FilterKind::Crystallize => "Crystallize",
            FilterKind::Edges => "Edges",
            FilterKind::GaussianBlur => "Gaussian Blur",
            FilterKind::Pixellate => "Pixellate",
            FilterKind::SepiaTone => "Sepia Tone",
            FilterKind::UnsharpMask => "Unsharp Mask",
            FilterKind::Vignette => "Vignette",
        }
    }

    /// Stable identifier, matches the serialized form
    pub fn id(&self) -> &'static str {
        match self {
            FilterKind::Crystallize => "crystallize",
            FilterKind::Edges => "edges",
            FilterKind::GaussianBlur => "gaussian-blur",
            FilterKind::Pixellate => "pixellate",
            FilterKind::SepiaTone => "sepia-tone",
            FilterKind::UnsharpMask => "unsharp-mask",
            FilterKind::Vignette => "vignette",
        }
    }

    /// Parameter keys this filter accepts
    ///
    /// The catalog is closed, so the surface of each filter is a static
    /// table rather than something discovered at render time.
    pub fn parameter_keys(&self) -> &'static [ParamKey] {
        match self {
            FilterKind::Crystallize => &[ParamKey::Radius],
            FilterKind::Edges => &[ParamKey::Intensity],
            FilterKind::GaussianBlur => &[ParamKey::Radius],
            FilterKind::Pixellate => &[ParamKey::Scale],
            FilterKind::SepiaTone => &[ParamKey::Intensity],
            FilterKind::UnsharpMask => &[ParamKey::Radius, ParamKey::Intensity],
            FilterKind::Vignette => &[ParamKey::Radius, ParamKey::Intensity],
        }
    }

    /// Check whether the filter declares `key`
    pub fn declares(&self, key: ParamKey) -> bool {
        self.parameter_keys().contains(&key)
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A numeric input a filter may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParamKey {
    /// Normalized strength, 0.0 to 1.0
    Intensity,
    /// Pixel radius
    Radius,
    /// Pixel scale (block size)
    Scale,
}

impl ParamKey {
    /// Map the normalized slider value onto this key's native range
    pub fn from_intensity(&self, intensity: f32) -> f32 {
        match self {
            ParamKey::Intensity => intensity,
            ParamKey::Radius => intensity * 200.0,
            ParamKey::Scale => intensity * 10.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ParamKey::Intensity => "intensity",
            ParamKey::Radius => "radius",
            ParamKey::Scale => "scale",
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Key/value parameters for a single render
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    values: BTreeMap<ParamKey, f32>,
}

impl FilterParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the parameters for `keys` from a normalized intensity
    ///
    /// Only the listed keys are set. Anything else stays absent.
    pub fn from_intensity(keys: &[ParamKey], intensity: f32) -> Self {
        let mut params = Self::new();
        for key in keys {
            params.set(*key, key.from_intensity(intensity));
        }
        params
    }

    pub fn set(&mut self, key: ParamKey, value: f32) {
        self.values.insert(key, value);
    }

    pub fn get(&self, key: ParamKey) -> Option<f32> {
        self.values.get(&key).copied()
    }

    #[cfg(test)]
    pub fn contains(&self, key: ParamKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParamKey, f32)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.values.len()
    }
}

impl fmt::Display for FilterParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {:.3}", key, value)?;
        }
        f.write_str("}")
    }
}

/// The image filter library the pipeline renders through
///
/// Implementations must be deterministic: identical inputs give identical
/// pixels. `render` returns `None` when the library declines the request.
pub trait FilterLibrary {
    /// Parameter keys the library accepts for `kind`
    fn parameter_keys(&self, kind: FilterKind) -> &'static [ParamKey] {
        kind.parameter_keys()
    }

    /// Render `kind` over `source` with `params`
    fn render(
        &self,
        kind: FilterKind,
        source: &SourceImage,
        params: &FilterParams,
    ) -> Option<ProcessedImage>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_order() {
        let names: Vec<&str> = FilterKind::ALL.iter().map(|k| k.display_name()).collect();
        assert_eq!(
            names,
            vec![
                "Crystallize",
                "Edges",
                "Gaussian Blur",
                "Pixellate",
                "Sepia Tone",
                "Unsharp Mask",
                "Vignette",
            ]
        );
    }

    #[test]
    fn test_default_is_sepia() {
        assert_eq!(FilterKind::default(), FilterKind::SepiaTone);
    }

    #[test]
    fn test_serialized_ids() {
        for kind in FilterKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.id()));
        }
    }

    #[test]
    fn test_parameter_table() {
        assert!(FilterKind::GaussianBlur.declares(ParamKey::Radius));
        assert!(!FilterKind::GaussianBlur.declares(ParamKey::Intensity));
        assert!(FilterKind::Pixellate.declares(ParamKey::Scale));
        assert!(FilterKind::SepiaTone.declares(ParamKey::Intensity));
        assert_eq!(FilterKind::Vignette.parameter_keys().len(), 2);
    }

    #[test]
    fn test_intensity_mapping() {
        let params = FilterParams::from_intensity(
            &[ParamKey::Intensity, ParamKey::Radius, ParamKey::Scale],
            0.5,
        );
        assert_eq!(params.get(ParamKey::Intensity), Some(0.5));
        assert_eq!(params.get(ParamKey::Radius), Some(100.0));
        assert_eq!(params.get(ParamKey::Scale), Some(5.0));
    }

    #[test]
    fn test_only_listed_keys_are_set() {
        let params = FilterParams::from_intensity(&[ParamKey::Radius], 0.8);
        assert_eq!(params.len(), 1);
        assert!(!params.contains(ParamKey::Intensity));
        assert_eq!(params.get(ParamKey::Radius), Some(160.0));
    }

    #[test]
    fn test_params_display() {
        let params = FilterParams::from_intensity(&[ParamKey::Radius, ParamKey::Intensity], 0.25);
        assert_eq!(params.to_string(), "{intensity: 0.250, radius: 50.000}");
    }
}
