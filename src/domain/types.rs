//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during smoothing
//! - read from / written to spectrum JSON files
//! - echoed into file history and run summaries

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Default polynomial order for continuum fits.
pub const DEFAULT_ORDER: usize = 10;

/// Default number of pixels blended at each polynomial/spectrum join.
pub const DEFAULT_BLEND_WIDTH: usize = 10;

/// Built-in telluric windows (µm), used when no range file is given.
pub const DEFAULT_EXCLUSION_RANGES: [ExclusionRange; 6] = [
    ExclusionRange::new(0.638, 0.66),
    ExclusionRange::new(0.686, 0.694),
    ExclusionRange::new(0.705, 0.74),
    ExclusionRange::new(0.759, 0.775),
    ExclusionRange::new(0.810, 0.843),
    ExclusionRange::new(0.891, 0.984),
];

/// How exclusion-range endpoints are placed on the wavelength axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LookupMode {
    /// Endpoints must equal an axis sample bit for bit.
    Exact,
    /// Snap each endpoint to the closest axis sample.
    ///
    /// Endpoints outside the axis bounds are still rejected.
    Nearest,
}

/// Rescale used for the continuum segment after the last exclusion range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TrailingRescale {
    /// `2·(λ − segment_min)/(axis_max − axis_min) − 1`.
    ///
    /// The trailing segment lands on a sub-interval of [-1, 1] starting at -1.
    AxisSpan,
    /// Same per-segment rescale as every other segment.
    Segment,
}

/// Weight schedule across a blend window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BlendWeighting {
    /// Weight `i / width`: reaches the far side of the window for any width.
    Linear,
    /// Weight `0.1 · i` regardless of width (reproduces older output).
    FixedTenth,
}

impl BlendWeighting {
    /// Weight of the fitted value at offset `i` of a window of `width` pixels.
    pub fn weight(self, i: usize, width: usize) -> f64 {
        match self {
            BlendWeighting::Linear => {
                if width == 0 {
                    1.0
                } else {
                    i as f64 / width as f64
                }
            }
            BlendWeighting::FixedTenth => 0.1 * i as f64,
        }
    }
}

/// A telluric window `[low, high]` to keep verbatim.
///
/// `low` is the endpoint that comes first along the axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExclusionRange {
    pub low: f64,
    pub high: f64,
}

impl ExclusionRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }
}

impl fmt::Display for ExclusionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

/// Axis indices of one exclusion range's endpoints (both inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentIndexRange {
    pub start: usize,
    pub end: usize,
}

/// A half-open index span `[start, end)` fitted by one polynomial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContinuumSegment {
    pub start: usize,
    pub end: usize,
    /// Segment after the last exclusion range (runs to the end of the axis).
    pub trailing: bool,
}

impl ContinuumSegment {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Linear wavelength solution: `λ[i] = (i − reference_pixel)·step + reference_value`.
///
/// Mirrors the FITS `CRPIX1` / `CRVAL1` / `CDELT1` keywords. `i` is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearSolution {
    pub reference_pixel: f64,
    pub reference_value: f64,
    pub step: f64,
}

impl LinearSolution {
    pub fn wavelength(&self, i: usize) -> f64 {
        (i as f64 - self.reference_pixel) * self.step + self.reference_value
    }

    /// Build an axis of `n` samples.
    pub fn axis(&self, n: usize) -> Vec<f64> {
        (0..n).map(|i| self.wavelength(i)).collect()
    }
}

/// Header carried alongside a spectrum loaded from JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumHeader {
    pub object: Option<String>,
    pub solution: LinearSolution,
    pub history: Vec<String>,
}

/// An in-memory 1-D spectrum. Masked flux samples are NaN.
#[derive(Debug, Clone)]
pub struct Spectrum {
    pub wavelength: Vec<f64>,
    pub flux: Vec<f64>,
    /// Present when the spectrum came from (or is destined for) a JSON file.
    pub header: Option<SpectrumHeader>,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.flux.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flux.is_empty()
    }

    /// Same axis and header, different flux.
    pub fn with_flux(&self, flux: Vec<f64>) -> Spectrum {
        Spectrum {
            wavelength: self.wavelength.clone(),
            flux,
            header: self.header.clone(),
        }
    }
}

/// Knobs of the smoothing transform itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothOptions {
    /// Chebyshev degree.
    pub order: usize,
    /// Pixels blended at each join.
    pub blend_width: usize,
    pub lookup: LookupMode,
    pub trailing_rescale: TrailingRescale,
    pub blend_weighting: BlendWeighting,
}

impl Default for SmoothOptions {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
            blend_width: DEFAULT_BLEND_WIDTH,
            lookup: LookupMode::Exact,
            trailing_rescale: TrailingRescale::AxisSpan,
            blend_weighting: BlendWeighting::Linear,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct SmoothConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Display diagnostics instead of writing `output`.
    pub show: bool,
    pub exclusion_ranges: Vec<ExclusionRange>,
    /// File the ranges were read from (`None` = built-in defaults).
    pub range_source: Option<PathBuf>,
    pub options: SmoothOptions,
    pub export: Option<PathBuf>,
    pub plot_width: usize,
    pub plot_height: usize,
}

/// A spectrum JSON file.
///
/// Field names follow the FITS keywords the axis is built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectrumFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    pub crpix1: f64,
    pub crval1: f64,
    pub cdelt1: f64,
    /// `null` marks a masked sample.
    pub flux: Vec<Option<f64>>,
    #[serde(default)]
    pub history: Vec<String>,
}

impl SpectrumFile {
    pub fn solution(&self) -> LinearSolution {
        LinearSolution {
            reference_pixel: self.crpix1,
            reference_value: self.crval1,
            step: self.cdelt1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_solution_uses_zero_based_pixels() {
        let sol = LinearSolution {
            reference_pixel: 1.0,
            reference_value: 0.5,
            step: 0.25,
        };
        assert_eq!(sol.axis(3), vec![0.25, 0.5, 0.75]);
    }

    #[test]
    fn blend_weight_schedules() {
        assert_eq!(BlendWeighting::Linear.weight(0, 5), 0.0);
        assert!((BlendWeighting::Linear.weight(4, 5) - 0.8).abs() < 1e-15);
        assert!((BlendWeighting::FixedTenth.weight(4, 5) - 0.4).abs() < 1e-15);
        // Linear and fixed-tenth agree for the default width.
        for i in 0..DEFAULT_BLEND_WIDTH {
            let a = BlendWeighting::Linear.weight(i, DEFAULT_BLEND_WIDTH);
            let b = BlendWeighting::FixedTenth.weight(i, DEFAULT_BLEND_WIDTH);
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn default_ranges_are_ordered() {
        for w in DEFAULT_EXCLUSION_RANGES.windows(2) {
            assert!(w[0].low < w[0].high);
            assert!(w[0].high < w[1].low);
        }
    }
}
