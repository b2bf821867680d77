//! Synthetic telluric-corrected spectra.
//!
//! Produces a smooth continuum with Gaussian noise, plus residual structure
//! inside the telluric bands (absorption dips and extra scatter) so there is
//! something worth preserving there. Generation is seeded and deterministic.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{ExclusionRange, LinearSolution, LookupMode, Spectrum, SpectrumHeader};
use crate::error::AppError;
use crate::fit::locate_wavelength;

/// Scatter inside telluric bands relative to the continuum noise.
const BAND_NOISE_FACTOR: f64 = 5.0;

/// Depth of the absorption dip at a band centre (fraction of continuum).
const BAND_DEPTH: f64 = 0.35;

#[derive(Debug, Clone)]
pub struct SynthConfig {
    pub samples: usize,
    pub seed: u64,
    /// Gaussian noise σ relative to the continuum.
    pub noise: f64,
    /// Wavelength of pixel 0.
    pub start: f64,
    /// Wavelength step per pixel (> 0).
    pub step: f64,
}

#[derive(Debug, Clone)]
pub struct SynthSpectrum {
    pub spectrum: Spectrum,
    /// The requested bands clipped to the axis and snapped onto axis samples,
    /// so they work with exact lookup.
    pub ranges: Vec<ExclusionRange>,
}

/// Generate a spectrum with absorption residuals inside `bands`.
pub fn generate_spectrum(config: &SynthConfig, bands: &[ExclusionRange]) -> Result<SynthSpectrum, AppError> {
    if config.samples < 2 {
        return Err(AppError::new(2, "Synthetic spectrum needs at least 2 samples."));
    }
    if !(config.step.is_finite() && config.step > 0.0 && config.start.is_finite()) {
        return Err(AppError::new(2, "Synthetic spectrum needs a finite start and a positive step."));
    }
    if !(config.noise.is_finite() && config.noise >= 0.0) {
        return Err(AppError::new(2, "Noise level must be finite and >= 0."));
    }

    let solution = LinearSolution {
        reference_pixel: 0.0,
        reference_value: config.start,
        step: config.step,
    };
    let wavelength = solution.axis(config.samples);
    let ranges = snap_bands(&wavelength, bands)?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, 1.0).map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let lo = wavelength[0];
    let hi = wavelength[wavelength.len() - 1];
    let mid = 0.5 * (lo + hi);
    let half = 0.5 * (hi - lo);

    let flux = wavelength
        .iter()
        .map(|&w| {
            let u = (w - mid) / half;
            let continuum = 1.0 + 0.25 * u - 0.15 * u * u + 0.05 * u * u * u;
            let z: f64 = normal.sample(&mut rng);

            match ranges.iter().find(|r| w >= r.low && w <= r.high) {
                Some(r) => {
                    let centre = 0.5 * (r.low + r.high);
                    let width = (r.high - r.low).max(config.step) / 4.0;
                    let dip = BAND_DEPTH * (-0.5 * ((w - centre) / width).powi(2)).exp();
                    continuum * (1.0 - dip + BAND_NOISE_FACTOR * config.noise * z)
                }
                None => continuum * (1.0 + config.noise * z),
            }
        })
        .collect();

    let history = vec![format!(
        "synthetic spectrum: seed={} noise={} samples={}",
        config.seed, config.noise, config.samples
    )];

    Ok(SynthSpectrum {
        spectrum: Spectrum {
            wavelength,
            flux,
            header: Some(SpectrumHeader {
                object: Some("synthetic".to_string()),
                solution,
                history,
            }),
        },
        ranges,
    })
}

fn snap_bands(wavelength: &[f64], bands: &[ExclusionRange]) -> Result<Vec<ExclusionRange>, AppError> {
    let lo = wavelength[0];
    let hi = wavelength[wavelength.len() - 1];

    let mut out: Vec<ExclusionRange> = Vec::new();
    for band in bands {
        if band.high < lo || band.low > hi {
            continue;
        }
        let a = locate_wavelength(wavelength, band.low.clamp(lo, hi), LookupMode::Nearest)?;
        let b = locate_wavelength(wavelength, band.high.clamp(lo, hi), LookupMode::Nearest)?;
        let snapped = ExclusionRange::new(wavelength[a], wavelength[b]);
        if out.last().is_some_and(|prev| snapped.low < prev.high) {
            continue;
        }
        out.push(snapped);
    }
    Ok(out)
}
