//! Shared smoothing pipeline used by the `fit` command and its tests.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! read spectrum -> locate ranges -> fit segments -> blend
//!
//! The caller then focuses on presentation (summary, plot, files).

use crate::domain::{SmoothConfig, Spectrum};
use crate::error::AppError;
use crate::fit::{SmoothedSpectrum, smooth_spectrum};
use crate::io::read_spectrum;

/// All computed outputs of a single `tellfit fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub spectrum: Spectrum,
    pub smoothed: SmoothedSpectrum,
}

impl RunOutput {
    /// The input spectrum with its flux replaced by the smoothed flux.
    pub fn output_spectrum(&self) -> Spectrum {
        self.spectrum.with_flux(self.smoothed.fitted.clone())
    }
}

/// Execute the smoothing pipeline and return the computed outputs.
pub fn run_smooth(config: &SmoothConfig) -> Result<RunOutput, AppError> {
    let spectrum = read_spectrum(&config.input)?;
    log::info!(
        "Read {} samples from {}",
        spectrum.len(),
        config.input.display()
    );

    let smoothed = smooth_spectrum(
        &spectrum.wavelength,
        &spectrum.flux,
        &config.exclusion_ranges,
        &config.options,
    )?;

    Ok(RunOutput { spectrum, smoothed })
}
