//! Export per-pixel diagnostics to CSV.
//!
//! One row per sample with the raw flux and both smoothed variants, meant for
//! spreadsheets or plotting scripts. Masked values are written as empty cells.

use std::path::Path;

use crate::domain::Spectrum;
use crate::error::AppError;
use crate::fit::SmoothedSpectrum;

/// Write `index,wavelength,flux,fitted,unblended` rows.
pub fn write_diagnostics_csv(path: &Path, spectrum: &Spectrum, smoothed: &SmoothedSpectrum) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writer
        .write_record(["index", "wavelength", "flux", "fitted", "unblended"])
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for (i, w) in spectrum.wavelength.iter().enumerate() {
        let row = [
            i.to_string(),
            w.to_string(),
            cell(spectrum.flux.get(i)),
            cell(smoothed.fitted.get(i)),
            cell(smoothed.unblended.get(i)),
        ];
        writer
            .write_record(&row)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV: {e}")))?;
    Ok(())
}

fn cell(value: Option<&f64>) -> String {
    match value {
        Some(v) if v.is_finite() => v.to_string(),
        _ => String::new(),
    }
}
