//! FITS spectra.
//!
//! A spectrum is the 1-D image in the primary HDU. The wavelength axis comes
//! from the `CRPIX1`/`CRVAL1`/`CDELT1` keywords with zero-based pixel indices,
//! and `OBJECT` is carried over when present. NaN pixels are masked samples.

use std::path::Path;

use fitsio::FitsFile;
use fitsio::hdu::{FitsHdu, HduInfo};
use fitsio::images::{ImageDescription, ImageType};

use crate::domain::{LinearSolution, Spectrum, SpectrumHeader};
use crate::error::AppError;
use crate::io::spectrum::infer_linear_solution;

/// Load the primary-HDU spectrum of a FITS file.
pub fn read_spectrum_fits(path: &Path) -> Result<Spectrum, AppError> {
    let mut fptr = FitsFile::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open FITS file '{}': {e}", path.display())))?;
    let hdu = fptr
        .primary_hdu()
        .map_err(|e| AppError::new(2, format!("Failed to access primary HDU: {e}")))?;

    let shape = match &hdu.info {
        HduInfo::ImageInfo { shape, .. } => shape.clone(),
        HduInfo::TableInfo { .. } => {
            return Err(AppError::new(2, "Primary HDU is a table, not a spectrum"));
        }
        HduInfo::AnyInfo => return Err(AppError::new(2, "Unknown primary HDU type")),
    };
    if shape.is_empty() || shape.contains(&0) {
        return Err(AppError::new(3, format!("FITS file '{}' holds no data.", path.display())));
    }
    // Degenerate axes such as [1, n] are fine; a real 2-D image is not.
    if shape.iter().filter(|&&d| d > 1).count() > 1 {
        return Err(AppError::new(
            2,
            format!("Primary HDU has shape {shape:?}; expected a 1-D spectrum"),
        ));
    }

    let flux: Vec<f64> = hdu
        .read_image(&mut fptr)
        .map_err(|e| AppError::new(2, format!("Failed to read FITS data: {e}")))?;

    let solution = LinearSolution {
        reference_pixel: read_required_key(&hdu, &mut fptr, "CRPIX1")?,
        reference_value: read_required_key(&hdu, &mut fptr, "CRVAL1")?,
        step: read_required_key(&hdu, &mut fptr, "CDELT1")?,
    };
    let object = read_key_optional::<String>(&hdu, &mut fptr, "OBJECT").map(|s| s.trim().to_string());

    let flux: Vec<f64> = flux
        .into_iter()
        .map(|v| if v.is_finite() { v } else { f64::NAN })
        .collect();

    Ok(Spectrum {
        wavelength: solution.axis(flux.len()),
        flux,
        header: Some(SpectrumHeader {
            object,
            solution,
            history: Vec::new(),
        }),
    })
}

/// Write `spectrum` as a double-precision 1-D primary image.
///
/// An existing file is replaced.
pub fn write_spectrum_fits(path: &Path, spectrum: &Spectrum) -> Result<(), AppError> {
    let (object, solution) = match &spectrum.header {
        Some(h) => (h.object.clone(), h.solution),
        None => (None, infer_linear_solution(&spectrum.wavelength)?),
    };

    // fitsio won't overwrite
    if path.exists() {
        std::fs::remove_file(path)
            .map_err(|e| AppError::new(2, format!("Failed to replace '{}': {e}", path.display())))?;
    }

    let description = ImageDescription {
        data_type: ImageType::Double,
        dimensions: &[spectrum.flux.len()],
    };
    let mut fptr = FitsFile::create(path)
        .with_custom_primary(&description)
        .open()
        .map_err(|e| AppError::new(2, format!("Failed to create FITS file '{}': {e}", path.display())))?;
    let hdu = fptr
        .primary_hdu()
        .map_err(|e| AppError::new(2, format!("Failed to access primary HDU: {e}")))?;

    hdu.write_image(&mut fptr, spectrum.flux.as_slice())
        .map_err(|e| AppError::new(2, format!("Failed to write FITS data: {e}")))?;

    let keys = [
        ("CRPIX1", solution.reference_pixel),
        ("CRVAL1", solution.reference_value),
        ("CDELT1", solution.step),
    ];
    for (key, value) in keys {
        hdu.write_key(&mut fptr, key, value)
            .map_err(|e| AppError::new(2, format!("Failed to write FITS keyword {key}: {e}")))?;
    }
    if let Some(object) = object {
        hdu.write_key(&mut fptr, "OBJECT", object.as_str())
            .map_err(|e| AppError::new(2, format!("Failed to write FITS keyword OBJECT: {e}")))?;
    }
    Ok(())
}

fn read_required_key(hdu: &FitsHdu, fptr: &mut FitsFile, key: &str) -> Result<f64, AppError> {
    hdu.read_key(fptr, key)
        .map_err(|e| AppError::new(2, format!("Missing/invalid FITS keyword {key}: {e}")))
}

fn read_key_optional<T: fitsio::headers::ReadsKey>(hdu: &FitsHdu, fptr: &mut FitsFile, key: &str) -> Option<T> {
    hdu.read_key(fptr, key).ok()
}
