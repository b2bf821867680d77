//! Read/write spectrum files.
//!
//! Three formats, chosen by extension:
//! - `.fits`/`.fit`: 1-D primary image with `CRPIX1`/`CRVAL1`/`CDELT1`
//!   (see `io::fits`). NaN pixels are masked samples.
//! - `.json`: FITS-like header (`crpix1`, `crval1`, `cdelt1`) plus a flux
//!   array; the axis is generated from the linear solution. `null` flux
//!   entries are masked samples.
//! - `.csv`: `wavelength` and `flux` columns. Empty or non-numeric flux cells
//!   are masked samples.
//!
//! Values are written with Rust's shortest round-trip formatting, so an axis
//! read back from a CSV we wrote still matches exclusion endpoints exactly.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{LinearSolution, Spectrum, SpectrumFile, SpectrumHeader};
use crate::error::AppError;
use crate::io::fits::{read_spectrum_fits, write_spectrum_fits};

/// Relative tolerance when deciding whether a CSV axis is linear.
const LINEAR_AXIS_RTOL: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectrumFormat {
    Fits,
    Json,
    Csv,
}

impl SpectrumFormat {
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "fits" | "fit" => Ok(SpectrumFormat::Fits),
            "json" => Ok(SpectrumFormat::Json),
            "csv" => Ok(SpectrumFormat::Csv),
            other => Err(AppError::new(
                2,
                format!(
                    "Unsupported spectrum file '{}' (extension '.{other}'); expected .fits, .json or .csv",
                    path.display()
                ),
            )),
        }
    }
}

/// Load a spectrum, dispatching on the file extension.
pub fn read_spectrum(path: &Path) -> Result<Spectrum, AppError> {
    let spectrum = match SpectrumFormat::from_path(path)? {
        SpectrumFormat::Fits => read_spectrum_fits(path)?,
        SpectrumFormat::Json => read_spectrum_json(path)?,
        SpectrumFormat::Csv => read_spectrum_csv(path)?,
    };

    if spectrum.is_empty() {
        return Err(AppError::new(3, format!("Spectrum '{}' has no samples.", path.display())));
    }
    let masked = spectrum.flux.iter().filter(|v| !v.is_finite()).count();
    if masked > 0 {
        log::warn!("{masked} of {} flux samples are masked", spectrum.len());
    }
    Ok(spectrum)
}

/// Write a spectrum, dispatching on the file extension.
///
/// `history` is appended to the header history of JSON output; FITS and CSV
/// output do not carry history.
pub fn write_spectrum(path: &Path, spectrum: &Spectrum, history: Option<String>) -> Result<(), AppError> {
    match SpectrumFormat::from_path(path)? {
        SpectrumFormat::Fits => write_spectrum_fits(path, spectrum),
        SpectrumFormat::Json => write_spectrum_json(path, spectrum, history),
        SpectrumFormat::Csv => write_spectrum_csv(path, spectrum),
    }
}

fn read_spectrum_json(path: &Path) -> Result<Spectrum, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open spectrum JSON '{}': {e}", path.display())))?;
    let parsed: SpectrumFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid spectrum JSON '{}': {e}", path.display())))?;
    Ok(spectrum_from_file(parsed))
}

/// Build an in-memory spectrum from the JSON schema.
pub fn spectrum_from_file(file: SpectrumFile) -> Spectrum {
    let solution = file.solution();
    let flux: Vec<f64> = file.flux.iter().map(|v| v.unwrap_or(f64::NAN)).collect();
    Spectrum {
        wavelength: solution.axis(flux.len()),
        flux,
        header: Some(SpectrumHeader {
            object: file.object,
            solution,
            history: file.history,
        }),
    }
}

fn write_spectrum_json(path: &Path, spectrum: &Spectrum, history: Option<String>) -> Result<(), AppError> {
    let (object, solution, mut lines) = match &spectrum.header {
        Some(h) => (h.object.clone(), h.solution, h.history.clone()),
        None => (None, infer_linear_solution(&spectrum.wavelength)?, Vec::new()),
    };
    lines.extend(history);

    let out = SpectrumFile {
        object,
        crpix1: solution.reference_pixel,
        crval1: solution.reference_value,
        cdelt1: solution.step,
        flux: spectrum
            .flux
            .iter()
            .map(|&v| if v.is_finite() { Some(v) } else { None })
            .collect(),
        history: lines,
    };

    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create spectrum JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, &out)
        .map_err(|e| AppError::new(2, format!("Failed to write spectrum JSON: {e}")))?;
    Ok(())
}

/// Recover a linear solution from a sampled axis.
///
/// Fails when the axis is not evenly spaced.
pub fn infer_linear_solution(wavelength: &[f64]) -> Result<LinearSolution, AppError> {
    let (first, last) = match (wavelength.first(), wavelength.last()) {
        (Some(&a), Some(&b)) if wavelength.len() >= 2 => (a, b),
        _ => {
            return Err(AppError::new(
                2,
                "At least two samples are needed to describe the axis with CRPIX1/CRVAL1/CDELT1.",
            ));
        }
    };

    let step = (last - first) / (wavelength.len() - 1) as f64;
    let solution = LinearSolution {
        reference_pixel: 0.0,
        reference_value: first,
        step,
    };

    let tol = LINEAR_AXIS_RTOL * step.abs().max(f64::MIN_POSITIVE);
    for (i, &w) in wavelength.iter().enumerate() {
        if (solution.wavelength(i) - w).abs() > tol {
            return Err(AppError::new(
                2,
                format!("Wavelength axis is not linear (sample {i}); write CSV output instead."),
            ));
        }
    }
    Ok(solution)
}

fn read_spectrum_csv(path: &Path) -> Result<Spectrum, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open spectrum CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let wave_idx = *header_map
        .get("wavelength")
        .ok_or_else(|| AppError::new(2, "Missing required column: `wavelength`"))?;
    let flux_idx = *header_map
        .get("flux")
        .ok_or_else(|| AppError::new(2, "Missing required column: `flux`"))?;

    let mut wavelength = Vec::new();
    let mut flux = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1, records are 1-based after it.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::new(2, format!("CSV parse error on line {line}: {e}")))?;

        let w = record
            .get(wave_idx)
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .ok_or_else(|| AppError::new(2, format!("Missing/invalid `wavelength` on line {line}.")))?;

        let f = record
            .get(flux_idx)
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(f64::NAN);

        wavelength.push(w);
        flux.push(f);
    }

    Ok(Spectrum {
        wavelength,
        flux,
        header: None,
    })
}

fn write_spectrum_csv(path: &Path, spectrum: &Spectrum) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create spectrum CSV '{}': {e}", path.display())))?;

    writer
        .write_record(["wavelength", "flux"])
        .map_err(|e| AppError::new(2, format!("Failed to write spectrum CSV header: {e}")))?;
    for (w, f) in spectrum.wavelength.iter().zip(spectrum.flux.iter()) {
        let flux = if f.is_finite() { f.to_string() } else { String::new() };
        writer
            .write_record([w.to_string(), flux])
            .map_err(|e| AppError::new(2, format!("Failed to write spectrum CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to write spectrum CSV: {e}")))?;
    Ok(())
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}
