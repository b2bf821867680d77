//! Telluric range files.
//!
//! One range per line, written as a bracketed pair:
//!
//! ```text
//! # O2 B band
//! [0.686, 0.694]
//! [0.705, 0.74]
//! ```
//!
//! Parentheses are accepted in place of brackets. Blank lines and lines
//! starting with `#` are ignored.

use std::path::Path;

use crate::domain::ExclusionRange;
use crate::error::AppError;

/// Read exclusion ranges from a file.
pub fn read_range_file(path: &Path) -> Result<Vec<ExclusionRange>, AppError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| AppError::new(2, format!("Failed to read range file '{}': {e}", path.display())))?;
    parse_ranges(&text).map_err(|e| AppError::new(2, format!("Invalid range file '{}': {e}", path.display())))
}

/// Write exclusion ranges in the format `read_range_file` accepts.
///
/// Values use shortest round-trip formatting, so exact lookup still matches.
pub fn write_range_file(path: &Path, ranges: &[ExclusionRange]) -> Result<(), AppError> {
    let text: String = ranges.iter().map(|r| format!("{r}\n")).collect();
    std::fs::write(path, text)
        .map_err(|e| AppError::new(2, format!("Failed to write range file '{}': {e}", path.display())))
}

/// Parse the contents of a range file.
pub fn parse_ranges(text: &str) -> Result<Vec<ExclusionRange>, String> {
    let mut out = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let range = parse_range_line(line).map_err(|e| format!("line {}: {e}", idx + 1))?;
        out.push(range);
    }
    Ok(out)
}

fn parse_range_line(line: &str) -> Result<ExclusionRange, String> {
    let inner = line
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .or_else(|| line.strip_prefix('(').and_then(|s| s.strip_suffix(')')))
        .ok_or_else(|| format!("expected `[low, high]`, got `{line}`"))?;

    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    let [low, high] = parts.as_slice() else {
        return Err(format!("expected exactly two values, got `{line}`"));
    };

    let low = parse_value(low)?;
    let high = parse_value(high)?;
    Ok(ExclusionRange::new(low, high))
}

fn parse_value(s: &str) -> Result<f64, String> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("invalid wavelength `{s}`"))
}
