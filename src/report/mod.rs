//! Run summary printed after a smoothing pass.
//!
//! Formatting lives here so the fitting code stays free of presentation
//! concerns and output changes are localized.

use crate::domain::{ExclusionRange, SmoothConfig, Spectrum};
use crate::fit::SmoothedSpectrum;

/// Format the full run summary (input stats + settings + per-segment fits).
pub fn format_run_summary(spectrum: &Spectrum, smoothed: &SmoothedSpectrum, config: &SmoothConfig) -> String {
    let mut out = String::new();

    out.push_str("=== tellfit - Chebyshev continuum smoothing ===\n");
    out.push_str(&format!("Input: {}\n", config.input.display()));
    if let Some(object) = spectrum.header.as_ref().and_then(|h| h.object.as_deref()) {
        out.push_str(&format!("Object: {object}\n"));
    }

    let n = spectrum.len();
    let masked = spectrum.flux.iter().filter(|v| !v.is_finite()).count();
    match (spectrum.wavelength.first(), spectrum.wavelength.last()) {
        (Some(lo), Some(hi)) => out.push_str(&format!("Samples: n={n} (masked={masked}) | λ=[{lo:.6}, {hi:.6}]\n")),
        _ => out.push_str(&format!("Samples: n={n} (masked={masked})\n")),
    }

    let opts = &config.options;
    out.push_str(&format!(
        "Order: {} | blend width: {} px | lookup: {:?} | trailing rescale: {:?} | weighting: {:?}\n",
        opts.order, opts.blend_width, opts.lookup, opts.trailing_rescale, opts.blend_weighting
    ));
    out.push_str(&format!(
        "Telluric ranges: {} ({})\n",
        config.exclusion_ranges.len(),
        config
            .range_source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in".to_string())
    ));

    out.push_str("\nSegments:\n");
    out.push_str(
        format!(
            "{:<16} {:>12} {:>12} {:>8} {:>12}\n",
            "pixels", "λ_start", "λ_end", "used", "rms"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<16} {:-<12} {:-<12} {:-<8} {:-<12}\n", "", "", "", "", "").trim_end());
    out.push('\n');

    for s in &smoothed.segments {
        let span = format!("[{}, {})", s.segment.start, s.segment.end);
        let marker = if s.segment.trailing { " (trailing)" } else { "" };
        out.push_str(
            format!(
                "{span:<16} {:>12.6} {:>12.6} {:>8} {:>12.3e}{marker}\n",
                s.lambda_start, s.lambda_end, s.used, s.rms
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// One line per range, for logging the ranges in use.
pub fn format_ranges(ranges: &[ExclusionRange]) -> String {
    let parts: Vec<String> = ranges.iter().map(|r| r.to_string()).collect();
    parts.join(", ")
}
