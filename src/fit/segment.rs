//! Chebyshev fit of a single continuum segment.
//!
//! Given a half-open segment `[start, end)` of the axis:
//! - rescale its wavelengths onto [-1, 1]
//! - least-squares fit a Chebyshev series of degree `order` to the flux
//! - evaluate the series back at every pixel of the segment
//!
//! Masked (non-finite) flux samples are left out of the fit but still receive
//! a fitted value.

use crate::domain::ContinuumSegment;
use crate::error::TransformError;
use crate::math::{cheb_eval, cheb_fit, rescale_with_span};

/// How a segment's wavelengths are mapped onto the Chebyshev domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentRescale {
    /// The segment's own min → -1, max → +1.
    Own,
    /// Offset by the segment's own minimum, scaled by an externally supplied
    /// span (the whole axis for the trailing segment).
    Span(f64),
}

/// Result of fitting one segment.
#[derive(Debug, Clone)]
pub struct SegmentFit {
    /// Fitted flux, one value per pixel of the segment.
    pub values: Vec<f64>,
    /// Samples that entered the least-squares system.
    pub used: usize,
    /// RMS of `flux − fit` over the samples used.
    pub rms: f64,
}

/// Map a segment's wavelengths onto the Chebyshev domain.
///
/// The segment minimum always maps to -1. With `SegmentRescale::Own` the
/// maximum maps to +1. Returns `None` when the values are not finite or the
/// span is not positive.
pub fn rescale_segment(wavelength: &[f64], rescale: SegmentRescale) -> Option<Vec<f64>> {
    let (min, max) = min_max(wavelength)?;
    let span = match rescale {
        SegmentRescale::Own => max - min,
        SegmentRescale::Span(span) => span,
    };
    if !(span.is_finite() && span > 0.0) {
        return None;
    }
    Some(wavelength.iter().map(|&w| rescale_with_span(w, min, span)).collect())
}

/// Fit and evaluate a Chebyshev series of degree `order` over `segment`.
pub fn fit_segment(
    axis: &[f64],
    flux: &[f64],
    segment: ContinuumSegment,
    order: usize,
    rescale: SegmentRescale,
) -> Result<SegmentFit, TransformError> {
    if segment.is_empty() || segment.end > axis.len() || segment.end > flux.len() {
        return Err(fit_error(axis, segment, "segment is empty or outside the spectrum".to_string()));
    }

    let wavelength = &axis[segment.start..segment.end];
    let values = &flux[segment.start..segment.end];

    let t = rescale_segment(wavelength, rescale).ok_or_else(|| {
        fit_error(axis, segment, "wavelength span is zero or not finite".to_string())
    })?;

    let (t_used, y_used): (Vec<f64>, Vec<f64>) = t
        .iter()
        .zip(values.iter())
        .filter(|(_, y)| y.is_finite())
        .map(|(&ti, &yi)| (ti, yi))
        .unzip();

    let needed = order + 1;
    let used = y_used.len();
    if used < needed {
        return Err(fit_error(
            axis,
            segment,
            format!("order {order} needs at least {needed} samples, segment has {used}"),
        ));
    }
    if used == needed {
        log::warn!(
            "Segment [{}, {}) has exactly {needed} samples for order {order}; the fit interpolates the data",
            segment.start,
            segment.end
        );
    }
    let masked = values.len() - used;
    if masked > 0 {
        log::warn!(
            "Segment [{}, {}): {masked} masked samples left out of the fit",
            segment.start,
            segment.end
        );
    }

    let coeffs = cheb_fit(&t_used, &y_used, order).ok_or_else(|| {
        fit_error(axis, segment, "least-squares system has no finite solution".to_string())
    })?;

    let fitted: Vec<f64> = t.iter().map(|&ti| cheb_eval(&coeffs, ti)).collect();

    let sse: f64 = t_used
        .iter()
        .zip(y_used.iter())
        .map(|(&ti, &yi)| {
            let r = yi - cheb_eval(&coeffs, ti);
            r * r
        })
        .sum();
    let rms = (sse / used as f64).sqrt();

    Ok(SegmentFit {
        values: fitted,
        used,
        rms,
    })
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() {
        Some((min, max))
    } else {
        None
    }
}

fn fit_error(axis: &[f64], segment: ContinuumSegment, reason: String) -> TransformError {
    let lambda_start = axis.get(segment.start).copied().unwrap_or(f64::NAN);
    let lambda_end = segment
        .end
        .checked_sub(1)
        .and_then(|i| axis.get(i))
        .copied()
        .unwrap_or(f64::NAN);
    TransformError::Fit {
        start: segment.start,
        end: segment.end,
        lambda_start,
        lambda_end,
        reason,
    }
}
