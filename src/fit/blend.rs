//! Linear blending between fitted and raw flux at segment joins.
//!
//! - `start_blend`: raw spectrum → polynomial. Offset 0 (the join) is raw and
//!   the weight of the fitted value grows with the offset.
//! - `end_blend`: polynomial → raw spectrum, walking backwards from the join.
//!   Offset 0 is again the raw value at the join; the weight of the fitted
//!   value grows with the distance from it.
//!
//! Windows are clipped to the slices they operate on, so callers can pass
//! sub-slices to keep a blend from spilling into a neighbouring region.

use crate::domain::BlendWeighting;

/// `(1 − w)·raw + w·fitted`, returning the endpoints exactly for `w ∈ {0, 1}`.
pub fn mix(raw: f64, fitted: f64, w: f64) -> f64 {
    if w == 0.0 {
        raw
    } else if w == 1.0 {
        fitted
    } else {
        (1.0 - w) * raw + w * fitted
    }
}

/// Blend `fitted[start + i]` for `i in 0..width` from raw toward fitted.
///
/// Returns the updated window.
pub fn start_blend<'a>(
    start: usize,
    width: usize,
    weighting: BlendWeighting,
    fitted: &'a mut [f64],
    raw: &[f64],
) -> &'a [f64] {
    let len = fitted.len().min(raw.len());
    let start = start.min(len);
    let stop = start.saturating_add(width).min(len);

    for idx in start..stop {
        let w = weighting.weight(idx - start, width);
        fitted[idx] = mix(raw[idx], fitted[idx], w);
    }

    &fitted[start..stop]
}

/// Blend `fitted[end - i]` for `i in 0..width` from raw (at `end`) toward fitted.
///
/// Returns the updated window (in index order).
pub fn end_blend<'a>(
    end: usize,
    width: usize,
    weighting: BlendWeighting,
    fitted: &'a mut [f64],
    raw: &[f64],
) -> &'a [f64] {
    let len = fitted.len().min(raw.len());
    if width == 0 || len == 0 {
        return &fitted[0..0];
    }

    for i in 0..width {
        let Some(idx) = end.checked_sub(i) else { break };
        if idx >= len {
            continue;
        }
        let w = weighting.weight(i, width);
        fitted[idx] = mix(raw[idx], fitted[idx], w);
    }

    let hi = end.saturating_add(1).min(len);
    let lo = end.saturating_sub(width - 1).min(hi);
    &fitted[lo..hi]
}
