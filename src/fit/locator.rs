//! Placing exclusion ranges on the wavelength axis.
//!
//! Each range endpoint becomes an axis index. The default is exact lookup: the
//! endpoint must be one of the sampled wavelengths, bit for bit. Picking the
//! closest sample instead would move segment boundaries (and therefore every
//! fit), so it is only done when asked for with `LookupMode::Nearest`.

use crate::domain::{ExclusionRange, LookupMode, SegmentIndexRange};
use crate::error::TransformError;

/// Map every exclusion range to the axis indices of its endpoints.
///
/// The result is checked to be in axis order and non-overlapping.
pub fn locate_ranges(
    axis: &[f64],
    ranges: &[ExclusionRange],
    mode: LookupMode,
) -> Result<Vec<SegmentIndexRange>, TransformError> {
    let mut out: Vec<SegmentIndexRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        let start = locate_wavelength(axis, range.low, mode)?;
        let end = locate_wavelength(axis, range.high, mode)?;
        if start > end {
            return Err(TransformError::Config(format!(
                "exclusion range {range} runs against the axis direction (index {start} > {end})"
            )));
        }
        if let Some(prev) = out.last() {
            if start < prev.end {
                return Err(TransformError::Config(format!(
                    "exclusion range {range} overlaps or precedes the previous range (index {start} < {})",
                    prev.end
                )));
            }
        }
        log::debug!("exclusion range {range} -> indices [{start}, {end}]");
        out.push(SegmentIndexRange { start, end });
    }
    Ok(out)
}

/// Index of `wavelength` on `axis`.
pub fn locate_wavelength(axis: &[f64], wavelength: f64, mode: LookupMode) -> Result<usize, TransformError> {
    match mode {
        LookupMode::Exact => axis
            .iter()
            .position(|&w| w == wavelength)
            .ok_or(TransformError::Lookup { wavelength }),
        LookupMode::Nearest => nearest_index(axis, wavelength),
    }
}

fn nearest_index(axis: &[f64], wavelength: f64) -> Result<usize, TransformError> {
    if !wavelength.is_finite() {
        return Err(TransformError::Lookup { wavelength });
    }

    let (lo, hi) = axis
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &w| (lo.min(w), hi.max(w)));
    if !(lo..=hi).contains(&wavelength) {
        return Err(TransformError::Config(format!(
            "wavelength {wavelength} lies outside the axis [{lo}, {hi}]"
        )));
    }

    let mut best = None;
    let mut best_dist = f64::INFINITY;
    for (i, &w) in axis.iter().enumerate() {
        let dist = (w - wavelength).abs();
        if dist < best_dist {
            best = Some(i);
            best_dist = dist;
        }
    }
    best.ok_or(TransformError::Lookup { wavelength })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis() -> Vec<f64> {
        (0..100).map(|i| i as f64).collect()
    }

    #[test]
    fn exact_lookup_finds_sampled_endpoints() {
        let ranges = [ExclusionRange::new(40.0, 50.0), ExclusionRange::new(70.0, 75.0)];
        let idx = locate_ranges(&axis(), &ranges, LookupMode::Exact).unwrap();
        assert_eq!(
            idx,
            vec![
                SegmentIndexRange { start: 40, end: 50 },
                SegmentIndexRange { start: 70, end: 75 }
            ]
        );
    }

    #[test]
    fn exact_lookup_rejects_unsampled_endpoint() {
        let ranges = [ExclusionRange::new(40.5, 50.0)];
        let err = locate_ranges(&axis(), &ranges, LookupMode::Exact).unwrap_err();
        assert_eq!(err, TransformError::Lookup { wavelength: 40.5 });
    }

    #[test]
    fn nearest_lookup_snaps_inside_axis() {
        let ranges = [ExclusionRange::new(40.4, 49.6)];
        let idx = locate_ranges(&axis(), &ranges, LookupMode::Nearest).unwrap();
        assert_eq!(idx, vec![SegmentIndexRange { start: 40, end: 50 }]);

        let outside = [ExclusionRange::new(90.0, 120.0)];
        let err = locate_ranges(&axis(), &outside, LookupMode::Nearest).unwrap_err();
        assert!(matches!(err, TransformError::Config(_)));
    }

    #[test]
    fn overlapping_or_reversed_ranges_fail_fast() {
        let overlapping = [ExclusionRange::new(40.0, 50.0), ExclusionRange::new(45.0, 60.0)];
        assert!(matches!(
            locate_ranges(&axis(), &overlapping, LookupMode::Exact),
            Err(TransformError::Config(_))
        ));

        let reversed = [ExclusionRange::new(50.0, 40.0)];
        assert!(matches!(
            locate_ranges(&axis(), &reversed, LookupMode::Exact),
            Err(TransformError::Config(_))
        ));
    }

    #[test]
    fn descending_axis_uses_index_order() {
        let desc: Vec<f64> = (0..20).rev().map(|i| i as f64).collect();
        let ranges = [ExclusionRange::new(15.0, 10.0)];
        let idx = locate_ranges(&desc, &ranges, LookupMode::Exact).unwrap();
        assert_eq!(idx, vec![SegmentIndexRange { start: 4, end: 9 }]);
    }
}
