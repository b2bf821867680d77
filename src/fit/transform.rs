//! Whole-spectrum smoothing.
//!
//! Steps:
//! 1) validate the axis/flux pair
//! 2) place the exclusion ranges on the axis (`locator`)
//! 3) split the axis into continuum segments between the ranges
//! 4) fit each segment (`segment`) and write it into both outputs
//! 5) blend the smoothed output back into the raw spectrum at every join (`blend`)
//!
//! A continuum segment runs from the upper endpoint pixel of the previous
//! range up to (not including) the lower endpoint pixel of the next one. The
//! upper endpoint is restored to its raw value by the zero-weight start of the
//! blend, so only the unblended output carries a fitted value there.

use crate::domain::{ContinuumSegment, ExclusionRange, SegmentIndexRange, SmoothOptions, TrailingRescale};
use crate::error::TransformError;
use crate::fit::blend::{end_blend, start_blend};
use crate::fit::locator::locate_ranges;
use crate::fit::segment::{SegmentRescale, fit_segment};

/// Per-segment record of what was fitted.
#[derive(Debug, Clone)]
pub struct FittedSegment {
    pub segment: ContinuumSegment,
    pub lambda_start: f64,
    pub lambda_end: f64,
    pub used: usize,
    pub rms: f64,
}

/// Output of a smoothing run.
#[derive(Debug, Clone)]
pub struct SmoothedSpectrum {
    /// Continuum fits blended into the raw spectrum.
    pub fitted: Vec<f64>,
    /// Continuum fits without blending (diagnostics only).
    pub unblended: Vec<f64>,
    /// Exclusion ranges as axis indices.
    pub index_ranges: Vec<SegmentIndexRange>,
    pub segments: Vec<FittedSegment>,
}

/// Smooth `flux` outside `ranges`.
pub fn smooth_spectrum(
    axis: &[f64],
    flux: &[f64],
    ranges: &[ExclusionRange],
    opts: &SmoothOptions,
) -> Result<SmoothedSpectrum, TransformError> {
    validate_inputs(axis, flux)?;

    let index_ranges = locate_ranges(axis, ranges, opts.lookup)?;
    let n = axis.len();
    let axis_span = axis_span(axis);

    let mut fitted = flux.to_vec();
    let mut unblended = flux.to_vec();
    let mut segments = Vec::new();
    let width = opts.blend_width;

    for segment in continuum_segments(n, &index_ranges) {
        let rescale = match (segment.trailing, opts.trailing_rescale) {
            (true, TrailingRescale::AxisSpan) => SegmentRescale::Span(axis_span),
            _ => SegmentRescale::Own,
        };

        let lambda_start = axis[segment.start];
        let lambda_end = axis[segment.end - 1];
        log::info!("Fitting polynomial from λ={lambda_start} to λ={lambda_end}");

        let fit = fit_segment(axis, flux, segment, opts.order, rescale)?;

        fitted[segment.start..segment.end].copy_from_slice(&fit.values);
        unblended[segment.start..segment.end].copy_from_slice(&fit.values);

        let blend_start = segment.start > 0;
        let blend_end = segment.end < n;
        if width > 0 && blend_start && blend_end && segment.len() < 2 * width {
            log::warn!(
                "Segment [{}, {}) is shorter than two blend windows ({width} px each); blends overlap",
                segment.start,
                segment.end
            );
        }

        if blend_start {
            start_blend(
                0,
                width,
                opts.blend_weighting,
                &mut fitted[segment.start..segment.end],
                &flux[segment.start..segment.end],
            );
        }
        if blend_end {
            // Include the join pixel so offset 0 lands on it.
            end_blend(
                segment.len(),
                width,
                opts.blend_weighting,
                &mut fitted[segment.start..=segment.end],
                &flux[segment.start..=segment.end],
            );
        }

        segments.push(FittedSegment {
            segment,
            lambda_start,
            lambda_end,
            used: fit.used,
            rms: fit.rms,
        });
    }

    Ok(SmoothedSpectrum {
        fitted,
        unblended,
        index_ranges,
        segments,
    })
}

/// Continuum segments of an axis of `n` samples around `index_ranges`.
///
/// Segments without continuum pixels are skipped: an empty leading segment
/// (a range starting at pixel 0) and any later segment holding nothing but
/// the previous range's upper endpoint.
pub fn continuum_segments(n: usize, index_ranges: &[SegmentIndexRange]) -> Vec<ContinuumSegment> {
    if index_ranges.is_empty() {
        return if n > 0 {
            vec![ContinuumSegment {
                start: 0,
                end: n,
                trailing: false,
            }]
        } else {
            Vec::new()
        };
    }

    let mut out = Vec::with_capacity(index_ranges.len() + 1);
    let mut start = 0;
    let mut follows_range = false;

    let bounds = index_ranges
        .iter()
        .map(|r| (r.start, r.end, false))
        .chain(std::iter::once((n, n, true)));

    for (end, next_start, trailing) in bounds {
        let min_len = if follows_range { 2 } else { 1 };
        if end >= start + min_len {
            out.push(ContinuumSegment { start, end, trailing });
        }
        start = next_start;
        follows_range = true;
    }

    out
}

fn validate_inputs(axis: &[f64], flux: &[f64]) -> Result<(), TransformError> {
    if axis.is_empty() {
        return Err(TransformError::Config("the spectrum has no samples".to_string()));
    }
    if axis.len() != flux.len() {
        return Err(TransformError::Config(format!(
            "wavelength axis has {} samples but flux has {}",
            axis.len(),
            flux.len()
        )));
    }
    if let Some(i) = axis.iter().position(|w| !w.is_finite()) {
        return Err(TransformError::Config(format!("wavelength at index {i} is not finite")));
    }

    let increasing = axis.windows(2).all(|w| w[1] > w[0]);
    let decreasing = axis.windows(2).all(|w| w[1] < w[0]);
    if !(increasing || decreasing) {
        return Err(TransformError::Config(
            "wavelength axis is not strictly monotonic".to_string(),
        ));
    }
    Ok(())
}

fn axis_span(axis: &[f64]) -> f64 {
    let (lo, hi) = axis
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &w| (lo.min(w), hi.max(w)));
    hi - lo
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BlendWeighting, LookupMode};

    fn sine_case() -> (Vec<f64>, Vec<f64>) {
        let axis: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let flux: Vec<f64> = axis.iter().map(|x| x.sin()).collect();
        (axis, flux)
    }

    fn opts(order: usize, blend_width: usize) -> SmoothOptions {
        SmoothOptions {
            order,
            blend_width,
            ..SmoothOptions::default()
        }
    }

    fn bits(values: &[f64]) -> Vec<u64> {
        values.iter().map(|v| v.to_bits()).collect()
    }

    #[test]
    fn no_ranges_is_one_global_fit() {
        let (axis, flux) = sine_case();
        let out = smooth_spectrum(&axis, &flux, &[], &opts(4, 10)).unwrap();

        let whole = ContinuumSegment {
            start: 0,
            end: 100,
            trailing: false,
        };
        let global = fit_segment(&axis, &flux, whole, 4, SegmentRescale::Own).unwrap();
        assert_eq!(out.segments.len(), 1);
        assert_eq!(bits(&out.fitted), bits(&global.values));
        assert_eq!(bits(&out.unblended), bits(&global.values));
    }

    #[test]
    fn sine_with_one_window() {
        let (axis, flux) = sine_case();
        let ranges = [ExclusionRange::new(40.0, 50.0)];
        let out = smooth_spectrum(&axis, &flux, &ranges, &opts(3, 5)).unwrap();

        assert_eq!(out.index_ranges, vec![SegmentIndexRange { start: 40, end: 50 }]);
        assert_eq!(out.segments.len(), 2);

        // Window preserved in the blended output, endpoints included.
        assert_eq!(bits(&out.fitted[40..=50]), bits(&flux[40..=50]));
        // Unblended keeps the window up to (not including) its upper endpoint.
        assert_eq!(bits(&out.unblended[40..50]), bits(&flux[40..50]));

        // Leading segment: pure cubic fit, end blend over 36..=40.
        let lead = ContinuumSegment {
            start: 0,
            end: 40,
            trailing: false,
        };
        let lead_fit = fit_segment(&axis, &flux, lead, 3, SegmentRescale::Own).unwrap();
        assert_eq!(bits(&out.unblended[0..40]), bits(&lead_fit.values));
        assert_eq!(bits(&out.fitted[0..36]), bits(&lead_fit.values[0..36]));
        let i = 36;
        let (lo, hi) = if flux[i] < lead_fit.values[i] {
            (flux[i], lead_fit.values[i])
        } else {
            (lead_fit.values[i], flux[i])
        };
        assert!(out.fitted[i] > lo && out.fitted[i] < hi);

        // Trailing segment: scaled by the whole axis span, start blend over 50..55.
        let tail = ContinuumSegment {
            start: 50,
            end: 100,
            trailing: true,
        };
        let tail_fit = fit_segment(&axis, &flux, tail, 3, SegmentRescale::Span(99.0)).unwrap();
        assert_eq!(bits(&out.unblended[50..100]), bits(&tail_fit.values));
        assert_eq!(bits(&out.fitted[55..100]), bits(&tail_fit.values[5..]));
        let i = 54;
        let v = out.fitted[i];
        let expected = 0.2 * flux[i] + 0.8 * tail_fit.values[i - 50];
        assert!((v - expected).abs() < 1e-12);
    }

    #[test]
    fn segment_rescale_option_changes_only_the_tail() {
        let (axis, flux) = sine_case();
        let ranges = [ExclusionRange::new(40.0, 50.0)];
        let mut o = opts(3, 5);
        o.trailing_rescale = TrailingRescale::Segment;
        let out = smooth_spectrum(&axis, &flux, &ranges, &o).unwrap();

        let tail = ContinuumSegment {
            start: 50,
            end: 100,
            trailing: true,
        };
        let tail_fit = fit_segment(&axis, &flux, tail, 3, SegmentRescale::Own).unwrap();
        assert_eq!(bits(&out.unblended[50..100]), bits(&tail_fit.values));
    }

    #[test]
    fn interiors_are_untouched_in_both_outputs() {
        let axis: Vec<f64> = (0..200).map(|i| 0.6 + i as f64 * 0.002).collect();
        let flux: Vec<f64> = axis.iter().map(|&w| 1.0 + 0.3 * (w * 40.0).cos()).collect();
        let ranges = [
            ExclusionRange::new(axis[30], axis[45]),
            ExclusionRange::new(axis[100], axis[130]),
        ];
        let out = smooth_spectrum(&axis, &flux, &ranges, &opts(5, 10)).unwrap();

        for r in &out.index_ranges {
            assert_eq!(bits(&out.fitted[r.start..=r.end]), bits(&flux[r.start..=r.end]));
            assert_eq!(bits(&out.unblended[r.start..r.end]), bits(&flux[r.start..r.end]));
        }
        assert_eq!(out.segments.len(), 3);
    }

    #[test]
    fn ranges_at_the_axis_edges_skip_empty_segments() {
        let (axis, flux) = sine_case();
        let ranges = [ExclusionRange::new(0.0, 10.0), ExclusionRange::new(90.0, 99.0)];
        let out = smooth_spectrum(&axis, &flux, &ranges, &opts(3, 5)).unwrap();

        assert_eq!(out.segments.len(), 1);
        assert_eq!(
            out.segments[0].segment,
            ContinuumSegment {
                start: 10,
                end: 90,
                trailing: false
            }
        );
        assert_eq!(bits(&out.fitted[0..=10]), bits(&flux[0..=10]));
        assert_eq!(bits(&out.fitted[90..]), bits(&flux[90..]));
        assert_eq!(bits(&out.unblended[90..]), bits(&flux[90..]));
    }

    #[test]
    fn short_segment_is_a_fit_error() {
        let axis: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let flux = vec![1.0; 20];
        let ranges = [ExclusionRange::new(5.0, 15.0)];
        let err = smooth_spectrum(&axis, &flux, &ranges, &opts(5, 2)).unwrap_err();
        assert!(matches!(err, TransformError::Fit { start: 0, end: 5, .. }));
    }

    #[test]
    fn unsampled_endpoint_is_a_lookup_error() {
        let (axis, flux) = sine_case();
        let ranges = [ExclusionRange::new(40.25, 50.0)];
        let err = smooth_spectrum(&axis, &flux, &ranges, &opts(3, 5)).unwrap_err();
        assert_eq!(err, TransformError::Lookup { wavelength: 40.25 });

        let mut o = opts(3, 5);
        o.lookup = LookupMode::Nearest;
        assert!(smooth_spectrum(&axis, &flux, &ranges, &o).is_ok());
    }

    #[test]
    fn malformed_inputs_are_config_errors() {
        let axis = vec![0.0, 1.0, 2.0];
        assert!(matches!(
            smooth_spectrum(&axis, &[1.0, 2.0], &[], &opts(1, 1)),
            Err(TransformError::Config(_))
        ));
        assert!(matches!(
            smooth_spectrum(&[0.0, 2.0, 1.0], &[1.0, 2.0, 3.0], &[], &opts(1, 1)),
            Err(TransformError::Config(_))
        ));
        assert!(matches!(
            smooth_spectrum(&[], &[], &[], &opts(1, 1)),
            Err(TransformError::Config(_))
        ));
    }

    #[test]
    fn fixed_tenth_weighting_matches_linear_at_default_width() {
        let (axis, flux) = sine_case();
        let ranges = [ExclusionRange::new(40.0, 50.0)];
        let linear = smooth_spectrum(&axis, &flux, &ranges, &opts(3, 10)).unwrap();
        let mut o = opts(3, 10);
        o.blend_weighting = BlendWeighting::FixedTenth;
        let tenth = smooth_spectrum(&axis, &flux, &ranges, &o).unwrap();
        for (a, b) in linear.fitted.iter().zip(tenth.fitted.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn segments_between_ranges() {
        let idx = [
            SegmentIndexRange { start: 5, end: 10 },
            SegmentIndexRange { start: 11, end: 15 },
            SegmentIndexRange { start: 15, end: 18 },
        ];
        let segs = continuum_segments(30, &idx);
        assert_eq!(
            segs,
            vec![
                ContinuumSegment { start: 0, end: 5, trailing: false },
                ContinuumSegment { start: 18, end: 30, trailing: true },
            ]
        );
    }
}
