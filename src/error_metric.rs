// SPDX-License-Identifier: AGPL-3.0-only

//! ErrorMetric: sample a candidate PWL against the analytic function and
//! report the maximum absolute deviation. SegmentSearch is the only caller;
//! this never decides convergence on its own.

use crate::activation::{Activation, FnTraits, ERROR_METRIC_SAMPLES};
use crate::error::Error;
use crate::segment::{locate, Segment};

/// Maximum `|f(x) − pwl(x)|` over `ERROR_METRIC_SAMPLES` uniformly spaced
/// points in `[l, u]` (inclusive of both endpoints).
///
/// `segments` must already be in the true (non-negated) sign convention —
/// `segment_search` corrects sign before calling this, so the comparison
/// here is a plain difference, with no sign parameter, exactly as
/// specified.
pub(crate) fn max_abs_error(segments: &[Segment], traits: &Activation, l: f64, u: f64) -> Result<f64, Error> {
    let mut max_err = 0.0_f64;
    let step = (u - l) / (ERROR_METRIC_SAMPLES - 1) as f64;
    for k in 0..ERROR_METRIC_SAMPLES {
        let x = if k == ERROR_METRIC_SAMPLES - 1 { u } else { l + step * k as f64 };
        let exact = traits.value(x);
        if !exact.is_finite() {
            return Err(Error::DomainError { x });
        }
        let approx = locate(segments, x).eval(x);
        let err = (exact - approx).abs();
        if err > max_err {
            max_err = err;
        }
    }
    Ok(max_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::Segment;

    #[test]
    fn identity_segments_have_zero_error_against_the_identity_function() {
        let segs = vec![Segment::new(-1.0, 1.0, 0.0), Segment::terminal(1.0)];
        let err = max_abs_error(&segs, &Activation::Identity, -1.0, 1.0).unwrap();
        assert!(err < 1e-12);
    }

    #[test]
    fn a_mismatched_pwl_reports_a_positive_error() {
        let segs = vec![Segment::new(0.0, 0.0, 0.0), Segment::terminal(1.0)];
        let err = max_abs_error(&segs, &Activation::Identity, 0.0, 1.0).unwrap();
        assert!((err - 1.0).abs() < 1e-9);
    }
}
