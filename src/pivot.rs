// SPDX-License-Identifier: AGPL-3.0-only

//! PivotSearch: the equioscillation descent that places interior pivots for
//! a fixed segment count `N`.
//!
//! This is the numerically-heavy kernel of the crate (the analogue of the
//! Clenshaw recurrence in a Chebyshev toolkit): a tight per-iteration loop
//! over small scratch arrays, no allocation beyond the per-call arrays
//! themselves, and a convergence test that must not be fooled by a single
//! lucky iteration (hence the `same_epsilon` second-chance flag below).

use crate::activation::{Activation, FnTraits, DEFAULT_SPREAD_THRESHOLD, SMALL_DENOM_EPS};
use crate::error::Error;
use crate::segment::Segment;

/// Fit `N` segments to `traits` over `[a0, a_n]`, returning the finished
/// segments together with the final equioscillation error.
///
/// The returned segments are in the *raw* sign convention: when `negative`
/// is `true`, `(slope, intercept)` approximate `-f(x)`, not `f(x)` — the
/// caller (`segment_search`) is responsible for undoing that flip. This
/// mirrors the α/ε formulas directly, which bake a sign `s` into every
/// occurrence of `f`/`f′` rather than correcting the output afterward.
///
/// `eps_allowed` is part of the contract for interface parity with the
/// specification, but the completion test below is the spread test only —
/// PivotSearch does not special-case an early exit against the caller's
/// error budget; that comparison belongs to ErrorMetric/SegmentSearch.
pub(crate) fn search(
    traits: &Activation,
    n: usize,
    a0: f64,
    a_n: f64,
    negative: bool,
    _eps_allowed: f64,
) -> Result<(Vec<Segment>, f64), Error> {
    let max_iterations = traits.max_iterations();
    let sign = if negative { -1.0 } else { 1.0 };

    let mut t: Vec<f64> = (0..n)
        .map(|i| a0 + ((i + 1) as f64 / (n + 1) as f64) * (a_n - a0))
        .collect();
    let mut t_prev = t.clone();
    let mut delta = 1.0_f64;
    let mut eps_max_prev: Option<f64> = None;
    let mut same_epsilon = false;

    for _attempt in 0..max_iterations {
        let alpha = match compute_alpha(traits, &t, a0, a_n)? {
            Some(alpha) => alpha,
            None => {
                // Near-singular tangent-derivative denominator: treat this
                // step as a local non-convergence rather than dividing by
                // (near) zero.
                t = t_prev.clone();
                delta *= 0.5;
                continue;
            }
        };
        let eps = compute_eps(traits, &t, &alpha, sign, a_n)?;
        let eps_max = eps.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        let eps_min = eps.iter().fold(f64::INFINITY, |m, v| m.min(v.abs()));

        if let Some(prev) = eps_max_prev {
            if eps_max > prev {
                t = t_prev.clone();
                delta *= 0.5;
                continue;
            } else if eps_max == prev {
                if same_epsilon {
                    t = t_prev.clone();
                    delta *= 0.5;
                    same_epsilon = false;
                    continue;
                }
                same_epsilon = true;
            } else {
                same_epsilon = false;
            }
        }

        if eps_max - eps_min < DEFAULT_SPREAD_THRESHOLD * eps_min {
            let eps_final = (eps_max + eps_min) / 4.0;
            let segments = emit_segments(traits, &t, &alpha, sign, eps_final, a_n)?;
            return Ok((segments, eps_final));
        }

        match descent_step(&t, &alpha, &eps, delta) {
            Some(next) => {
                t_prev = t;
                t = next;
                eps_max_prev = Some(eps_max);
            }
            None => {
                t = t_prev.clone();
                delta *= 0.5;
            }
        }
    }

    Err(Error::NotConverged { last_epsilon: eps_max_prev.unwrap_or(f64::NAN) })
}

/// Pin the endpoints and solve the tangent-intersection formula for each
/// interior boundary. Returns `None` if a denominator is too small to
/// trust, signalling the caller to revert and halve the step size.
fn compute_alpha(traits: &Activation, t: &[f64], a0: f64, a_n: f64) -> Result<Option<Vec<f64>>, Error> {
    let n = t.len();
    let mut alpha = vec![0.0; n + 1];
    alpha[0] = a0;
    alpha[n] = a_n;
    for i in 1..n {
        let f_prev = traits.value(t[i - 1]);
        let f_cur = traits.value(t[i]);
        let fp_prev = traits.deriv(t[i - 1]);
        let fp_cur = traits.deriv(t[i]);
        let denom = fp_cur - fp_prev;
        if denom.abs() < SMALL_DENOM_EPS {
            return Ok(None);
        }
        let a = (f_prev - f_cur + fp_cur * t[i] - fp_prev * t[i - 1]) / denom;
        if !a.is_finite() {
            return Err(Error::DomainError { x: t[i] });
        }
        alpha[i] = a;
    }
    Ok(Some(alpha))
}

/// Signed error at each segment boundary, per the interior/terminal
/// formulas. Any non-finite value is a genuine domain error (e.g. `Log`
/// near zero), not a step-size problem — it propagates immediately.
fn compute_eps(traits: &Activation, t: &[f64], alpha: &[f64], sign: f64, a_n: f64) -> Result<Vec<f64>, Error> {
    let n = t.len();
    let mut eps = vec![0.0; n + 1];
    for i in 0..n {
        let v = sign * (traits.deriv(t[i]) * (alpha[i] - t[i]) + traits.value(t[i]) - traits.value(alpha[i]));
        if !v.is_finite() {
            return Err(Error::DomainError { x: alpha[i] });
        }
        eps[i] = v;
    }
    let last = n - 1;
    let terminal = sign * (traits.deriv(t[last]) * (a_n - t[last]) + traits.value(t[last]) - traits.value(a_n));
    if !terminal.is_finite() {
        return Err(Error::DomainError { x: a_n });
    }
    eps[n] = terminal;
    Ok(eps)
}

/// One descent step over all tangent points. Returns `None` if any step is
/// non-finite (a near-degenerate segment), signalling a local regression.
fn descent_step(t: &[f64], alpha: &[f64], eps: &[f64], delta: f64) -> Option<Vec<f64>> {
    let n = t.len();
    let mut next = Vec::with_capacity(n);
    for i in 0..n {
        let denom = eps[i + 1] / (alpha[i + 1] - t[i]) + eps[i] / (t[i] - alpha[i]);
        let d = delta * (eps[i + 1] - eps[i]) / denom;
        let t_next = t[i] + d;
        if !t_next.is_finite() {
            return None;
        }
        next.push(t_next);
    }
    Some(next)
}

/// Emit the finished segments: the equioscillation-centered tangent line
/// through each `t[i]`, plus the terminal sentinel.
fn emit_segments(
    traits: &Activation,
    t: &[f64],
    alpha: &[f64],
    sign: f64,
    eps_final: f64,
    a_n: f64,
) -> Result<Vec<Segment>, Error> {
    let n = t.len();
    let mut segments = Vec::with_capacity(n + 1);
    for i in 0..n {
        let fp = traits.deriv(t[i]);
        let f = traits.value(t[i]);
        let v = sign * fp * (alpha[i] - t[i]) + sign * f - eps_final;
        let v_next = sign * fp * (alpha[i + 1] - t[i]) + sign * f - eps_final;
        if !v.is_finite() || !v_next.is_finite() {
            return Err(Error::DomainError { x: t[i] });
        }
        let m = (v_next - v) / (alpha[i + 1] - alpha[i]);
        let b = v - m * alpha[i];
        segments.push(Segment::new(alpha[i], m, b));
    }
    segments.push(Segment::terminal(a_n));
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_segment_sigmoid_right_half_converges() {
        let (segs, eps) = search(&Activation::Sigmoid, 1, 0.0, 5.0, false, 0.01).unwrap();
        assert_eq!(segs.len(), 2);
        assert!(eps.is_finite());
        assert!(segs[0].alpha == 0.0);
        assert!(segs[1].alpha == 5.0);
    }

    #[test]
    fn alpha_is_strictly_increasing_for_several_segments() {
        let (segs, _eps) = search(&Activation::Tanh, 4, -5.0, 5.0, false, 0.005).unwrap();
        assert_eq!(segs.len(), 5);
        for w in segs.windows(2) {
            assert!(w[0].alpha < w[1].alpha);
        }
        assert_eq!(segs.first().unwrap().alpha, -5.0);
        assert_eq!(segs.last().unwrap().alpha, 5.0);
    }

    #[test]
    fn exp_runs_with_negative_flag_without_domain_error() {
        let (segs, _eps) = search(&Activation::Exp, 6, -4.0, 5.0, true, 0.01).unwrap();
        assert_eq!(segs.len(), 7);
    }
}
