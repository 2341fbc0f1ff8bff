// SPDX-License-Identifier: AGPL-3.0-only

//! Per-activation-kind analytic properties.
//!
//! [`Activation`] is the tagged variant over the function families this
//! crate knows how to approximate; [`FnTraits`] is the kind-dispatched
//! bundle PivotSearch, ErrorMetric and DomainSplitter read from it. There is
//! exactly one implementation, on `Activation` itself, dispatching on the
//! variant — no generic scalar abstraction is needed here, every value in
//! this crate is a plain `f64`.

/// Empirical break-point for `Exp`, where the derivative-symmetry handling
/// in `DomainSplitter` flips sign. Carried as a named constant per the
/// design notes rather than inlined.
pub const EXP_BREAK: f64 = 0.045;

/// Default equioscillation spread threshold used by PivotSearch's
/// completion test: `εmax − εmin < threshold · εmin`.
pub const DEFAULT_SPREAD_THRESHOLD: f64 = 0.1;

/// Number of uniformly spaced samples ErrorMetric evaluates per call.
pub const ERROR_METRIC_SAMPLES: usize = 500;

/// Per-function cap on segment count.
pub const MAX_SEGMENTS: usize = 128;

/// Default iteration cap for PivotSearch.
pub const MAX_ITERATIONS: usize = 2000;

/// Iteration cap for `Log`, which converges more slowly near its domain edge.
pub const MAX_ITERATIONS_LOG: usize = 5000;

/// A small-denominator guard for the α-intersection formula: when the two
/// tangent derivatives are this close, the intersection is numerically
/// unreliable and the iteration treats the step as a local regression
/// rather than dividing by (near) zero.
pub(crate) const SMALL_DENOM_EPS: f64 = 1e-12;

/// `Log`'s canonical domain is the open interval `(0, inf)`; `ln` itself is
/// undefined at the closed edge. This is the nearest representable lower
/// bound the Facade clips an unbounded caller request to, so the first
/// ErrorMetric sample never lands exactly on the singularity.
pub const LOG_DOMAIN_EPS: f64 = 1e-6;

/// The scalar activation families this crate can turn into a PWL.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activation {
    Sigmoid,
    Tanh,
    Exp,
    Log,
    SoftSign,
    /// `y = (scale·x + shift)^p`. `scale`/`shift` default to `1.0`/`0.0` for
    /// a bare `x^p`; they exist for a fused power-with-affine operand.
    Power { p: f64, scale: f64, shift: f64 },
    Identity,
}

/// Per-kind analytic properties used by the PWL search.
///
/// All methods must be numerically stable on the declared domain and must
/// not allocate or perform I/O — they are called from the innermost loop of
/// PivotSearch and ErrorMetric.
pub trait FnTraits {
    /// `f(x)`.
    fn value(&self, x: f64) -> f64;
    /// `f′(x)`.
    fn deriv(&self, x: f64) -> f64;
    /// Canonical lower domain bound (may be `-inf`).
    fn lower_bound(&self) -> f64;
    /// Canonical upper domain bound (may be `+inf`).
    fn upper_bound(&self) -> f64;
    /// Inflection/parity boundary inside the domain, if any.
    fn break_point(&self) -> Option<f64>;
    /// Per-function cap on segment count.
    fn max_segments(&self) -> usize;
    /// Per-function cap on PivotSearch iterations.
    fn max_iterations(&self) -> usize;
    /// Whether a sub-domain search with this upper bound should run with
    /// the sign-flipped (`s = -1`) variant of the equioscillation formulas.
    fn is_negative(&self, upper: f64) -> bool;
}

impl FnTraits for Activation {
    fn value(&self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Tanh => x.tanh(),
            Activation::Exp => x.exp(),
            Activation::Log => x.ln(),
            Activation::SoftSign => x / (1.0 + x.abs()),
            Activation::Power { p, scale, shift } => (scale * x + shift).powf(*p),
            Activation::Identity => x,
        }
    }

    fn deriv(&self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => {
                let s = self.value(x);
                s * (1.0 - s)
            }
            Activation::Tanh => {
                let t = x.tanh();
                1.0 - t * t
            }
            Activation::Exp => x.exp(),
            Activation::Log => 1.0 / x,
            Activation::SoftSign => {
                let d = 1.0 + x.abs();
                1.0 / (d * d)
            }
            Activation::Power { p, scale, shift } => {
                let u = scale * x + shift;
                p * scale * u.powf(p - 1.0)
            }
            Activation::Identity => 1.0,
        }
    }

    fn lower_bound(&self) -> f64 {
        match self {
            Activation::Log => LOG_DOMAIN_EPS,
            // Fractional p has no real value for a negative base; clip to
            // the zero of the affine argument. Integer p needs no clip.
            Activation::Power { p, scale, shift } if p.fract() != 0.0 => -shift / scale,
            _ => f64::NEG_INFINITY,
        }
    }

    fn upper_bound(&self) -> f64 {
        f64::INFINITY
    }

    fn break_point(&self) -> Option<f64> {
        match self {
            Activation::Sigmoid | Activation::Tanh | Activation::SoftSign => Some(0.0),
            Activation::Exp => Some(EXP_BREAK),
            Activation::Power { scale, shift, .. } => Some(-shift / scale),
            Activation::Log | Activation::Identity => None,
        }
    }

    fn max_segments(&self) -> usize {
        MAX_SEGMENTS
    }

    fn max_iterations(&self) -> usize {
        match self {
            Activation::Log => MAX_ITERATIONS_LOG,
            _ => MAX_ITERATIONS,
        }
    }

    fn is_negative(&self, upper: f64) -> bool {
        match self {
            Activation::Exp => true,
            Activation::Sigmoid | Activation::Tanh | Activation::SoftSign => upper <= 0.0,
            Activation::Power { p, .. } => {
                if p.fract() == 0.0 {
                    let pi = *p as i64;
                    // Even powers are convex everywhere, like Exp, and run
                    // negated unconditionally; odd powers inflect at the
                    // break point like the S-shaped kinds above.
                    pi % 2 == 0 || upper <= 0.0
                } else {
                    false
                }
            }
            Activation::Log | Activation::Identity => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_value_and_deriv_at_zero() {
        assert!((Activation::Sigmoid.value(0.0) - 0.5).abs() < 1e-15);
        assert!((Activation::Sigmoid.deriv(0.0) - 0.25).abs() < 1e-15);
    }

    #[test]
    fn tanh_is_odd() {
        let t = Activation::Tanh;
        for &x in &[0.3, 1.0, 2.5] {
            assert!((t.value(-x) + t.value(x)).abs() < 1e-12);
        }
    }

    #[test]
    fn softsign_matches_closed_form() {
        let s = Activation::SoftSign;
        assert!((s.value(10.0) - 10.0 / 11.0).abs() < 1e-15);
        assert!((s.value(-10.0) - (-10.0 / 11.0)).abs() < 1e-15);
    }

    #[test]
    fn exp_break_point_is_the_named_constant() {
        assert_eq!(Activation::Exp.break_point(), Some(EXP_BREAK));
    }

    #[test]
    fn log_has_no_break_point_and_a_near_zero_lower_bound() {
        assert_eq!(Activation::Log.break_point(), None);
        assert_eq!(Activation::Log.lower_bound(), LOG_DOMAIN_EPS);
    }

    #[test]
    fn log_gets_a_larger_iteration_cap() {
        assert_eq!(Activation::Log.max_iterations(), MAX_ITERATIONS_LOG);
        assert_eq!(Activation::Sigmoid.max_iterations(), MAX_ITERATIONS);
    }

    #[test]
    fn power_even_integer_is_unconditionally_negative() {
        let p = Activation::Power { p: 2.0, scale: 1.0, shift: 0.0 };
        assert!(p.is_negative(10.0));
        assert!(p.is_negative(-10.0));
    }

    #[test]
    fn power_odd_integer_follows_break_side() {
        let p = Activation::Power { p: 3.0, scale: 1.0, shift: 0.0 };
        assert!(p.is_negative(0.0));
        assert!(!p.is_negative(10.0));
    }

    #[test]
    fn power_fractional_clips_lower_bound_to_argument_zero() {
        let p = Activation::Power { p: 0.5, scale: 1.0, shift: 0.0 };
        assert_eq!(p.lower_bound(), 0.0);
        assert!(!p.is_negative(10.0));
    }

    #[test]
    fn sigmoid_is_negative_only_on_the_left_half() {
        assert!(Activation::Sigmoid.is_negative(0.0));
        assert!(!Activation::Sigmoid.is_negative(10.0));
    }
}
