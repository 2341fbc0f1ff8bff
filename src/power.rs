// SPDX-License-Identifier: AGPL-3.0-only

//! PowerHandler: turn a graph-level power-constant operand into an
//! [`Activation::Power`], and recognize the identity-exponent shortcut that
//! lets the Facade skip PivotSearch entirely.

use crate::activation::Activation;
use crate::error::Error;
use crate::segment::Segment;

/// Lower domain edge used for the identity shortcut's two segments. Wide
/// enough to cover any i32-quantized accelerator input without relying on
/// the true unbounded domain, which `Segment` cannot represent.
pub const IDENTITY_LOWER: f64 = i32::MIN as f64;
/// Upper domain edge counterpart to [`IDENTITY_LOWER`].
pub const IDENTITY_UPPER: f64 = i32::MAX as f64;

/// The scalar constant types a graph's power operand may arrive as. Exactly
/// one element is accepted; anything else is `UnsupportedType`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstantElement {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl ConstantElement {
    fn as_f64(&self) -> f64 {
        match *self {
            ConstantElement::I8(v) => v as f64,
            ConstantElement::I16(v) => v as f64,
            ConstantElement::I32(v) => v as f64,
            ConstantElement::I64(v) => v as f64,
            ConstantElement::U8(v) => v as f64,
            ConstantElement::U16(v) => v as f64,
            ConstantElement::U32(v) => v as f64,
            ConstantElement::U64(v) => v as f64,
            ConstantElement::F32(v) => v as f64,
            ConstantElement::F64(v) => v,
        }
    }
}

/// Extract the scalar exponent `p` from a constant operand. The operand must
/// carry exactly one element; an empty or multi-element constant is not a
/// scalar exponent and is rejected as `UnsupportedType`, not silently
/// reduced to its first element.
pub fn extract_exponent(elements: &[ConstantElement]) -> Result<f64, Error> {
    match elements {
        [single] => {
            let p = single.as_f64();
            if !p.is_finite() {
                Err(Error::UnsupportedType { reason: format!("exponent constant is not finite: {p}") })
            } else {
                Ok(p)
            }
        }
        [] => Err(Error::UnsupportedType { reason: "power exponent constant is empty".to_string() }),
        _ => Err(Error::UnsupportedType {
            reason: format!("power exponent constant has {} elements, expected exactly 1", elements.len()),
        }),
    }
}

/// Whether `p` is close enough to `1.0` that `(scale·x + shift)^p` collapses
/// to the affine operand itself, bypassing the PWL search.
pub fn is_identity_exponent(p: f64) -> bool {
    (p - 1.0).abs() <= f64::EPSILON
}

/// Build the `Activation::Power` for a non-identity exponent, and surface
/// `InvalidDomain` immediately when a fractional exponent's domain would
/// need to cross the base's zero — this crate does not guess at a
/// continuation for `(scale·x + shift)^p` when `scale·x + shift` goes
/// negative and `p` is non-integer.
pub fn build_power_activation(p: f64, scale: f64, shift: f64, lower: f64, upper: f64) -> Result<Activation, Error> {
    if scale == 0.0 || !scale.is_finite() || !shift.is_finite() {
        return Err(Error::InvalidDomain { reason: format!("power operand has a degenerate affine term (scale = {scale}, shift = {shift})") });
    }
    if p.fract() != 0.0 {
        let zero = -shift / scale;
        if lower < zero && upper > zero {
            return Err(Error::InvalidDomain {
                reason: format!("fractional power p = {p} crosses the affine zero at x = {zero} inside [{lower}, {upper}]"),
            });
        }
    }
    Ok(Activation::Power { p, scale, shift })
}

/// The two-segment PWL `y = x` over `[IDENTITY_LOWER, IDENTITY_UPPER]`: one
/// real segment plus the terminal sentinel, matching every other search
/// result's shape.
pub fn identity_segments() -> Vec<Segment> {
    vec![Segment::new(IDENTITY_LOWER, 1.0, 0.0), Segment::terminal(IDENTITY_UPPER)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_exponent_accepts_exactly_one_element() {
        assert_eq!(extract_exponent(&[ConstantElement::I32(2)]).unwrap(), 2.0);
        assert!(extract_exponent(&[]).is_err());
        assert!(extract_exponent(&[ConstantElement::I32(2), ConstantElement::I32(3)]).is_err());
    }

    #[test]
    fn identity_exponent_detects_one_within_epsilon() {
        assert!(is_identity_exponent(1.0));
        assert!(!is_identity_exponent(1.01));
        assert!(!is_identity_exponent(2.0));
    }

    #[test]
    fn fractional_power_crossing_zero_is_invalid_domain() {
        let err = build_power_activation(0.5, 1.0, 0.0, -1.0, 1.0).unwrap_err();
        assert!(matches!(err, Error::InvalidDomain { .. }));
    }

    #[test]
    fn fractional_power_entirely_on_one_side_is_accepted() {
        let act = build_power_activation(0.5, 1.0, 0.0, 1.0, 4.0).unwrap();
        assert!(matches!(act, Activation::Power { p, .. } if p == 0.5));
    }

    #[test]
    fn integer_power_never_checks_the_crossing() {
        let act = build_power_activation(2.0, 1.0, 0.0, -1.0, 1.0).unwrap();
        assert!(matches!(act, Activation::Power { p, .. } if p == 2.0));
    }

    #[test]
    fn identity_segments_cover_the_full_i32_range() {
        let segs = identity_segments();
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].alpha, IDENTITY_LOWER);
        assert_eq!(segs[1].alpha, IDENTITY_UPPER);
    }
}
