use crate::{DrError, DrResult};

/// Floating point type used throughout system
pub type Real = f64;

/// Largest 32-bit signed integer. Field drain is clamped to it.
pub const INT32_MAX: Real = i32::MAX as Real;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> DrResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(DrError::NonFinite { what, value: v })
    }
}

/// Finite and >= 0.
pub fn ensure_non_negative(v: Real, what: &'static str) -> DrResult<Real> {
    let v = ensure_finite(v, what)?;
    if v < 0.0 {
        return Err(DrError::OutOfRange { what, value: v });
    }
    Ok(v)
}

/// `num / den`, or `fallback` when the denominator is zero or the quotient is
/// not finite.
pub fn ratio_or(num: Real, den: Real, fallback: Real) -> Real {
    if den == 0.0 {
        return fallback;
    }
    let r = num / den;
    if r.is_finite() { r } else { fallback }
}

/// Truncate toward zero into an unsigned integer. Negative and NaN inputs give 0.
pub fn trunc_u64(v: Real) -> u64 {
    if v.is_nan() || v <= 0.0 {
        0
    } else {
        v as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_non_negative_rejects_negative() {
        assert!(ensure_non_negative(0.0, "x").is_ok());
        assert!(matches!(
            ensure_non_negative(-1.0, "x"),
            Err(DrError::OutOfRange { .. })
        ));
        assert!(ensure_non_negative(Real::INFINITY, "x").is_err());
    }

    #[test]
    fn ratio_or_guards_zero_denominator() {
        assert_eq!(ratio_or(1.0, 0.0, 7.0), 7.0);
        assert_eq!(ratio_or(0.0, 0.0, 1.0), 1.0);
        assert_eq!(ratio_or(3.0, 4.0, 0.0), 0.75);
    }

    #[test]
    fn trunc_u64_truncates_toward_zero() {
        assert_eq!(trunc_u64(28_935_185.185), 28_935_185);
        assert_eq!(trunc_u64(0.999), 0);
        assert_eq!(trunc_u64(-5.0), 0);
        assert_eq!(trunc_u64(Real::NAN), 0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn ratio_or_is_always_finite(num in -1e12_f64..1e12, den in -1e3_f64..1e3) {
            prop_assert!(ratio_or(num, den, 0.0).is_finite());
        }
    }
}
