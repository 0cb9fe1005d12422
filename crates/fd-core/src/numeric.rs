//! Scalar helpers shared by the model, assembly and loop layers.

use crate::FdError;

/// Scalar type of every model, cost and constraint quantity.
pub type Real = f64;

/// Absolute/relative tolerance pair for scale-aware comparisons.
///
/// Flux linkages live around 1e-1 Wb while voltages reach several hundred
/// volts, so a single absolute epsilon fits neither; comparisons widen with
/// the magnitude of the quantity being compared.
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

impl Tolerances {
    /// Admissible slack around a quantity of the given magnitude.
    pub fn slack(&self, scale: Real) -> Real {
        self.abs + self.rel * scale.abs()
    }
}

/// Scale-aware equality up to the tolerance pair.
pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    (a - b).abs() <= tol.slack(a.abs().max(b.abs()))
}

/// Guard a computed quantity against NaN/inf leaking downstream.
pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, FdError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FdError::NonFinite { what, value: v })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slack_widens_with_magnitude() {
        let tol = Tolerances::default();
        // Voltage-scale quantities tolerate a proportionally larger slack
        // than flux-scale ones.
        assert!(tol.slack(386.6) > tol.slack(0.084));
        assert!(nearly_equal(386.6, 386.6 + 1e-10, tol));
        assert!(!nearly_equal(0.084, 0.085, tol));
    }

    #[test]
    fn zero_scale_falls_back_to_absolute() {
        let tol = Tolerances::default();
        assert!(nearly_equal(0.0, 5e-13, tol));
        assert!(!nearly_equal(0.0, 1e-9, tol));
    }

    #[test]
    fn ensure_finite_rejects_nan_and_inf() {
        assert!(ensure_finite(0.084, "flux").is_ok());
        assert!(ensure_finite(Real::NAN, "flux").is_err());
        assert!(ensure_finite(Real::INFINITY, "voltage").is_err());
    }
}
