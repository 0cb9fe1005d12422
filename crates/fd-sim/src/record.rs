//! Trajectory recording for closed-loop runs.
//!
//! Purely observational: the loop appends one state/control pair per sample;
//! downstream code compares the buffers against references and constraint
//! boundaries. Nothing here feeds back into the optimization.

use crate::error::{SimError, SimResult};
use fd_core::{Real, Tolerances};
use fd_ocp::InputLimit;
use nalgebra::DVector;

/// Per-sample state and control buffers of one run.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    nx: usize,
    nu: usize,
    x: Vec<DVector<f64>>,
    u: Vec<DVector<f64>>,
}

impl Trajectory {
    /// Allocate buffers for a run of `samples` samples.
    pub fn with_capacity(nx: usize, nu: usize, samples: usize) -> Self {
        Self {
            nx,
            nu,
            x: Vec::with_capacity(samples),
            u: Vec::with_capacity(samples),
        }
    }

    /// Append one sample. Rejects vectors of the wrong dimension.
    pub fn push(&mut self, x: DVector<f64>, u: DVector<f64>) -> SimResult<()> {
        if x.len() != self.nx {
            return Err(SimError::InvalidArg {
                what: "recorded state has wrong dimension",
            });
        }
        if u.len() != self.nu {
            return Err(SimError::InvalidArg {
                what: "recorded control has wrong dimension",
            });
        }
        self.x.push(x);
        self.u.push(u);
        Ok(())
    }

    /// Number of recorded samples.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn nu(&self) -> usize {
        self.nu
    }

    pub fn states(&self) -> &[DVector<f64>] {
        &self.x
    }

    pub fn controls(&self) -> &[DVector<f64>] {
        &self.u
    }

    /// Largest infinity-norm deviation of any recorded state from the
    /// reference. `None` for an empty record or a reference of the wrong
    /// dimension.
    pub fn max_state_deviation(&self, reference: &DVector<Real>) -> Option<Real> {
        if reference.len() != self.nx {
            return None;
        }
        self.x
            .iter()
            .map(|x| (x - reference).amax())
            .fold(None, |acc, d| Some(acc.map_or(d, |a: Real| a.max(d))))
    }

    /// Whether every recorded control satisfies the input limit.
    pub fn controls_within(&self, limit: &InputLimit, tol: Tolerances) -> bool {
        self.u.iter().all(|u| limit.contains(u.as_slice(), tol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fd_ocp::{Formulation, HexagonGeometry};

    #[test]
    fn push_validates_dimensions() {
        let mut t = Trajectory::with_capacity(2, 2, 4);
        t.push(DVector::zeros(2), DVector::zeros(2)).unwrap();
        assert!(t.push(DVector::zeros(3), DVector::zeros(2)).is_err());
        assert!(t.push(DVector::zeros(2), DVector::zeros(1)).is_err());
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn max_deviation_over_samples() {
        let mut t = Trajectory::with_capacity(2, 2, 2);
        t.push(DVector::from_vec(vec![1.0, 0.0]), DVector::zeros(2))
            .unwrap();
        t.push(DVector::from_vec(vec![0.0, -3.0]), DVector::zeros(2))
            .unwrap();

        let r = DVector::zeros(2);
        assert_eq!(t.max_state_deviation(&r), Some(3.0));
        assert_eq!(
            Trajectory::with_capacity(2, 2, 0).max_state_deviation(&r),
            None
        );
    }

    #[test]
    fn mismatched_reference_yields_no_deviation() {
        let mut t = Trajectory::with_capacity(2, 2, 1);
        t.push(DVector::from_vec(vec![1.0, 0.0]), DVector::zeros(2))
            .unwrap();
        assert_eq!(t.max_state_deviation(&DVector::zeros(3)), None);
        assert_eq!(t.max_state_deviation(&DVector::zeros(1)), None);
    }

    #[test]
    fn controls_checked_against_limit() {
        let geo = HexagonGeometry::new(10.0).unwrap();
        let limit = InputLimit::from_geometry(&geo, Formulation::Polytope);

        let tol = Tolerances::default();
        let mut t = Trajectory::with_capacity(2, 2, 2);
        t.push(DVector::zeros(2), DVector::from_vec(vec![1.0, 1.0]))
            .unwrap();
        assert!(t.controls_within(&limit, tol));

        t.push(DVector::zeros(2), DVector::from_vec(vec![25.0, 0.0]))
            .unwrap();
        assert!(!t.controls_within(&limit, tol));
    }
}
