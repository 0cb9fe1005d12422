//! Consumed optimizer boundary.
//!
//! The numerical NLP/QP machinery lives behind this trait: the loop hands it
//! one immutable OCP description up front, then per sample pushes payload
//! updates (initial-state bounds, stage parameters), triggers a single solve
//! and reads back the stage trajectories. Implementations typically wrap a
//! generated solver; tests use hand-written stubs.

use crate::error::SimResult;
use fd_ocp::OcpInstance;
use nalgebra::DVector;

/// Outcome of one solve call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveStatus {
    Success,
    /// A NaN appeared in the iterate.
    NanDetected,
    /// Iteration limit reached without convergence.
    MaxIterations,
    /// Step size shrank below the minimum.
    MinStepReached,
    /// The underlying QP solve failed.
    QpFailure,
}

impl SolveStatus {
    pub fn is_success(self) -> bool {
        matches!(self, SolveStatus::Success)
    }
}

/// Black-box solver for a fixed OCP topology.
pub trait Optimizer {
    /// Accept the OCP topology and initial payload. Called exactly once,
    /// before the first solve.
    fn load(&mut self, ocp: &OcpInstance) -> SimResult<()>;

    /// Set the state bounds of one stage before the next solve. The loop
    /// passes `lb == ub` at stage 0 to impose the initial condition as a
    /// hard equality.
    fn set_state_bounds(
        &mut self,
        stage: usize,
        lb: &DVector<f64>,
        ub: &DVector<f64>,
    ) -> SimResult<()>;

    /// Set the parameter vector of one stage before the next solve.
    fn set_parameter(&mut self, stage: usize, p: &DVector<f64>) -> SimResult<()>;

    /// Run one (possibly approximate) solve over the horizon.
    fn solve(&mut self) -> SimResult<SolveStatus>;

    /// Read the state of one stage after a successful solve.
    fn stage_state(&self, stage: usize) -> SimResult<DVector<f64>>;

    /// Read the control of one stage after a successful solve.
    fn stage_control(&self, stage: usize) -> SimResult<DVector<f64>>;
}
