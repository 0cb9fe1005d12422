//! Real-time-iteration closed-loop driver.
//!
//! One solve per sample, no iterative refinement within a sample: the
//! solution of sample k seeds the initial condition (and the optimizer's
//! warm start) of sample k+1. A failed solve is fatal for the run; the loop
//! never retries and never continues past a failure.

use crate::error::{SimError, SimResult};
use crate::optimizer::Optimizer;
use crate::record::Trajectory;
use crate::schedule::SpeedSchedule;
use fd_ocp::OcpInstance;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Options for a closed-loop run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoopOptions {
    /// Total number of control samples.
    pub samples: usize,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self { samples: 100 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoopState {
    /// Before the first sample.
    Idle,
    /// Steady cyclic operation.
    Running,
}

/// The RTI loop: owns the optimizer handle and the trajectory record.
///
/// The OCP payload pushed across the optimizer boundary is the only mutable
/// shared resource; it is owned here and mutated strictly between solves.
pub struct ClosedLoop<O: Optimizer> {
    optimizer: O,
    schedule: SpeedSchedule,
    samples: usize,
    horizon: usize,
    state: LoopState,
    sample: usize,
    record: Trajectory,
}

impl<O: Optimizer> ClosedLoop<O> {
    /// Hand the OCP topology to the optimizer and set up the record buffers.
    pub fn new(
        ocp: &OcpInstance,
        mut optimizer: O,
        schedule: SpeedSchedule,
        opts: LoopOptions,
    ) -> SimResult<Self> {
        if opts.samples == 0 {
            return Err(SimError::InvalidArg {
                what: "sample count must be positive",
            });
        }
        optimizer.load(ocp)?;
        let dims = ocp.dims();
        Ok(Self {
            optimizer,
            schedule,
            samples: opts.samples,
            horizon: dims.n,
            state: LoopState::Idle,
            sample: 0,
            record: Trajectory::with_capacity(dims.nx, dims.nu, opts.samples),
        })
    }

    /// Execute one control sample.
    pub fn step(&mut self) -> SimResult<()> {
        if self.sample >= self.samples {
            return Err(SimError::InvalidArg {
                what: "run already complete",
            });
        }
        if self.state == LoopState::Idle {
            info!(samples = self.samples, horizon = self.horizon, "starting RTI closed loop");
            self.state = LoopState::Running;
        }

        let sample = self.sample;
        let status = self.optimizer.solve()?;
        if !status.is_success() {
            warn!(sample, ?status, "solve failed, aborting run");
            return Err(SimError::SolveFailed { sample, status });
        }

        // Record the applied control and the current state.
        let x0 = self.optimizer.stage_state(0)?;
        let u0 = self.optimizer.stage_control(0)?;
        self.record.push(x0, u0)?;

        // The stage-1 state becomes the next sample's initial condition,
        // imposed as a hard equality (lbx == ubx), exactly once per sample.
        let x_next = self.optimizer.stage_state(1)?;
        self.optimizer.set_state_bounds(0, &x_next, &x_next)?;

        // Push the scheduled parameter vector into every horizon stage for
        // the next solve.
        let p = self.schedule.parameter_at(sample);
        for stage in 0..self.horizon {
            self.optimizer.set_parameter(stage, &p)?;
        }

        debug!(sample, "sample complete");
        self.sample += 1;
        Ok(())
    }

    /// Run all remaining samples.
    pub fn run(&mut self) -> SimResult<()> {
        while self.sample < self.samples {
            self.step()?;
        }
        info!(recorded = self.record.len(), "closed loop finished");
        Ok(())
    }

    /// Samples executed so far.
    pub fn sample(&self) -> usize {
        self.sample
    }

    /// Trajectory recorded so far (also valid after a failed run).
    pub fn record(&self) -> &Trajectory {
        &self.record
    }

    pub fn into_record(self) -> Trajectory {
        self.record
    }

    pub fn optimizer(&self) -> &O {
        &self.optimizer
    }
}

/// Run a full closed loop and return the recorded trajectory.
pub fn run_closed_loop<O: Optimizer>(
    ocp: &OcpInstance,
    optimizer: O,
    schedule: SpeedSchedule,
    opts: LoopOptions,
) -> SimResult<Trajectory> {
    let mut control_loop = ClosedLoop::new(ocp, optimizer, schedule, opts)?;
    control_loop.run()?;
    Ok(control_loop.into_record())
}
