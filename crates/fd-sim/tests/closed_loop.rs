//! Integration tests: RTI closed loop against stub optimizers.
//!
//! The stubs stand in for the black-box solver: they record every payload
//! update the loop pushes across the boundary and return canned stage
//! trajectories, so the loop's sequencing contract can be checked without
//! any numerical machinery.

use fd_ocp::{DriveConfig, OcpInstance};
use fd_sim::{
    ClosedLoop, LoopOptions, Optimizer, SimError, SimResult, SolveStatus, SpeedSchedule,
    run_closed_loop,
};
use nalgebra::DVector;

/// Scripted optimizer: canned stage trajectories, optional failure sample.
struct StubOptimizer {
    fail_at: Option<usize>,
    solves: usize,
    nx: usize,
    nu: usize,
    horizon: usize,
    loaded: bool,
    /// Stage-0 state bounds last pushed by the loop.
    x0_bounds: Option<(DVector<f64>, DVector<f64>)>,
    /// Canned stage-1 state returned after every solve.
    stage1_state: DVector<f64>,
    /// Per-stage parameter vectors last pushed by the loop.
    params: Vec<DVector<f64>>,
    /// Stage-0 speed parameter observed at each solve call.
    seen_speeds: Vec<f64>,
    /// Whether every pushed bound pair satisfied lb == ub.
    bounds_always_equal: bool,
}

impl StubOptimizer {
    fn succeeding(stage1_state: Vec<f64>) -> Self {
        Self {
            fail_at: None,
            solves: 0,
            nx: 0,
            nu: 0,
            horizon: 0,
            loaded: false,
            x0_bounds: None,
            stage1_state: DVector::from_vec(stage1_state),
            params: Vec::new(),
            seen_speeds: Vec::new(),
            bounds_always_equal: true,
        }
    }

    fn failing_at(sample: usize) -> Self {
        let mut stub = Self::succeeding(vec![0.0, 0.0]);
        stub.fail_at = Some(sample);
        stub
    }
}

impl Optimizer for StubOptimizer {
    fn load(&mut self, ocp: &OcpInstance) -> SimResult<()> {
        let dims = ocp.dims();
        self.nx = dims.nx;
        self.nu = dims.nu;
        self.horizon = dims.n;
        self.params = (0..dims.n)
            .map(|k| ocp.stage_parameter(k).map(|p| p.clone()))
            .collect::<Result<_, _>>()?;
        self.loaded = true;
        Ok(())
    }

    fn set_state_bounds(
        &mut self,
        stage: usize,
        lb: &DVector<f64>,
        ub: &DVector<f64>,
    ) -> SimResult<()> {
        assert_eq!(stage, 0, "loop only re-binds the initial stage");
        if lb != ub {
            self.bounds_always_equal = false;
        }
        self.x0_bounds = Some((lb.clone(), ub.clone()));
        Ok(())
    }

    fn set_parameter(&mut self, stage: usize, p: &DVector<f64>) -> SimResult<()> {
        self.params[stage].copy_from(p);
        Ok(())
    }

    fn solve(&mut self) -> SimResult<SolveStatus> {
        assert!(self.loaded, "solve before load");
        let sample = self.solves;
        self.solves += 1;
        if self.fail_at == Some(sample) {
            return Ok(SolveStatus::QpFailure);
        }
        self.seen_speeds.push(self.params[0][0]);
        Ok(SolveStatus::Success)
    }

    fn stage_state(&self, stage: usize) -> SimResult<DVector<f64>> {
        match stage {
            // stage 0 reflects the imposed initial-condition bound
            0 => Ok(self
                .x0_bounds
                .as_ref()
                .map(|(lb, _)| lb.clone())
                .unwrap_or_else(|| DVector::zeros(self.nx))),
            _ => Ok(self.stage1_state.clone()),
        }
    }

    fn stage_control(&self, _stage: usize) -> SimResult<DVector<f64>> {
        Ok(DVector::zeros(self.nu))
    }
}

fn default_ocp() -> OcpInstance {
    OcpInstance::build(&DriveConfig::default()).unwrap()
}

#[test]
fn five_samples_fill_the_buffers() {
    let ocp = default_ocp();
    let schedule = SpeedSchedule::windowed_step(300.0, 150.0, 2, 4);
    let stub = StubOptimizer::succeeding(vec![0.0, 0.0]);

    let mut control_loop =
        ClosedLoop::new(&ocp, stub, schedule, LoopOptions { samples: 5 }).unwrap();
    control_loop.run().unwrap();

    let record = control_loop.record();
    assert_eq!(record.len(), 5);
    assert!(record.states().iter().all(|x| x.len() == 2));
    assert!(record.controls().iter().all(|u| u.len() == 2));

    // Solve k sees the parameter pushed after solve k-1; the first solve
    // runs on the load-time payload. With the window starting at sample 2,
    // the observed speeds step down exactly once.
    let speeds = &control_loop.optimizer().seen_speeds;
    assert_eq!(speeds, &vec![300.0, 300.0, 300.0, 150.0, 150.0]);
    let transitions = speeds.windows(2).filter(|w| w[0] != w[1]).count();
    assert_eq!(transitions, 1);
}

#[test]
fn parameters_reach_every_horizon_stage() {
    let ocp = default_ocp();
    let schedule = SpeedSchedule::windowed_step(300.0, 150.0, 0, 100);
    let stub = StubOptimizer::succeeding(vec![0.0, 0.0]);

    let mut control_loop =
        ClosedLoop::new(&ocp, stub, schedule, LoopOptions { samples: 3 }).unwrap();
    control_loop.run().unwrap();

    let stub = control_loop.optimizer();
    assert_eq!(stub.params.len(), ocp.dims().n);
    for p in &stub.params {
        assert_eq!(p[0], 150.0);
    }
}

#[test]
fn failure_is_fatal_and_keeps_the_partial_record() {
    let ocp = default_ocp();
    let stub = StubOptimizer::failing_at(3);

    let mut control_loop = ClosedLoop::new(
        &ocp,
        stub,
        SpeedSchedule::default(),
        LoopOptions { samples: 10 },
    )
    .unwrap();

    let err = control_loop.run().unwrap_err();
    match err {
        SimError::SolveFailed { sample, status } => {
            assert_eq!(sample, 3);
            assert_eq!(status, SolveStatus::QpFailure);
        }
        other => panic!("unexpected error: {other}"),
    }

    // Samples 0..3 were recorded; nothing after the failure.
    assert_eq!(control_loop.sample(), 3);
    assert_eq!(control_loop.record().len(), 3);
}

#[test]
fn initial_condition_round_trips_as_an_equality() {
    let ocp = default_ocp();
    let stub = StubOptimizer::succeeding(vec![0.3, -0.4]);

    let mut control_loop = ClosedLoop::new(
        &ocp,
        stub,
        SpeedSchedule::constant(300.0),
        LoopOptions { samples: 2 },
    )
    .unwrap();
    control_loop.run().unwrap();

    // Sample 0 read the untouched initial state; sample 1's stage-0 state
    // equals the stage-1 state that was set as both bounds after sample 0.
    let record = control_loop.record();
    assert_eq!(record.states()[0], DVector::zeros(2));
    assert_eq!(record.states()[1], DVector::from_vec(vec![0.3, -0.4]));
    assert!(control_loop.optimizer().bounds_always_equal);
}

#[test]
fn zero_sample_run_is_rejected() {
    let ocp = default_ocp();
    let stub = StubOptimizer::succeeding(vec![0.0, 0.0]);
    let err = run_closed_loop(
        &ocp,
        stub,
        SpeedSchedule::default(),
        LoopOptions { samples: 0 },
    )
    .unwrap_err();
    assert!(matches!(err, SimError::InvalidArg { .. }));
}
