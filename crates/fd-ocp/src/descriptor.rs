//! Discretized OCP descriptor: immutable topology, mutable payload.
//!
//! The topology (dimensions, dynamics, cost, constraint structure, horizon,
//! step size) is fixed at build time and never changes. The payload (the
//! initial-state equality bound and the per-stage parameter vectors) is the
//! only part a control loop mutates between solves.
//!
//! The terminal stage carries no control, no algebraic variables and no
//! general or nonlinear constraints; it contributes only the terminal state
//! cost.

use crate::config::DriveConfig;
use crate::cost::TrackingCost;
use crate::error::{OcpError, OcpResult};
use crate::geometry::{HexagonGeometry, InputLimit};
use fd_core::Real;
use fd_model::dynamics::{ImplicitDynamics, NP, NU, NX, NZ};
use nalgebra::DVector;
use tracing::debug;

/// Mutually consistent dimension fields of one OCP instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OcpDims {
    pub nx: usize,
    pub nu: usize,
    pub nz: usize,
    pub np: usize,
    pub ny: usize,
    pub ny_e: usize,
    /// Horizon length (number of intermediate stages).
    pub n: usize,
}

/// One discretized OCP: built once, payload mutated every sample.
#[derive(Clone, Debug)]
pub struct OcpInstance {
    dims: OcpDims,
    ts: Real,
    dynamics: ImplicitDynamics,
    cost: TrackingCost,
    limit: InputLimit,
    // Mutable payload
    x0: DVector<Real>,
    params: Vec<DVector<Real>>,
}

impl OcpInstance {
    /// Assemble and validate a descriptor from the configuration.
    ///
    /// Any dimension or geometry inconsistency fails here, before a solver
    /// ever sees the problem.
    pub fn build(config: &DriveConfig) -> OcpResult<Self> {
        config.validate()?;

        let geometry = HexagonGeometry::new(config.u_max().value)?;
        let limit = InputLimit::from_geometry(&geometry, config.formulation);
        let dynamics = ImplicitDynamics::reluctance_drive(config.r_s.value);
        let cost = TrackingCost::from_config(config);

        let dims = OcpDims {
            nx: NX,
            nu: NU,
            nz: NZ,
            np: NP,
            ny: NX + NU,
            ny_e: NX,
            n: config.horizon,
        };

        let p0 = DVector::from_vec(vec![
            config.w_nominal.value,
            config.dist_d.value,
            config.dist_q.value,
        ]);
        let instance = Self {
            dims,
            ts: config.ts.value,
            dynamics,
            cost,
            limit,
            x0: DVector::zeros(dims.nx),
            params: vec![p0; dims.n],
        };
        instance.validate()?;

        debug!(
            nx = dims.nx,
            nu = dims.nu,
            nz = dims.nz,
            np = dims.np,
            n = dims.n,
            ts = instance.ts,
            "assembled OCP descriptor"
        );
        Ok(instance)
    }

    /// Check every matrix/vector shape against the dimension fields.
    fn validate(&self) -> OcpResult<()> {
        let d = self.dims;

        if self.dynamics.num_residuals() != d.nx + d.nz {
            return Err(OcpError::Dimension {
                what: format!(
                    "dynamics residual count {} != nx + nz = {}",
                    self.dynamics.num_residuals(),
                    d.nx + d.nz
                ),
            });
        }

        let checks: [(&str, (usize, usize), (usize, usize)); 6] = [
            ("W", self.cost.w.shape(), (d.ny, d.ny)),
            ("W_e", self.cost.w_e.shape(), (d.ny_e, d.ny_e)),
            ("Vx", self.cost.vx.shape(), (d.ny, d.nx)),
            ("Vu", self.cost.vu.shape(), (d.ny, d.nu)),
            ("Vz", self.cost.vz.shape(), (d.ny, d.nz)),
            ("Vx_e", self.cost.vx_e.shape(), (d.ny_e, d.nx)),
        ];
        for (name, got, want) in checks {
            if got != want {
                return Err(OcpError::Dimension {
                    what: format!("{name} has shape {got:?}, expected {want:?}"),
                });
            }
        }
        if self.cost.yref.len() != d.ny || self.cost.yref_e.len() != d.ny_e {
            return Err(OcpError::Dimension {
                what: format!(
                    "reference lengths ({}, {}) != (ny, ny_e) = ({}, {})",
                    self.cost.yref.len(),
                    self.cost.yref_e.len(),
                    d.ny,
                    d.ny_e
                ),
            });
        }

        let block = self.limit.polytope();
        if block.d.shape() != (2, d.nu) || block.c.shape() != (2, d.nx) {
            return Err(OcpError::Dimension {
                what: format!(
                    "general constraint blocks D {:?} / C {:?} inconsistent with (nu, nx) = ({}, {})",
                    block.d.shape(),
                    block.c.shape(),
                    d.nu,
                    d.nx
                ),
            });
        }
        if block.idxbu >= d.nu {
            return Err(OcpError::Dimension {
                what: format!("box-bound index {} >= nu = {}", block.idxbu, d.nu),
            });
        }

        if self.x0.len() != d.nx {
            return Err(OcpError::Dimension {
                what: format!("x0 length {} != nx = {}", self.x0.len(), d.nx),
            });
        }
        if self.params.len() != d.n {
            return Err(OcpError::Dimension {
                what: format!("parameter stages {} != N = {}", self.params.len(), d.n),
            });
        }
        for (k, p) in self.params.iter().enumerate() {
            if p.len() != d.np {
                return Err(OcpError::Dimension {
                    what: format!("stage {k} parameter length {} != np = {}", p.len(), d.np),
                });
            }
        }

        Ok(())
    }

    pub fn dims(&self) -> OcpDims {
        self.dims
    }

    /// Discretization step [s].
    pub fn ts(&self) -> Real {
        self.ts
    }

    pub fn dynamics(&self) -> &ImplicitDynamics {
        &self.dynamics
    }

    pub fn cost(&self) -> &TrackingCost {
        &self.cost
    }

    pub fn limit(&self) -> &InputLimit {
        &self.limit
    }

    /// Current initial-state bound (lbx0 == ubx0 == this vector).
    pub fn initial_state(&self) -> &DVector<Real> {
        &self.x0
    }

    pub fn stage_parameter(&self, stage: usize) -> OcpResult<&DVector<Real>> {
        self.params.get(stage).ok_or_else(|| OcpError::Dimension {
            what: format!("stage {stage} out of range (N = {})", self.dims.n),
        })
    }

    /// Replace the initial-state equality bound.
    pub fn set_initial_state(&mut self, x: &DVector<Real>) -> OcpResult<()> {
        if x.len() != self.dims.nx {
            return Err(OcpError::Dimension {
                what: format!("initial state length {} != nx = {}", x.len(), self.dims.nx),
            });
        }
        self.x0.copy_from(x);
        Ok(())
    }

    /// Replace the parameter vector of one stage.
    pub fn set_stage_parameter(&mut self, stage: usize, p: &DVector<Real>) -> OcpResult<()> {
        if p.len() != self.dims.np {
            return Err(OcpError::Dimension {
                what: format!("parameter length {} != np = {}", p.len(), self.dims.np),
            });
        }
        let slot = self
            .params
            .get_mut(stage)
            .ok_or_else(|| OcpError::Dimension {
                what: format!("stage {stage} out of range (N = {})", self.dims.n),
            })?;
        slot.copy_from(p);
        Ok(())
    }
}
