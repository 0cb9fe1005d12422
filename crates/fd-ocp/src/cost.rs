//! Least-squares tracking cost and steady-state references.
//!
//! The tracking output stacks the flux states over the voltage controls:
//! y = Vx*x + Vu*u + Vz*z with ny = nx + nu. The algebraic currents do not
//! enter the output (Vz is identically zero) but the selection matrix is
//! still part of the descriptor so the optimizer sees consistent shapes.

use crate::config::DriveConfig;
use fd_core::units::{volt, weber, FluxLinkage, Voltage};
use fd_model::flux;
use nalgebra::{DMatrix, DVector};

/// Steady-state operating point implied by the current references.
#[derive(Clone, Copy, Debug)]
pub struct SteadyStateReference {
    pub psi_d: FluxLinkage,
    pub psi_q: FluxLinkage,
    pub u_d: Voltage,
    pub u_q: Voltage,
}

impl SteadyStateReference {
    /// Evaluate the flux map at the current references and back out the
    /// voltages that hold that point: u_d = Rs*i_d - w*psi_q and
    /// u_q = Rs*i_q + w*psi_d.
    pub fn from_config(config: &DriveConfig) -> Self {
        let i_d = config.i_d_ref.value;
        let i_q = config.i_q_ref.value;
        let w = config.w_nominal.value;
        let r_s = config.r_s.value;

        let psi_d = flux::psi_d(i_d, i_q);
        let psi_q = flux::psi_q(i_d, i_q);
        Self {
            psi_d: weber(psi_d),
            psi_q: weber(psi_q),
            u_d: volt(r_s * i_d - w * psi_q),
            u_q: volt(r_s * i_q + w * psi_d),
        }
    }
}

/// Weights, output-selection matrices and reference vectors of the
/// least-squares cost.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackingCost {
    /// Intermediate-stage weight, blkdiag(Q, R) (ny x ny).
    pub w: DMatrix<f64>,
    /// Terminal weight (ny_e x ny_e).
    pub w_e: DMatrix<f64>,
    /// State selection (ny x nx).
    pub vx: DMatrix<f64>,
    /// Control selection (ny x nu).
    pub vu: DMatrix<f64>,
    /// Algebraic selection (ny x nz), identically zero.
    pub vz: DMatrix<f64>,
    /// Terminal state selection (ny_e x nx).
    pub vx_e: DMatrix<f64>,
    /// Intermediate reference output.
    pub yref: DVector<f64>,
    /// Terminal reference output.
    pub yref_e: DVector<f64>,
}

impl TrackingCost {
    pub fn from_config(config: &DriveConfig) -> Self {
        let nx = fd_model::dynamics::NX;
        let nu = fd_model::dynamics::NU;
        let nz = fd_model::dynamics::NZ;
        let ny = nx + nu;
        let ny_e = nx;

        let mut w = DMatrix::zeros(ny, ny);
        for i in 0..nx {
            w[(i, i)] = config.q_flux;
        }
        for i in 0..nu {
            w[(nx + i, nx + i)] = config.r_voltage;
        }

        let mut w_e = DMatrix::zeros(ny_e, ny_e);
        for i in 0..ny_e {
            w_e[(i, i)] = config.q_terminal;
        }

        let mut vx = DMatrix::zeros(ny, nx);
        for i in 0..nx {
            vx[(i, i)] = 1.0;
        }
        let mut vu = DMatrix::zeros(ny, nu);
        for i in 0..nu {
            vu[(nx + i, i)] = 1.0;
        }
        let vz = DMatrix::zeros(ny, nz);
        let mut vx_e = DMatrix::zeros(ny_e, nx);
        for i in 0..ny_e {
            vx_e[(i, i)] = 1.0;
        }

        let ss = SteadyStateReference::from_config(config);
        let yref = DVector::from_vec(vec![
            ss.psi_d.value,
            ss.psi_q.value,
            ss.u_d.value,
            ss.u_q.value,
        ]);
        let yref_e = DVector::from_vec(vec![ss.psi_d.value, ss.psi_q.value]);

        Self {
            w,
            w_e,
            vx,
            vu,
            vz,
            vx_e,
            yref,
            yref_e,
        }
    }

    pub fn ny(&self) -> usize {
        self.yref.len()
    }

    pub fn ny_e(&self) -> usize {
        self.yref_e.len()
    }
}
