//! Drive and horizon configuration.
//!
//! All global tunables live in one explicit struct passed into descriptor
//! construction; nothing is read from module-level state.

use crate::error::{OcpError, OcpResult};
use fd_core::units::{
    amp, ohm, radps, sec, volt, AngularVelocity, Current, Resistance, Time, Voltage,
};
use fd_core::Real;

/// Which encoding of the hexagonal voltage limit is active.
///
/// The two formulations are mutually exclusive alternatives for the same
/// physical limit; the choice is made here, at configuration time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Formulation {
    /// Six linear inequalities: two slanted-edge rows plus a box bound on
    /// the q-axis voltage.
    #[default]
    Polytope,
    /// Convex quadratic bound on the inscribed disc of the hexagon, composed
    /// with the slanted-edge rows.
    InscribedDisc,
}

/// All tunables of one problem instance.
#[derive(Clone, Debug)]
pub struct DriveConfig {
    /// Discretization step of the horizon.
    pub ts: Time,
    /// Number of horizon stages N.
    pub horizon: usize,
    /// Intermediate flux tracking weight (per axis).
    pub q_flux: Real,
    /// Intermediate voltage effort weight (per axis).
    pub r_voltage: Real,
    /// Terminal flux tracking weight (per axis).
    pub q_terminal: Real,
    /// d-axis current reference.
    pub i_d_ref: Current,
    /// q-axis current reference.
    pub i_q_ref: Current,
    /// Nominal rotor electrical speed.
    pub w_nominal: AngularVelocity,
    /// d-axis voltage disturbance.
    pub dist_d: Voltage,
    /// q-axis voltage disturbance.
    pub dist_q: Voltage,
    /// Stator resistance.
    pub r_s: Resistance,
    /// DC-link voltage.
    pub u_dc: Voltage,
    /// Active voltage-limit formulation.
    pub formulation: Formulation,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            ts: sec(0.0008),
            horizon: 2,
            q_flux: 5e2,
            r_voltage: 1e-4,
            q_terminal: 1e-3,
            i_d_ref: amp(-20.0),
            i_q_ref: amp(20.0),
            w_nominal: radps(300.0),
            dist_d: volt(0.0),
            dist_q: volt(0.0),
            r_s: ohm(0.4),
            u_dc: volt(580.0),
            formulation: Formulation::default(),
        }
    }
}

impl DriveConfig {
    /// Maximum per-axis actuation magnitude, set by the modulation limit of
    /// the inverter: u_max = 2/3 * u_dc.
    pub fn u_max(&self) -> Voltage {
        (2.0 / 3.0) * self.u_dc
    }

    pub fn validate(&self) -> OcpResult<()> {
        if !(self.ts.value > 0.0) {
            return Err(OcpError::Config {
                what: format!("sample period must be positive, got {}", self.ts.value),
            });
        }
        if self.horizon < 2 {
            return Err(OcpError::Config {
                what: format!(
                    "horizon must have at least 2 stages for an RTI loop, got {}",
                    self.horizon
                ),
            });
        }
        if !(self.q_flux > 0.0) || !(self.r_voltage > 0.0) || !(self.q_terminal > 0.0) {
            return Err(OcpError::Config {
                what: "cost weights must be positive".to_string(),
            });
        }
        if !(self.r_s.value > 0.0) {
            return Err(OcpError::Config {
                what: format!("stator resistance must be positive, got {}", self.r_s.value),
            });
        }
        Ok(())
    }
}
