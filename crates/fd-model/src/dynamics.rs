//! Implicit DAE residual of the current-controlled drive.
//!
//! States are the stator flux linkages (psi_d, psi_q), controls the stator
//! voltages (u_d, u_q), algebraic variables the stator currents (i_d, i_q)
//! and parameters the electrical speed plus two disturbance terms
//! (w, dist_d, dist_q).
//!
//! The residual stacks the two flux-derivative equations with the two
//! algebraic equations that pin the flux states to the fitted flux map:
//!
//! ```text
//! r0 = psi_d_dot - u_d + Rs*i_d - w*psi_q - dist_d
//! r1 = psi_q_dot - u_q + Rs*i_q + w*psi_d - dist_q
//! r2 = psi_d - Psi_d(i_d, i_q)
//! r3 = psi_q - Psi_q(i_d, i_q)
//! ```
//!
//! The coupling between currents and fluxes is an explicit residual-equation
//! list over an immutable expression arena: built once, read many times.

use crate::expr::{Bindings, ExprArena, ExprId, Slot};
use crate::flux;
use fd_core::{ensure_finite, FdResult, Real};
use nalgebra::DVector;

/// Dimension constants of the drive model.
pub const NX: usize = 2;
pub const NU: usize = 2;
pub const NZ: usize = 2;
pub const NP: usize = 3;

/// Implicit dynamics residual list.
#[derive(Clone, Debug)]
pub struct ImplicitDynamics {
    arena: ExprArena,
    residuals: Vec<ExprId>,
}

impl ImplicitDynamics {
    /// Build the synchronous reluctance drive residual for the given stator
    /// resistance [Ohm].
    pub fn reluctance_drive(r_s: Real) -> Self {
        let mut arena = ExprArena::new();

        let psi_d = arena.var(Slot::State(0));
        let psi_q = arena.var(Slot::State(1));
        let psi_d_dot = arena.var(Slot::StateDot(0));
        let psi_q_dot = arena.var(Slot::StateDot(1));
        let u_d = arena.var(Slot::Control(0));
        let u_q = arena.var(Slot::Control(1));
        let i_d = arena.var(Slot::Algebraic(0));
        let i_q = arena.var(Slot::Algebraic(1));
        let w = arena.var(Slot::Param(0));
        let dist_d = arena.var(Slot::Param(1));
        let dist_q = arena.var(Slot::Param(2));

        // r0 = psi_d_dot - u_d + Rs*i_d - w*psi_q - dist_d
        let r0 = {
            let rs_id = arena.scale(i_d, r_s);
            let w_psi_q = arena.mul(w, psi_q);
            let t = arena.sub(psi_d_dot, u_d);
            let t = arena.add(t, rs_id);
            let t = arena.sub(t, w_psi_q);
            arena.sub(t, dist_d)
        };

        // r1 = psi_q_dot - u_q + Rs*i_q + w*psi_d - dist_q
        let r1 = {
            let rs_iq = arena.scale(i_q, r_s);
            let w_psi_d = arena.mul(w, psi_d);
            let t = arena.sub(psi_q_dot, u_q);
            let t = arena.add(t, rs_iq);
            let t = arena.add(t, w_psi_d);
            arena.sub(t, dist_q)
        };

        // r2/r3: flux states pinned to the fitted map of the currents
        let map_d = flux::psi_d_expr(&mut arena, i_d, i_q);
        let map_q = flux::psi_q_expr(&mut arena, i_d, i_q);
        let r2 = arena.sub(psi_d, map_d);
        let r3 = arena.sub(psi_q, map_q);

        Self {
            arena,
            residuals: vec![r0, r1, r2, r3],
        }
    }

    /// Number of stacked residual equations (nx differential + nz algebraic).
    pub fn num_residuals(&self) -> usize {
        self.residuals.len()
    }

    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    pub fn residual_ids(&self) -> &[ExprId] {
        &self.residuals
    }

    /// Evaluate the full residual vector against one set of bindings.
    pub fn eval_residual(&self, bindings: &Bindings) -> FdResult<DVector<Real>> {
        let mut r = DVector::zeros(self.residuals.len());
        for (k, &id) in self.residuals.iter().enumerate() {
            let v = self.arena.eval(id, bindings)?;
            r[k] = ensure_finite(v, "dynamics residual")?;
        }
        Ok(r)
    }
}
