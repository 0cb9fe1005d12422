//! Fitted flux-linkage maps of the synchronous reluctance machine.
//!
//! Both maps are smooth compositions of a linear term, a Gaussian-like
//! exponential in the cross-axis current, and a saturating arctangent in the
//! own-axis current. Coefficients come from a least-squares fit to measured
//! flux data; they are not derived quantities. The maps are total: defined
//! and finite for every real current pair.
//!
//! Each map exists in two forms that must stay in lockstep:
//! - a plain numeric function, used for reference computation and checks
//! - a symbolic builder over an [`ExprArena`], used inside the implicit
//!   dynamics residual handed to the optimizer

use crate::expr::{ExprArena, ExprId};
use fd_core::Real;

// d-axis fit coefficients
const PSI_D_LINEAR: Real = -4.215858085639979e-3;
const PSI_D_EXP: Real = -8.413493151721978e-5;
const PSI_D_ATAN_GAIN: Real = 1.416834085282644e-1;
const PSI_D_SCALE: Real = 8.834738694115108e-1;

// q-axis fit coefficients
const PSI_Q_LINEAR: Real = 1.04488335702649e-2;
const PSI_Q_EXP: Real = -1.0 / 72.0;
const PSI_Q_SCALE: Real = 6.649036351062812e-2;

/// d-axis flux linkage [Wb] as a function of the stator currents [A].
pub fn psi_d(i_d: Real, i_q: Real) -> Real {
    i_d * PSI_D_LINEAR + (i_q * i_q * PSI_D_EXP).exp() * (i_d * PSI_D_ATAN_GAIN).atan() * PSI_D_SCALE
}

/// q-axis flux linkage [Wb] as a function of the stator currents [A].
pub fn psi_q(i_d: Real, i_q: Real) -> Real {
    i_q * PSI_Q_LINEAR + (i_d * i_d * PSI_Q_EXP).exp() * i_q.atan() * PSI_Q_SCALE
}

/// Build the d-axis flux map over arena expressions for the currents.
pub fn psi_d_expr(arena: &mut ExprArena, i_d: ExprId, i_q: ExprId) -> ExprId {
    let linear = arena.scale(i_d, PSI_D_LINEAR);
    let iq_sq = arena.square(i_q);
    let exp_arg = arena.scale(iq_sq, PSI_D_EXP);
    let gauss = arena.exp(exp_arg);
    let atan_arg = arena.scale(i_d, PSI_D_ATAN_GAIN);
    let sat = arena.atan(atan_arg);
    let prod = arena.mul(gauss, sat);
    let scaled = arena.scale(prod, PSI_D_SCALE);
    arena.add(linear, scaled)
}

/// Build the q-axis flux map over arena expressions for the currents.
pub fn psi_q_expr(arena: &mut ExprArena, i_d: ExprId, i_q: ExprId) -> ExprId {
    let linear = arena.scale(i_q, PSI_Q_LINEAR);
    let id_sq = arena.square(i_d);
    let exp_arg = arena.scale(id_sq, PSI_Q_EXP);
    let gauss = arena.exp(exp_arg);
    let sat = arena.atan(i_q);
    let prod = arena.mul(gauss, sat);
    let scaled = arena.scale(prod, PSI_Q_SCALE);
    arena.add(linear, scaled)
}
