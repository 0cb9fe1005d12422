//! fd-model: drive model for fluxdrive.
//!
//! Provides:
//! - expr: immutable arena expression tree over named variable slots
//! - flux: fitted nonlinear flux-linkage maps (numeric + symbolic forms)
//! - dynamics: implicit DAE residual of the synchronous reluctance drive

pub mod dynamics;
pub mod expr;
pub mod flux;

// Re-exports for public API
pub use dynamics::ImplicitDynamics;
pub use expr::{Bindings, ExprArena, ExprId, Slot};
pub use flux::{psi_d, psi_d_expr, psi_q, psi_q_expr};
