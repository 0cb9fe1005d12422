//! fd-ocp: discretized optimal-control problem assembly for fluxdrive.
//!
//! Provides:
//! - config: one explicit struct of drive and horizon tunables
//! - geometry: hexagonal voltage-limit constraint blocks (polytope or
//!   inscribed-disc formulation, as a tagged variant)
//! - cost: least-squares tracking cost with steady-state references
//! - descriptor: immutable OCP topology with a mutable per-sample payload

pub mod config;
pub mod cost;
pub mod descriptor;
pub mod error;
pub mod geometry;

// Re-exports for public API
pub use config::{DriveConfig, Formulation};
pub use cost::{SteadyStateReference, TrackingCost};
pub use descriptor::{OcpDims, OcpInstance};
pub use error::{OcpError, OcpResult};
pub use geometry::{HexagonGeometry, InputLimit, PolytopeBlock};
