//! fd-sim: real-time-iteration closed loop for fluxdrive.
//!
//! Provides:
//! - the consumed `Optimizer` boundary (load once, set payload per sample,
//!   solve, read stage trajectories)
//! - a windowed speed schedule for the exogenous parameter
//! - the RTI closed-loop driver with fatal-failure semantics
//! - trajectory recording with reference/constraint comparison helpers

pub mod error;
pub mod optimizer;
pub mod record;
pub mod runner;
pub mod schedule;

// Re-exports for public API
pub use error::{SimError, SimResult};
pub use optimizer::{Optimizer, SolveStatus};
pub use record::Trajectory;
pub use runner::{run_closed_loop, ClosedLoop, LoopOptions};
pub use schedule::SpeedSchedule;
