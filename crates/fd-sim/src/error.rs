//! Error types for closed-loop operation.

use crate::optimizer::SolveStatus;
use thiserror::Error;

/// Errors encountered while driving the RTI loop.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// The optimizer returned a failure status. Fatal for the run: a failed
    /// RTI step signals divergence or infeasibility, not a transient
    /// condition, so the step is never retried.
    #[error("Solve failed at sample {sample}: {status:?}")]
    SolveFailed { sample: usize, status: SolveStatus },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<fd_ocp::OcpError> for SimError {
    fn from(e: fd_ocp::OcpError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}

impl From<fd_core::FdError> for SimError {
    fn from(e: fd_core::FdError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}
