//! Error types for OCP assembly.

use fd_core::FdError;
use thiserror::Error;

/// Errors that can occur while assembling the discretized OCP.
///
/// Every variant is a construction-time failure: nothing here is deferred
/// to solve time.
#[derive(Error, Debug)]
pub enum OcpError {
    #[error("Degenerate input geometry: {what}")]
    Geometry { what: String },

    #[error("Dimension mismatch: {what}")]
    Dimension { what: String },

    #[error("Invalid configuration: {what}")]
    Config { what: String },

    #[error("Model error: {0}")]
    Model(#[from] FdError),
}

pub type OcpResult<T> = Result<T, OcpError>;
