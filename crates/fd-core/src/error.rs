//! Shared error type of the foundation layer.

use thiserror::Error;

pub type FdResult<T> = Result<T, FdError>;

/// Failures surfaced by the numeric and model layers.
#[derive(Error, Debug)]
pub enum FdError {
    /// A computed quantity left the representable range.
    #[error("non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    /// A slot or handle referenced storage that does not exist.
    #[error("{what} index {index} out of bounds (len {len})")]
    IndexOob {
        what: &'static str,
        index: usize,
        len: usize,
    },
}
