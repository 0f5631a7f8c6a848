use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal error kinds, following the error design in spec.md §7: every
/// variant bubbles up to the driver and terminates the run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("CG did not converge after {iters} iterations (relative residual {residual:.3e})")]
    NonConvergence { iters: usize, residual: f64 },

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("checkpoint mismatch: header plaquette disagrees with recomputed value by {relerr:.3e}")]
    CheckpointMismatch { relerr: f64 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported: {0}")]
    Unsupported(&'static str),
}
