//! Error types for transform decomposition.

use std::fmt;
use thiserror::Error;

/// Result type for decomposition and the operations built on it.
pub type Result<T> = std::result::Result<T, DecomposeError>;

/// A row of the upper-left 3x3 block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        })
    }
}

/// Errors that can occur when factoring a transform.
///
/// Each variant means the matrix has no valid translate/scale/skew/rotate
/// factorization; retrying with the same input fails the same way.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DecomposeError {
    /// `m44` is zero, so the perspective divide is undefined.
    #[error("degenerate perspective: m44 is zero")]
    DegeneratePerspective,

    /// A row of the 3x3 block collapsed after orthogonalization.
    #[error("singular basis: {axis} scale {norm:e} is below epsilon")]
    SingularBasis { axis: Axis, norm: f64 },

    /// A coefficient is NaN or infinite.
    #[error("transform has non-finite coefficients")]
    NonFinite,
}
