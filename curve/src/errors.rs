use thiserror::Error;

/// Errors raised by curve-level validation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum CurveError {
    /// The point is not on the curve, is the identity where a proper point is
    /// required, or its encoding could not be decoded.
    #[error("invalid curve point")]
    InvalidPoint,

    /// The scalar is zero or not below the group order.
    #[error("scalar out of range")]
    ScalarOutOfRange,
}
