//! Error types for key handling, signing and encoding.

use curve::CurveError;
use thiserror::Error;

/// Errors that can occur while deriving keys, signing or decoding.
///
/// Verification never returns one of these: a signature that does not verify
/// is reported as `false`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A point is off the curve, is the point at infinity, or could not be
    /// produced by hashing within the attempt bound.
    #[error("invalid curve point")]
    InvalidPoint,

    /// A scalar is zero or not below the group order where a non-zero
    /// canonical scalar is required.
    #[error("scalar out of range")]
    ScalarOutOfRange,

    /// Hashing a seed into a private scalar kept landing outside [1, n-2].
    #[error("key derivation failed after bounded retries")]
    KeyDerivationFailed,

    /// Every nonce drawn within the attempt bound hit a degenerate case.
    #[error("signing exhausted its nonce attempts")]
    SigningExhausted,

    /// The ring is too small or contains duplicate or invalid members.
    #[error("invalid ring: {0}")]
    InvalidRing(&'static str),

    /// The signer's public key is not a member of the supplied ring.
    #[error("signer key not in ring")]
    KeyNotInRing,

    /// Input text or bytes do not match the expected encoding.
    #[error("malformed encoding: {0}")]
    MalformedEncoding(&'static str),
}

impl From<CurveError> for Error {
    fn from(err: CurveError) -> Self {
        match err {
            CurveError::InvalidPoint => Error::InvalidPoint,
            CurveError::ScalarOutOfRange => Error::ScalarOutOfRange,
        }
    }
}
