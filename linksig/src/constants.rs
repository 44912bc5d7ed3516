//! Constants used by the signature and ring-signature schemes.

/// Size of a serialized secret signing key in bytes.
///
/// A signing key is a scalar mod n, encoded big-endian.
pub const SK_SIZE: usize = 32;

/// Size of a serialized public verifying key in bytes.
///
/// Public keys are SM2 curve points in SEC1 compressed form.
pub const PK_SIZE: usize = curve::COMPRESSED_LEN;

/// Size of an uncompressed SEC1 public key in bytes.
pub const PK_UNCOMPRESSED_SIZE: usize = curve::UNCOMPRESSED_LEN;

/// Size of a serialized scalar in bytes.
pub const SCALAR_SIZE: usize = 32;

/// Size of a serialized SM2 signature in bytes.
///
/// A signature consists of:
/// - the scalar r (32 bytes)
/// - the scalar s (32 bytes)
/// Total: 64 bytes
pub const SIG_SIZE: usize = 2 * SCALAR_SIZE;

/// Size of a serialized linkability tag (a compressed point).
pub const TAG_SIZE: usize = curve::COMPRESSED_LEN;

/// Smallest ring that can hide a signer.
pub const MIN_RING_SIZE: usize = 2;

/// Most decoy keys a single generation call produces.
pub const MAX_DECOY_COUNT: usize = 1 << 16;

/// Default SM2 distinguishing identifier (GB/T 32918 recommendation).
pub const DEFAULT_USER_ID: &[u8] = b"1234567812345678";

/// Default domain for linkability tags. Tags only collide within a domain.
pub const DEFAULT_LINK_DOMAIN: &[u8] = b"linksig/v1/link";

/// Bound on the SM2 nonce retry loop.
pub const DEFAULT_MAX_SIGNING_ATTEMPTS: u32 = 10;

pub(crate) const KEYGEN_DOMAIN: &[u8] = b"linksig/v1/keygen";
pub(crate) const DECOY_DOMAIN: &[u8] = b"linksig/v1/decoy";
pub(crate) const KEY_IMAGE_DOMAIN: &[u8] = b"linksig/v1/key-image";
pub(crate) const RING_NONCE_DOMAIN: &[u8] = b"linksig/v1/ring-nonce";
pub(crate) const RING_CHALLENGE_DOMAIN: &[u8] = b"linksig/v1/ring-challenge";

/// Retry bound when hashing into [1, n-1].
pub(crate) const MAX_HASH_TO_SCALAR_ATTEMPTS: u32 = 10;

/// Retry bound for try-and-increment hashing onto the curve. Each attempt
/// succeeds with probability close to 1/2.
pub(crate) const MAX_HASH_TO_POINT_ATTEMPTS: u32 = 64;

/// Extra candidates allowed beyond `count` when generating decoys.
pub(crate) const MAX_EXTRA_DECOY_CANDIDATES: u64 = 16;
