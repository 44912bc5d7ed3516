//! Linkable signature engine over the SM2 curve and the SM3 hash.
//!
//! This library implements:
//! - Deterministic key derivation from seed bytes
//! - SM2 signatures (GB/T 32918.2) over SM3 digests
//! - Linkable ring signatures (MLSAG, one or more keys per ring member)
//!   whose tags expose a key that signs twice in the same link domain
//! - Hex and decimal text encodings for every exchanged value
//!
//! # Example
//!
//! ```
//! use linksig::{derive_key_pair, generate_decoys, ring_sign, ring_verify, sign, verify};
//!
//! let keys = derive_key_pair(b"seed").expect("derive");
//! let sig = sign(keys.signing_key(), b"message").expect("sign");
//! assert!(verify(keys.verifying_key(), b"message", &sig));
//!
//! let decoys = generate_decoys(b"decoy seed", 5).expect("decoys");
//! let ring_sig = ring_sign(b"nonce seed", keys.signing_key(), &decoys, b"message")
//!     .expect("ring sign");
//! let ring = decoys.ring_with(keys.verifying_key());
//! assert!(ring_verify(b"message", &ring, &ring_sig));
//! ```
//!
//! # Security Considerations
//!
//! - Use a fresh seed for every decoy set and ring signature
//! - Secret-dependent scalar multiplications run in constant time;
//!   verification uses variable-time arithmetic on public data only
//! - Signing keys are wiped from memory when dropped
//! - Tags are comparable only between signatures in the same link domain

mod api;
pub mod codec;
mod config;
mod constants;
mod errors;
pub mod hashing;
mod keys;
pub mod ring;
mod signatures;


pub use api::{
    Engine, derive_key_pair, generate_decoys, public_key_from, ring_sign, ring_verify, sign, sm3,
    verify,
};
pub use codec::HexEncoding;
pub use config::Config;
pub use constants::{
    DEFAULT_LINK_DOMAIN, DEFAULT_MAX_SIGNING_ATTEMPTS, DEFAULT_USER_ID, MAX_DECOY_COUNT, MIN_RING_SIZE, PK_SIZE,
    PK_UNCOMPRESSED_SIZE, SCALAR_SIZE, SIG_SIZE, SK_SIZE, TAG_SIZE,
};
pub use curve::{Affine, ScalarField};
pub use errors::Error;
pub use keys::{KeyPair, SigningKey, VerifyingKey};
pub use ring::{DecoySet, LinkTag, RingMember, RingSignature};
pub use signatures::{Signature, signer_context};
pub use ::sm3::Digest;
