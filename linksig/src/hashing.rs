//! Domain-separated SM3 derivations: into scalars and onto the curve.
//!
//! Every derivation starts from a [`DomainHasher`], which absorbs a domain
//! label and then any number of length-framed inputs. A 32-bit counter is
//! appended only at finalization, so the same absorbed state can be
//! squeezed repeatedly for reject-and-retry loops.

use curve::{Affine, BaseField, ScalarField};
use sm3::{Digest, Sm3};
use subtle::Choice;
use tracing::trace;

use crate::constants::{MAX_HASH_TO_POINT_ATTEMPTS, MAX_HASH_TO_SCALAR_ATTEMPTS};
use crate::errors::Error;

/// SM3 state with an absorbed domain label.
#[derive(Clone)]
pub struct DomainHasher {
    inner: Sm3,
}

impl DomainHasher {
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = DomainHasher { inner: Sm3::new() };
        hasher.absorb(domain);
        hasher
    }

    /// Absorbs `part` prefixed with its length, so adjacent inputs can never
    /// be re-split into a colliding sequence.
    pub fn absorb(&mut self, part: &[u8]) -> &mut Self {
        self.inner.update((part.len() as u64).to_be_bytes());
        self.inner.update(part);
        self
    }

    pub fn absorb_point(&mut self, point: &Affine) -> &mut Self {
        self.absorb(&point.to_sec1_bytes(true))
    }

    pub fn absorb_scalar(&mut self, scalar: &ScalarField) -> &mut Self {
        self.absorb(&scalar.to_bytes_be())
    }

    pub fn absorb_u64(&mut self, value: u64) -> &mut Self {
        self.absorb(&value.to_be_bytes())
    }

    /// Digest of the absorbed input followed by `counter`.
    pub fn finalize_with_counter(&self, counter: u32) -> Digest {
        self.inner.clone().chain(counter.to_be_bytes()).finalize()
    }
}

/// Key-derivation mode: reads successive digests as big-endian integers and
/// returns the first one that is a non-zero scalar accepted by `accept`.
///
/// Fails with [`Error::KeyDerivationFailed`] after
/// `MAX_HASH_TO_SCALAR_ATTEMPTS` rejected digests.
pub fn hash_to_scalar_with(
    hasher: &DomainHasher,
    accept: impl Fn(&ScalarField) -> bool,
) -> Result<ScalarField, Error> {
    for counter in 0..MAX_HASH_TO_SCALAR_ATTEMPTS {
        let digest = hasher.finalize_with_counter(counter);
        match ScalarField::from_bytes_nonzero(digest.as_bytes()) {
            Some(scalar) if accept(&scalar) => return Ok(scalar),
            _ => trace!(counter, "hash-to-scalar candidate rejected"),
        }
    }
    Err(Error::KeyDerivationFailed)
}

/// Hashes `parts` under `domain` into [1, n-1].
pub fn hash_to_scalar(domain: &[u8], parts: &[&[u8]]) -> Result<ScalarField, Error> {
    let mut hasher = DomainHasher::new(domain);
    for part in parts {
        hasher.absorb(part);
    }
    hash_to_scalar_with(&hasher, |_| true)
}

/// Wide mode: two digests reduced mod n. The result is statistically close
/// to uniform and never fails; it may be zero with negligible probability.
pub fn hash_to_scalar_wide(hasher: &DomainHasher) -> ScalarField {
    let mut wide = [0u8; 64];
    wide[..32].copy_from_slice(hasher.finalize_with_counter(0).as_bytes());
    wide[32..].copy_from_slice(hasher.finalize_with_counter(1).as_bytes());
    ScalarField::from_bytes_wide(&wide)
}

/// Try-and-increment onto the curve: each digest is a candidate x; the first
/// one below p whose right-hand side is a square wins, with the even root.
///
/// The discrete log of the result with respect to G is unknown.
pub fn hash_to_point_with(hasher: &DomainHasher) -> Result<Affine, Error> {
    for counter in 0..MAX_HASH_TO_POINT_ATTEMPTS {
        let digest = hasher.finalize_with_counter(counter);
        let Some(x) = BaseField::from_bytes_be(digest.as_bytes()) else {
            continue;
        };
        if let Ok(point) = Affine::decompress(&x, Choice::from(0)) {
            return Ok(point);
        }
    }
    Err(Error::InvalidPoint)
}

/// Hashes `parts` under `domain` onto the curve.
pub fn hash_to_point(domain: &[u8], parts: &[&[u8]]) -> Result<Affine, Error> {
    let mut hasher = DomainHasher::new(domain);
    for part in parts {
        hasher.absorb(part);
    }
    hash_to_point_with(&hasher)
}
