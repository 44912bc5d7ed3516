//! Linkable ring signatures (MLSAG) over the SM2 curve.
//!
//! A signer hides its public keys among decoys. Every ring member holds the
//! same number of keys, one per layer; a plain single-key ring is the
//! one-layer case. The signature proves knowledge of the secret keys of one
//! member without revealing which, and carries one tag `I_j = d_j * Hp(Q_j)`
//! per layer that is the same for every signature by that key under one link
//! domain.
//!
//! Signing walks the ring as a chain of challenges
//!
//! ```text
//! L_ij = s_ij * G + c_i * P_ij
//! R_ij = s_ij * Hp(P_ij) + c_i * I_j
//! c_{i+1} = H(transcript || L_i0 || R_i0 || ... || L_i(m-1) || R_i(m-1))
//! ```
//!
//! starting just after the signer's slot with secret nonces, and closes the
//! chain at the signer's slot with `s_pi,j = alpha_j - c_pi * d_j`.
//! Verification walks the same chain from `c_0` and checks that it returns
//! to `c_0`. Verification depends only on the message, the ring and the
//! signature.

mod decoys;
mod signature;

pub use decoys::{DecoySet, generate_decoy_members};
pub use signature::{LinkTag, RingMember, RingSignature, check_ring};

use crate::constants::DEFAULT_LINK_DOMAIN;
use crate::errors::Error;
use crate::keys::{SigningKey, VerifyingKey};

/// Signs over `decoys` followed by the signer's own key, in the default link
/// domain. Verify against [`DecoySet::ring_with`].
pub fn sign(
    seed: &[u8],
    signing_key: &SigningKey,
    decoys: &DecoySet,
    msg: &[u8],
) -> Result<RingSignature, Error> {
    sign_in_domain(DEFAULT_LINK_DOMAIN, seed, signing_key, decoys, msg)
}

/// Signs over a caller-assembled ring, which must contain the signer's key
/// at any position.
pub fn sign_with_ring(
    seed: &[u8],
    signing_key: &SigningKey,
    ring: &[VerifyingKey],
    msg: &[u8],
) -> Result<RingSignature, Error> {
    signature::sign_with_ring_in_domain(
        DEFAULT_LINK_DOMAIN,
        seed,
        core::slice::from_ref(signing_key),
        ring,
        msg,
    )
}

/// Checks a ring signature in the default link domain.
pub fn verify(msg: &[u8], ring: &[VerifyingKey], sig: &RingSignature) -> bool {
    signature::verify_in_domain(DEFAULT_LINK_DOMAIN, msg, ring, sig)
}

/// Multi-layer signing: `signing_keys` form one member, appended after
/// `decoys`. Every decoy member must hold `signing_keys.len()` keys.
pub fn sign_layered(
    seed: &[u8],
    signing_keys: &[SigningKey],
    decoys: &[Vec<VerifyingKey>],
    msg: &[u8],
) -> Result<RingSignature, Error> {
    sign_layered_in_domain(DEFAULT_LINK_DOMAIN, seed, signing_keys, decoys, msg)
}

/// Multi-layer signing over a ring that already contains the signer's
/// member at any position.
pub fn sign_layered_with_ring<M: RingMember>(
    seed: &[u8],
    signing_keys: &[SigningKey],
    ring: &[M],
    msg: &[u8],
) -> Result<RingSignature, Error> {
    signature::sign_with_ring_in_domain(DEFAULT_LINK_DOMAIN, seed, signing_keys, ring, msg)
}

pub fn verify_layered<M: RingMember>(msg: &[u8], ring: &[M], sig: &RingSignature) -> bool {
    signature::verify_in_domain(DEFAULT_LINK_DOMAIN, msg, ring, sig)
}

pub(crate) fn sign_in_domain(
    link_domain: &[u8],
    seed: &[u8],
    signing_key: &SigningKey,
    decoys: &DecoySet,
    msg: &[u8],
) -> Result<RingSignature, Error> {
    let signer = signing_key.verifying_key();
    if decoys.contains(&signer) {
        return Err(Error::InvalidRing("signer key already among decoys"));
    }
    let ring = decoys.ring_with(&signer);
    signature::sign_with_ring_in_domain(
        link_domain,
        seed,
        core::slice::from_ref(signing_key),
        &ring,
        msg,
    )
}

pub(crate) fn sign_layered_in_domain(
    link_domain: &[u8],
    seed: &[u8],
    signing_keys: &[SigningKey],
    decoys: &[Vec<VerifyingKey>],
    msg: &[u8],
) -> Result<RingSignature, Error> {
    let signer: Vec<VerifyingKey> = signing_keys.iter().map(SigningKey::verifying_key).collect();
    if decoys
        .iter()
        .flatten()
        .any(|key| signer.contains(key))
    {
        return Err(Error::InvalidRing("signer key already among decoys"));
    }
    let mut ring = decoys.to_vec();
    ring.push(signer);
    signature::sign_with_ring_in_domain(link_domain, seed, signing_keys, &ring, msg)
}

pub(crate) use signature::{sign_with_ring_in_domain, verify_in_domain};
