//! The engine's external interface.
//!
//! [`Engine`] carries a [`Config`]; the free functions are the same
//! operations under `Config::default()`.

use curve::ScalarField;
use rand::Rng;
use tracing::debug;

use crate::config::Config;
use crate::errors::Error;
use crate::keys::{KeyPair, SigningKey, VerifyingKey};
use crate::ring::{self, DecoySet, RingMember, RingSignature};
use crate::signatures::Signature;

/// Entry point for every operation, bound to one configuration.
///
/// # Example
///
/// ```
/// use linksig::{Config, Engine};
///
/// let engine = Engine::new(Config::default().with_link_domain("ballot-7"));
/// let keys = engine.derive_key_pair(b"alice").expect("derive");
/// let decoys = engine.generate_decoys(b"fresh seed", 4).expect("decoys");
/// let sig = engine
///     .ring_sign(b"nonce seed", keys.signing_key(), &decoys, b"vote: yes")
///     .expect("ring sign");
/// let ring = decoys.ring_with(keys.verifying_key());
/// assert!(engine.ring_verify(b"vote: yes", &ring, &sig));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Engine {
    config: Config,
}

impl Engine {
    /// Binds `config`, raising a zero signing-attempt bound to one.
    pub fn new(mut config: Config) -> Self {
        config.max_signing_attempts = config.max_signing_attempts.max(1);
        Engine { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Hashes `seed` into a private key and derives its public key.
    pub fn derive_key_pair(&self, seed: &[u8]) -> Result<KeyPair, Error> {
        KeyPair::derive(seed)
    }

    /// `scalar * G`, after checking the scalar is a usable private key.
    pub fn public_key_from(&self, scalar: &ScalarField) -> Result<VerifyingKey, Error> {
        Ok(SigningKey::from_scalar(*scalar)?.verifying_key())
    }

    /// SM2-signs `msg` with a nonce from the thread-local generator.
    pub fn sign(&self, signing_key: &SigningKey, msg: &[u8]) -> Result<Signature, Error> {
        self.sign_with_rng(&mut rand::rng(), signing_key, msg)
    }

    pub fn sign_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        signing_key: &SigningKey,
        msg: &[u8],
    ) -> Result<Signature, Error> {
        signing_key.sign_with_id(
            rng,
            &self.config.user_id,
            self.config.max_signing_attempts,
            msg,
        )
    }

    pub fn verify(&self, verifying_key: &VerifyingKey, msg: &[u8], sig: &Signature) -> bool {
        let ok = verifying_key.verify_with_id(&self.config.user_id, msg, sig);
        debug!(ok, "sm2 signature checked");
        ok
    }

    pub fn generate_decoys(&self, seed: &[u8], count: usize) -> Result<DecoySet, Error> {
        DecoySet::generate(seed, count)
    }

    /// Ring-signs over `decoys` followed by the signer's key.
    pub fn ring_sign(
        &self,
        seed: &[u8],
        signing_key: &SigningKey,
        decoys: &DecoySet,
        msg: &[u8],
    ) -> Result<RingSignature, Error> {
        ring::sign_in_domain(&self.config.link_domain, seed, signing_key, decoys, msg)
    }

    /// Ring-signs over a ring that already contains the signer's key.
    pub fn ring_sign_with_ring(
        &self,
        seed: &[u8],
        signing_key: &SigningKey,
        ring: &[VerifyingKey],
        msg: &[u8],
    ) -> Result<RingSignature, Error> {
        ring::sign_with_ring_in_domain(
            &self.config.link_domain,
            seed,
            core::slice::from_ref(signing_key),
            ring,
            msg,
        )
    }

    pub fn ring_verify(&self, msg: &[u8], ring: &[VerifyingKey], sig: &RingSignature) -> bool {
        ring::verify_in_domain(&self.config.link_domain, msg, ring, sig)
    }

    /// `count` decoy members of `layers` keys each.
    pub fn generate_decoy_members(
        &self,
        seed: &[u8],
        count: usize,
        layers: usize,
    ) -> Result<Vec<Vec<VerifyingKey>>, Error> {
        ring::generate_decoy_members(seed, count, layers)
    }

    /// Multi-layer ring signature; the signer's member is appended after
    /// `decoys`.
    pub fn ring_sign_layered(
        &self,
        seed: &[u8],
        signing_keys: &[SigningKey],
        decoys: &[Vec<VerifyingKey>],
        msg: &[u8],
    ) -> Result<RingSignature, Error> {
        ring::sign_layered_in_domain(&self.config.link_domain, seed, signing_keys, decoys, msg)
    }

    pub fn ring_sign_layered_with_ring<M: RingMember>(
        &self,
        seed: &[u8],
        signing_keys: &[SigningKey],
        ring: &[M],
        msg: &[u8],
    ) -> Result<RingSignature, Error> {
        ring::sign_with_ring_in_domain(&self.config.link_domain, seed, signing_keys, ring, msg)
    }

    pub fn ring_verify_layered<M: RingMember>(
        &self,
        msg: &[u8],
        ring: &[M],
        sig: &RingSignature,
    ) -> bool {
        ring::verify_in_domain(&self.config.link_domain, msg, ring, sig)
    }
}

pub fn derive_key_pair(seed: &[u8]) -> Result<KeyPair, Error> {
    Engine::default().derive_key_pair(seed)
}

pub fn public_key_from(scalar: &ScalarField) -> Result<VerifyingKey, Error> {
    Engine::default().public_key_from(scalar)
}

pub fn sign(signing_key: &SigningKey, msg: &[u8]) -> Result<Signature, Error> {
    Engine::default().sign(signing_key, msg)
}

pub fn verify(verifying_key: &VerifyingKey, msg: &[u8], sig: &Signature) -> bool {
    Engine::default().verify(verifying_key, msg, sig)
}

pub fn generate_decoys(seed: &[u8], count: usize) -> Result<DecoySet, Error> {
    DecoySet::generate(seed, count)
}

pub fn ring_sign(
    seed: &[u8],
    signing_key: &SigningKey,
    decoys: &DecoySet,
    msg: &[u8],
) -> Result<RingSignature, Error> {
    Engine::default().ring_sign(seed, signing_key, decoys, msg)
}

pub fn ring_verify(msg: &[u8], ring: &[VerifyingKey], sig: &RingSignature) -> bool {
    Engine::default().ring_verify(msg, ring, sig)
}

/// SM3 digest of `data`.
pub fn sm3(data: &[u8]) -> ::sm3::Digest {
    ::sm3::hash(data)
}
