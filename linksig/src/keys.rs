//! Signing and verifying keys.

use core::fmt;

use curve::{Affine, ScalarField};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use subtle::{ConditionallySelectable, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{
    DEFAULT_MAX_SIGNING_ATTEMPTS, DEFAULT_USER_ID, KEYGEN_DOMAIN, PK_SIZE, SK_SIZE,
};
use crate::errors::Error;
use crate::hashing::{DomainHasher, hash_to_scalar_with};
use crate::signatures::{Signature, message_digest, sign_digest, verify_digest};

/// A secret SM2 signing key.
///
/// The key is a scalar d in [1, n-2]; the upper bound keeps `1 + d`
/// invertible, which SM2 signing divides by. The scalar is wiped on drop.
///
/// # Example
///
/// ```
/// use linksig::SigningKey;
///
/// let signing_key = SigningKey::random(&mut rand::rng());
/// let verifying_key = signing_key.verifying_key();
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningKey {
    scalar: ScalarField,
}

/// A public SM2 verifying key: a validated curve point other than the
/// identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct VerifyingKey {
    point: Affine,
}

/// A signing key together with the verifying key derived from it.
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

fn is_valid_private_scalar(scalar: &ScalarField) -> bool {
    !bool::from(scalar.is_zero() | (*scalar + ScalarField::ONE).is_zero())
}

impl SigningKey {
    /// Wraps `scalar`, rejecting 0 and n - 1.
    pub fn from_scalar(scalar: ScalarField) -> Result<Self, Error> {
        if !is_valid_private_scalar(&scalar) {
            return Err(Error::ScalarOutOfRange);
        }
        Ok(SigningKey { scalar })
    }

    /// Decodes a 32-byte big-endian scalar.
    pub fn from_bytes(bytes: &[u8; SK_SIZE]) -> Result<Self, Error> {
        let scalar = ScalarField::from_bytes_be(bytes).ok_or(Error::ScalarOutOfRange)?;
        Self::from_scalar(scalar)
    }

    pub fn to_bytes(&self) -> [u8; SK_SIZE] {
        self.scalar.to_bytes_be()
    }

    /// The secret scalar.
    pub fn to_scalar(&self) -> ScalarField {
        self.scalar
    }

    /// Generates a random signing key using the provided random number generator.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let scalar: ScalarField = rng.random();
        // n - 1 is drawn with probability 2^-256; fold it onto 1.
        let scalar = ScalarField::conditional_select(
            &scalar,
            &ScalarField::ONE,
            (scalar + ScalarField::ONE).is_zero(),
        );
        SigningKey { scalar }
    }

    /// Deterministic key from a 64-bit seed, via a seeded `StdRng`.
    pub fn generate(seed: u64) -> Self {
        Self::random(&mut StdRng::seed_from_u64(seed))
    }

    /// Derives a key from arbitrary seed bytes with the key-derivation hash.
    ///
    /// Fails with [`Error::KeyDerivationFailed`] if every bounded attempt
    /// lands outside [1, n-2].
    pub fn derive(seed: &[u8]) -> Result<Self, Error> {
        let mut hasher = DomainHasher::new(KEYGEN_DOMAIN);
        hasher.absorb(seed);
        let scalar = hash_to_scalar_with(&hasher, is_valid_private_scalar)?;
        Ok(SigningKey { scalar })
    }

    /// Derives the public verifying key `d * G`.
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey {
            point: Affine::mul_generator(&self.scalar),
        }
    }

    /// Signs a message using this signing key.
    ///
    /// Uses the default distinguishing ID; see [`Engine`](crate::Engine) for
    /// a configurable one.
    ///
    /// # Example
    ///
    /// ```
    /// use linksig::SigningKey;
    ///
    /// let mut rng = rand::rng();
    /// let signing_key = SigningKey::random(&mut rng);
    /// let signature = signing_key.sign(&mut rng, b"message").expect("signing failed");
    /// assert!(signing_key.verifying_key().verify(b"message", &signature));
    /// ```
    pub fn sign<R: Rng + ?Sized>(&self, rng: &mut R, msg: &[u8]) -> Result<Signature, Error> {
        self.sign_with_id(rng, DEFAULT_USER_ID, DEFAULT_MAX_SIGNING_ATTEMPTS, msg)
    }

    /// Signs with nonces drawn from `StdRng::seed_from_u64(seed)`.
    /// Reproducible; a seed must never be reused across different messages.
    pub fn sign_with_seed(&self, seed: u64, msg: &[u8]) -> Result<Signature, Error> {
        self.sign(&mut StdRng::seed_from_u64(seed), msg)
    }

    pub(crate) fn sign_with_id<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        user_id: &[u8],
        max_attempts: u32,
        msg: &[u8],
    ) -> Result<Signature, Error> {
        let public_key = self.verifying_key();
        let e = message_digest(user_id, &public_key.point, msg);
        sign_digest(&self.scalar, &e, rng, max_attempts)
    }
}

impl ConstantTimeEq for SigningKey {
    fn ct_eq(&self, other: &Self) -> subtle::Choice {
        self.scalar.ct_eq(&other.scalar)
    }
}

impl PartialEq for SigningKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for SigningKey {}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey").finish_non_exhaustive()
    }
}

impl Serialize for SigningKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.scalar.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SigningKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let scalar = ScalarField::deserialize(deserializer)?;
        SigningKey::from_scalar(scalar).map_err(serde::de::Error::custom)
    }
}

impl VerifyingKey {
    /// Wraps a point after checking it is on the curve and not the identity.
    pub fn from_affine(point: Affine) -> Result<Self, Error> {
        point.validate()?;
        Ok(VerifyingKey { point })
    }

    /// Decodes a SEC1 point, compressed or uncompressed.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_affine(Affine::from_sec1_bytes(bytes)?)
    }

    pub fn to_sec1_bytes(&self, compress: bool) -> Vec<u8> {
        self.point.to_sec1_bytes(compress)
    }

    /// Compressed SEC1 encoding.
    pub fn to_bytes(&self) -> [u8; PK_SIZE] {
        let mut out = [0u8; PK_SIZE];
        out.copy_from_slice(&self.point.to_sec1_bytes(true));
        out
    }

    pub fn as_affine(&self) -> &Affine {
        &self.point
    }

    /// Verifies a signature on a message using this verifying key.
    ///
    /// Returns `false` for any signature that does not check out, including
    /// malformed ones; verification has no error path.
    pub fn verify(&self, msg: &[u8], sig: &Signature) -> bool {
        self.verify_with_id(DEFAULT_USER_ID, msg, sig)
    }

    pub(crate) fn verify_with_id(&self, user_id: &[u8], msg: &[u8], sig: &Signature) -> bool {
        let e = message_digest(user_id, &self.point, msg);
        verify_digest(&self.point, &e, sig)
    }
}

impl From<&SigningKey> for VerifyingKey {
    fn from(sk: &SigningKey) -> Self {
        sk.verifying_key()
    }
}

impl Serialize for VerifyingKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.point.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VerifyingKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let point = Affine::deserialize(deserializer)?;
        VerifyingKey::from_affine(point).map_err(serde::de::Error::custom)
    }
}

impl KeyPair {
    pub fn from_signing_key(signing_key: SigningKey) -> Self {
        let verifying_key = signing_key.verifying_key();
        KeyPair {
            signing_key,
            verifying_key,
        }
    }

    /// Derives a key pair from seed bytes. See [`SigningKey::derive`].
    pub fn derive(seed: &[u8]) -> Result<Self, Error> {
        SigningKey::derive(seed).map(Self::from_signing_key)
    }

    /// Deterministic key pair from a 64-bit seed.
    pub fn generate(seed: u64) -> Self {
        Self::from_signing_key(SigningKey::generate(seed))
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_signing_key(SigningKey::random(rng))
    }

    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("verifying_key", &self.verifying_key)
            .finish_non_exhaustive()
    }
}
