//! SM2 signatures (GB/T 32918.2) and the digests they are computed over.

use curve::{Affine, CURVE_A, CURVE_B, Projective, ScalarField};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sm3::Sm3;
use tracing::{debug, trace};

use crate::constants::{SCALAR_SIZE, SIG_SIZE};
use crate::errors::Error;

/// An SM2 signature: the pair `(r, s)` of non-zero scalars.
///
/// With `e = SM3(Z || M)` and `Q` the signer's public key, the signature
/// satisfies `r == e + x(s*G + (r + s)*Q) mod n`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SignatureParts", into = "SignatureParts")]
pub struct Signature {
    pub(crate) r: ScalarField,
    pub(crate) s: ScalarField,
}

#[derive(Copy, Clone, Serialize, Deserialize)]
struct SignatureParts {
    r: ScalarField,
    s: ScalarField,
}

impl TryFrom<SignatureParts> for Signature {
    type Error = Error;

    fn try_from(parts: SignatureParts) -> Result<Self, Error> {
        Signature::new(parts.r, parts.s)
    }
}

impl From<Signature> for SignatureParts {
    fn from(sig: Signature) -> Self {
        SignatureParts { r: sig.r, s: sig.s }
    }
}

impl Signature {
    /// Builds a signature from its scalars, both of which must be non-zero.
    pub fn new(r: ScalarField, s: ScalarField) -> Result<Self, Error> {
        if bool::from(r.is_zero()) || bool::from(s.is_zero()) {
            return Err(Error::ScalarOutOfRange);
        }
        Ok(Signature { r, s })
    }

    pub fn r(&self) -> ScalarField {
        self.r
    }

    pub fn s(&self) -> ScalarField {
        self.s
    }

    /// `r || s`, each 32 bytes big-endian.
    pub fn to_bytes(&self) -> [u8; SIG_SIZE] {
        let mut out = [0u8; SIG_SIZE];
        out[..SCALAR_SIZE].copy_from_slice(&self.r.to_bytes_be());
        out[SCALAR_SIZE..].copy_from_slice(&self.s.to_bytes_be());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != SIG_SIZE {
            return Err(Error::MalformedEncoding("signature must be 64 bytes"));
        }
        let r = decode_nonzero(&bytes[..SCALAR_SIZE])?;
        let s = decode_nonzero(&bytes[SCALAR_SIZE..])?;
        Ok(Signature { r, s })
    }
}

fn decode_nonzero(bytes: &[u8]) -> Result<ScalarField, Error> {
    let mut buf = [0u8; SCALAR_SIZE];
    buf.copy_from_slice(bytes);
    ScalarField::from_bytes_nonzero(&buf)
        .ok_or(Error::MalformedEncoding("signature scalar out of range"))
}

/// Signer context `Z = SM3(ENTL || ID || a || b || xG || yG || xA || yA)`,
/// where ENTL is the bit length of ID as a big-endian u16.
pub fn signer_context(user_id: &[u8], public_key: &Affine) -> sm3::Digest {
    let entl = (user_id.len() as u64 * 8) as u16;
    let generator = Affine::generator();
    Sm3::new()
        .chain(entl.to_be_bytes())
        .chain(user_id)
        .chain(CURVE_A.to_bytes_be())
        .chain(CURVE_B.to_bytes_be())
        .chain(generator.x().to_bytes_be())
        .chain(generator.y().to_bytes_be())
        .chain(public_key.x().to_bytes_be())
        .chain(public_key.y().to_bytes_be())
        .finalize()
}

/// `e = SM3(Z || M)` read as an integer mod n.
pub(crate) fn message_digest(user_id: &[u8], public_key: &Affine, msg: &[u8]) -> ScalarField {
    let z = signer_context(user_id, public_key);
    let digest = Sm3::new().chain(z).chain(msg).finalize();
    ScalarField::from_bytes_reduced(digest.as_bytes())
}

/// One signing attempt with nonce `k`. `None` when `k` hits a degenerate
/// case (r = 0, r + k = n, or s = 0) and must be redrawn.
pub(crate) fn sign_with_nonce(d: &ScalarField, e: &ScalarField, k: &ScalarField) -> Option<Signature> {
    let point = Affine::mul_generator(k);
    let r = *e + ScalarField::from_base_field(&point.x());
    if bool::from(r.is_zero()) || bool::from((r + *k).is_zero()) {
        return None;
    }

    // d is at most n - 2, so 1 + d is invertible.
    let s = (ScalarField::ONE + *d).inverse() * (*k - r * *d);
    if bool::from(s.is_zero()) {
        return None;
    }

    Some(Signature { r, s })
}

/// Draws nonces from `rng` until one yields a signature, at most
/// `max_attempts` times.
pub(crate) fn sign_digest<R: Rng + ?Sized>(
    d: &ScalarField,
    e: &ScalarField,
    rng: &mut R,
    max_attempts: u32,
) -> Result<Signature, Error> {
    for attempt in 0..max_attempts {
        let k: ScalarField = rng.random();
        if let Some(sig) = sign_with_nonce(d, e, &k) {
            return Ok(sig);
        }
        trace!(attempt, "sm2 nonce rejected");
    }
    debug!(max_attempts, "sm2 signing exhausted nonce attempts");
    Err(Error::SigningExhausted)
}

/// Checks `sig` against digest `e` and public key `q`.
pub(crate) fn verify_digest(q: &Affine, e: &ScalarField, sig: &Signature) -> bool {
    if bool::from(sig.r.is_zero()) || bool::from(sig.s.is_zero()) {
        debug!("sm2 signature has a zero scalar");
        return false;
    }

    let t = sig.r + sig.s;
    if bool::from(t.is_zero()) {
        debug!("sm2 signature has r + s = n");
        return false;
    }

    let point = curve::double_scalar_mul_basepoint(&sig.s, &t, &Projective::from_affine(q));
    if point.is_infinity() {
        return false;
    }

    *e + ScalarField::from_base_field(&point.to_affine().x()) == sig.r
}
