use std::collections::HashSet;

use curve::{Affine, Group, Projective, ScalarField};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;
use zeroize::Zeroizing;

use crate::constants::{
    KEY_IMAGE_DOMAIN, MIN_RING_SIZE, RING_CHALLENGE_DOMAIN, RING_NONCE_DOMAIN, SCALAR_SIZE,
    TAG_SIZE,
};
use crate::errors::Error;
use crate::hashing::{DomainHasher, hash_to_point_with, hash_to_scalar_wide};
use crate::keys::{SigningKey, VerifyingKey};

/// Linkability tag `I = d * Hp(Q)`.
///
/// Two ring signatures made with the same key under the same link domain
/// carry equal tags, whatever the ring or message. Comparing tags is left to
/// the caller.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LinkTag(Affine);

impl LinkTag {
    pub fn as_affine(&self) -> &Affine {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; TAG_SIZE] {
        let mut out = [0u8; TAG_SIZE];
        out.copy_from_slice(&self.0.to_sec1_bytes(true));
        out
    }

    /// Decodes a SEC1 point, rejecting the identity and off-curve points.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let point = Affine::from_sec1_bytes(bytes)?;
        point.validate()?;
        Ok(LinkTag(point))
    }
}

impl Serialize for LinkTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LinkTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let point = Affine::deserialize(deserializer)?;
        point.validate().map_err(serde::de::Error::custom)?;
        Ok(LinkTag(point))
    }
}

/// Keys a ring member contributes, one per layer.
///
/// A plain [`VerifyingKey`] is a one-layer member; a `Vec` or array of keys
/// is a member of a multi-layer ring.
pub trait RingMember {
    fn keys(&self) -> &[VerifyingKey];
}

impl RingMember for VerifyingKey {
    fn keys(&self) -> &[VerifyingKey] {
        core::slice::from_ref(self)
    }
}

impl RingMember for Vec<VerifyingKey> {
    fn keys(&self) -> &[VerifyingKey] {
        self
    }
}

impl<const N: usize> RingMember for [VerifyingKey; N] {
    fn keys(&self) -> &[VerifyingKey] {
        self
    }
}

/// An MLSAG ring signature.
///
/// Holds the anchor challenge `c0`, one response per key of every ring
/// member (member-major, so member `i` layer `j` sits at `i * layers + j`),
/// and one linkability tag per layer. Nothing in it identifies the signer's
/// position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RingSignatureParts", into = "RingSignatureParts")]
pub struct RingSignature {
    challenge: ScalarField,
    responses: Vec<ScalarField>,
    tags: Vec<LinkTag>,
}

#[derive(Serialize, Deserialize)]
struct RingSignatureParts {
    challenge: ScalarField,
    responses: Vec<ScalarField>,
    tags: Vec<LinkTag>,
}

impl TryFrom<RingSignatureParts> for RingSignature {
    type Error = Error;

    fn try_from(parts: RingSignatureParts) -> Result<Self, Error> {
        RingSignature::from_parts(parts.challenge, parts.responses, parts.tags)
    }
}

impl From<RingSignature> for RingSignatureParts {
    fn from(sig: RingSignature) -> Self {
        RingSignatureParts {
            challenge: sig.challenge,
            responses: sig.responses,
            tags: sig.tags,
        }
    }
}

impl RingSignature {
    fn from_parts(
        challenge: ScalarField,
        responses: Vec<ScalarField>,
        tags: Vec<LinkTag>,
    ) -> Result<Self, Error> {
        if tags.is_empty() {
            return Err(Error::MalformedEncoding("ring signature has no tags"));
        }
        if responses.len() % tags.len() != 0 {
            return Err(Error::MalformedEncoding(
                "response count is not a multiple of the tag count",
            ));
        }
        if responses.len() / tags.len() < MIN_RING_SIZE {
            return Err(Error::MalformedEncoding("ring signature has too few members"));
        }
        Ok(RingSignature {
            challenge,
            responses,
            tags,
        })
    }

    /// The anchor challenge `c0`.
    pub fn challenge(&self) -> ScalarField {
        self.challenge
    }

    pub fn responses(&self) -> &[ScalarField] {
        &self.responses
    }

    /// The tag of the first layer; the only one for single-key rings.
    pub fn tag(&self) -> LinkTag {
        self.tags[0]
    }

    pub fn tags(&self) -> &[LinkTag] {
        &self.tags
    }

    pub fn layers(&self) -> usize {
        self.tags.len()
    }

    pub fn ring_size(&self) -> usize {
        self.responses.len() / self.tags.len()
    }

    /// `c0 || s_0 || ... || s_{n*m-1} || I_0 || ... || I_{m-1}`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            SCALAR_SIZE * (self.responses.len() + 1) + TAG_SIZE * self.tags.len(),
        );
        out.extend_from_slice(&self.challenge.to_bytes_be());
        for response in &self.responses {
            out.extend_from_slice(&response.to_bytes_be());
        }
        for tag in &self.tags {
            out.extend_from_slice(&tag.to_bytes());
        }
        out
    }

    /// Decodes a single-layer signature.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_bytes_layered(bytes, 1)
    }

    /// Decodes a signature over a ring whose members hold `layers` keys each.
    pub fn from_bytes_layered(bytes: &[u8], layers: usize) -> Result<Self, Error> {
        const BAD_LENGTH: Error = Error::MalformedEncoding("ring signature has a bad length");

        if layers == 0 {
            return Err(Error::MalformedEncoding("layer count must be positive"));
        }
        let tags_len = layers.checked_mul(TAG_SIZE).ok_or(BAD_LENGTH)?;
        let row_len = layers.checked_mul(SCALAR_SIZE).ok_or(BAD_LENGTH)?;
        let fixed_len = tags_len.checked_add(SCALAR_SIZE).ok_or(BAD_LENGTH)?;
        let body_len = bytes.len().checked_sub(fixed_len).ok_or(BAD_LENGTH)?;
        if body_len % row_len != 0 || body_len / row_len < MIN_RING_SIZE {
            return Err(BAD_LENGTH);
        }

        let (scalars, tag_bytes) = bytes.split_at(bytes.len() - tags_len);
        let mut decoded = scalars.chunks_exact(SCALAR_SIZE).map(|chunk| {
            let mut buf = [0u8; SCALAR_SIZE];
            buf.copy_from_slice(chunk);
            ScalarField::from_bytes_be(&buf)
                .ok_or(Error::MalformedEncoding("ring signature scalar out of range"))
        });

        let challenge = decoded.next().ok_or(BAD_LENGTH)??;
        let responses = decoded.collect::<Result<Vec<_>, _>>()?;
        let tags = tag_bytes
            .chunks_exact(TAG_SIZE)
            .map(|chunk| {
                LinkTag::from_bytes(chunk).map_err(|_| {
                    Error::MalformedEncoding("ring signature tag is not a valid point")
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_parts(challenge, responses, tags)
    }
}

/// Rejects rings that are too small, mix members of different widths or
/// repeat a key. Returns the number of layers.
pub fn check_ring<M: RingMember>(ring: &[M]) -> Result<usize, Error> {
    if ring.len() < MIN_RING_SIZE {
        return Err(Error::InvalidRing("ring needs at least two members"));
    }
    let layers = ring[0].keys().len();
    if layers == 0 {
        return Err(Error::InvalidRing("ring member has no keys"));
    }
    if ring.iter().any(|member| member.keys().len() != layers) {
        return Err(Error::InvalidRing("ring members hold different key counts"));
    }
    let mut seen = HashSet::with_capacity(ring.len() * layers);
    if !ring
        .iter()
        .flat_map(|member| member.keys())
        .all(|key| seen.insert(*key))
    {
        return Err(Error::InvalidRing("duplicate ring member"));
    }
    Ok(layers)
}

/// `Hp(P)`: the point a member's key is mapped to for tag computation.
fn key_image_base(link_domain: &[u8], key: &VerifyingKey) -> Result<Affine, Error> {
    let mut hasher = DomainHasher::new(KEY_IMAGE_DOMAIN);
    hasher.absorb(link_domain).absorb_point(key.as_affine());
    hash_to_point_with(&hasher)
}

fn key_image_bases<M: RingMember>(
    link_domain: &[u8],
    ring: &[M],
) -> Result<Vec<Vec<Affine>>, Error> {
    ring.iter()
        .map(|member| {
            member
                .keys()
                .iter()
                .map(|key| key_image_base(link_domain, key))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect()
}

/// Everything each challenge commits to besides the step's own points.
fn challenge_transcript<M: RingMember>(
    link_domain: &[u8],
    msg: &[u8],
    tags: &[LinkTag],
    ring: &[M],
) -> DomainHasher {
    let mut hasher = DomainHasher::new(RING_CHALLENGE_DOMAIN);
    hasher
        .absorb(link_domain)
        .absorb(msg)
        .absorb_u64(tags.len() as u64);
    for tag in tags {
        hasher.absorb_point(tag.as_affine());
    }
    hasher.absorb_u64(ring.len() as u64);
    for key in ring.iter().flat_map(|member| member.keys()) {
        hasher.absorb_point(key.as_affine());
    }
    hasher
}

/// `c_{i+1}` from one member's `(L_j, R_j)` pairs.
fn next_challenge(transcript: &DomainHasher, commitments: &[(Projective, Projective)]) -> ScalarField {
    let points: Vec<Projective> = commitments.iter().flat_map(|&(l, r)| [l, r]).collect();
    let mut hasher = transcript.clone();
    for point in Projective::batch_normalize(&points) {
        hasher.absorb_point(&point);
    }
    hash_to_scalar_wide(&hasher)
}

/// One verification step for a member: per layer,
/// `L = s*G + c*P`, `R = s*Hp(P) + c*I`.
/// Variable time; every input here is public.
fn chain_step(
    keys: &[VerifyingKey],
    bases: &[Affine],
    tags: &[LinkTag],
    responses: &[ScalarField],
    challenge: &ScalarField,
) -> Vec<(Projective, Projective)> {
    keys.iter()
        .zip(bases)
        .zip(tags)
        .zip(responses)
        .map(|(((key, base), tag), response)| {
            let l = curve::double_scalar_mul_basepoint(
                response,
                challenge,
                &Projective::from_affine(key.as_affine()),
            );
            let r = <Projective as Group>::multi_scalar_mul(
                &[
                    Projective::from_affine(base),
                    Projective::from_affine(tag.as_affine()),
                ],
                &[*response, *challenge],
            );
            (l, r)
        })
        .collect()
}

/// Deterministic per-signature nonce source, keyed by the secret scalars.
fn nonce_hasher<M: RingMember>(
    seed: &[u8],
    secrets: &[ScalarField],
    link_domain: &[u8],
    msg: &[u8],
    ring: &[M],
) -> DomainHasher {
    let mut hasher = DomainHasher::new(RING_NONCE_DOMAIN);
    hasher.absorb(seed);
    for secret in secrets {
        hasher.absorb_scalar(secret);
    }
    hasher.absorb(link_domain).absorb(msg);
    for key in ring.iter().flat_map(|member| member.keys()) {
        hasher.absorb_point(key.as_affine());
    }
    hasher
}

fn derive_nonce(base: &DomainHasher, label: &[u8], index: usize) -> ScalarField {
    let mut hasher = base.clone();
    hasher.absorb(label).absorb_u64(index as u64);
    hash_to_scalar_wide(&hasher)
}

/// Signs `msg` as one member of `ring`. The member whose keys equal the
/// public keys of `signing_keys`, in order, is the signer.
pub(crate) fn sign_with_ring_in_domain<M: RingMember>(
    link_domain: &[u8],
    seed: &[u8],
    signing_keys: &[SigningKey],
    ring: &[M],
    msg: &[u8],
) -> Result<RingSignature, Error> {
    let layers = check_ring(ring)?;
    let signer: Vec<VerifyingKey> = signing_keys.iter().map(SigningKey::verifying_key).collect();
    let pi = ring
        .iter()
        .position(|member| member.keys() == signer.as_slice())
        .ok_or(Error::KeyNotInRing)?;

    let n = ring.len();
    let secrets = Zeroizing::new(
        signing_keys
            .iter()
            .map(SigningKey::to_scalar)
            .collect::<Vec<_>>(),
    );
    let bases = key_image_bases(link_domain, ring)?;

    let mut tags = Vec::with_capacity(layers);
    for (base, secret) in bases[pi].iter().zip(secrets.iter()) {
        let image = *base * *secret;
        image.validate()?;
        tags.push(LinkTag(image));
    }
    let transcript = challenge_transcript(link_domain, msg, &tags, ring);
    let nonces = nonce_hasher(seed, &secrets, link_domain, msg, ring);

    let alphas = Zeroizing::new(
        (0..layers)
            .map(|j| derive_nonce(&nonces, b"alpha", pi * layers + j))
            .collect::<Vec<_>>(),
    );
    let mut challenges = vec![ScalarField::ZERO; n];
    let mut responses = vec![ScalarField::ZERO; n * layers];

    let commitments: Vec<_> = alphas
        .iter()
        .zip(&bases[pi])
        .map(|(alpha, base)| {
            (
                Projective::mul_generator(alpha),
                Projective::from_affine(base).scalar_mul(alpha),
            )
        })
        .collect();
    challenges[(pi + 1) % n] = next_challenge(&transcript, &commitments);

    let mut i = (pi + 1) % n;
    while i != pi {
        let row = i * layers..(i + 1) * layers;
        for (index, slot) in row.clone().zip(responses[row.clone()].iter_mut()) {
            *slot = derive_nonce(&nonces, b"response", index);
        }
        let commitments = chain_step(
            ring[i].keys(),
            &bases[i],
            &tags,
            &responses[row],
            &challenges[i],
        );
        challenges[(i + 1) % n] = next_challenge(&transcript, &commitments);
        i = (i + 1) % n;
    }

    for (j, (alpha, secret)) in alphas.iter().zip(secrets.iter()).enumerate() {
        responses[pi * layers + j] = *alpha - challenges[pi] * *secret;
    }

    Ok(RingSignature {
        challenge: challenges[0],
        responses,
        tags,
    })
}

/// Walks the chain from `c0` and checks that it closes.
pub(crate) fn verify_in_domain<M: RingMember>(
    link_domain: &[u8],
    msg: &[u8],
    ring: &[M],
    sig: &RingSignature,
) -> bool {
    let layers = match check_ring(ring) {
        Ok(layers) => layers,
        Err(err) => {
            debug!(%err, "ring signature rejected");
            return false;
        }
    };
    if sig.tags.len() != layers || sig.responses.len() != ring.len() * layers {
        debug!(
            ring_size = ring.len(),
            layers,
            tags = sig.tags.len(),
            responses = sig.responses.len(),
            "ring signature rejected: shape mismatch"
        );
        return false;
    }

    let bases = match key_image_bases(link_domain, ring) {
        Ok(bases) => bases,
        Err(err) => {
            debug!(%err, "ring signature rejected");
            return false;
        }
    };

    let transcript = challenge_transcript(link_domain, msg, &sig.tags, ring);
    let mut challenge = sig.challenge;
    for ((member, bases), responses) in ring
        .iter()
        .zip(&bases)
        .zip(sig.responses.chunks_exact(layers))
    {
        let commitments = chain_step(member.keys(), bases, &sig.tags, responses, &challenge);
        challenge = next_challenge(&transcript, &commitments);
    }

    let closed = challenge == sig.challenge;
    debug!(ring_size = ring.len(), layers, closed, "ring signature checked");
    closed
}
