use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::constants::{DECOY_DOMAIN, MAX_DECOY_COUNT, MAX_EXTRA_DECOY_CANDIDATES};
use crate::errors::Error;
use crate::hashing::{DomainHasher, hash_to_point_with};
use crate::keys::VerifyingKey;

/// Ordered, pairwise-distinct public keys used to hide a signer.
///
/// Decoys carry no secret: nobody knows their discrete logs when they come
/// from [`DecoySet::generate`]. A fresh seed should be used for every real
/// signature, since equal seeds give equal sets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<VerifyingKey>", into = "Vec<VerifyingKey>")]
pub struct DecoySet {
    members: Vec<VerifyingKey>,
}

impl DecoySet {
    /// Derives `count` distinct points from `seed` by hashing onto the curve.
    ///
    /// Candidate `i` hashes `(seed, i)`; candidates that fail to map or that
    /// repeat an earlier one are skipped, up to a small bounded surplus.
    /// Requests above [`MAX_DECOY_COUNT`] fail with `InvalidRing`.
    pub fn generate(seed: &[u8], count: usize) -> Result<Self, Error> {
        if count > MAX_DECOY_COUNT {
            return Err(Error::InvalidRing("too many decoys requested"));
        }
        let mut base = DomainHasher::new(DECOY_DOMAIN);
        base.absorb(seed);

        let mut members = Vec::with_capacity(count);
        let mut seen = HashSet::with_capacity(count);
        let limit = count as u64 + MAX_EXTRA_DECOY_CANDIDATES;

        for index in 0..limit {
            if members.len() == count {
                break;
            }
            let mut hasher = base.clone();
            hasher.absorb_u64(index);
            let key = match hash_to_point_with(&hasher).and_then(VerifyingKey::from_affine) {
                Ok(key) => key,
                Err(_) => {
                    trace!(index, "decoy candidate did not map to the curve");
                    continue;
                }
            };
            if seen.insert(key) {
                members.push(key);
            } else {
                trace!(index, "duplicate decoy candidate skipped");
            }
        }

        if members.len() < count {
            debug!(count, produced = members.len(), "decoy generation ran out of candidates");
            return Err(Error::InvalidPoint);
        }
        Ok(DecoySet { members })
    }

    /// Wraps caller-chosen keys, rejecting duplicates.
    pub fn from_keys(members: Vec<VerifyingKey>) -> Result<Self, Error> {
        let mut seen = HashSet::with_capacity(members.len());
        if !members.iter().all(|key| seen.insert(*key)) {
            return Err(Error::InvalidRing("duplicate decoy"));
        }
        Ok(DecoySet { members })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, key: &VerifyingKey) -> bool {
        self.members.contains(key)
    }

    pub fn as_slice(&self) -> &[VerifyingKey] {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = &VerifyingKey> {
        self.members.iter()
    }

    /// The ring a signature over these decoys is checked against: the decoys
    /// in order, followed by `signer`.
    pub fn ring_with(&self, signer: &VerifyingKey) -> Vec<VerifyingKey> {
        let mut ring = Vec::with_capacity(self.members.len() + 1);
        ring.extend_from_slice(&self.members);
        ring.push(*signer);
        ring
    }

    pub fn into_vec(self) -> Vec<VerifyingKey> {
        self.members
    }
}

/// `count` decoy members of `layers` keys each, for multi-layer rings.
///
/// Draws `count * layers` distinct decoys from `seed` and groups them in
/// order, so every key across all members is distinct.
pub fn generate_decoy_members(
    seed: &[u8],
    count: usize,
    layers: usize,
) -> Result<Vec<Vec<VerifyingKey>>, Error> {
    if layers == 0 {
        return Err(Error::InvalidRing("ring member has no keys"));
    }
    let total = count
        .checked_mul(layers)
        .ok_or(Error::InvalidRing("too many decoys requested"))?;
    let set = DecoySet::generate(seed, total)?;
    Ok(set
        .as_slice()
        .chunks_exact(layers)
        .map(<[VerifyingKey]>::to_vec)
        .collect())
}

impl TryFrom<Vec<VerifyingKey>> for DecoySet {
    type Error = Error;

    fn try_from(members: Vec<VerifyingKey>) -> Result<Self, Error> {
        Self::from_keys(members)
    }
}

impl From<DecoySet> for Vec<VerifyingKey> {
    fn from(set: DecoySet) -> Self {
        set.members
    }
}

impl<'a> IntoIterator for &'a DecoySet {
    type Item = &'a VerifyingKey;
    type IntoIter = core::slice::Iter<'a, VerifyingKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::SigningKey;

    #[test]
    fn test_generate_is_deterministic() {
        let a = DecoySet::generate(b"seed", 5).unwrap();
        let b = DecoySet::generate(b"seed", 5).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 5);
    }

    #[test]
    fn test_generate_prefix_stable() {
        let small = DecoySet::generate(b"seed", 3).unwrap();
        let large = DecoySet::generate(b"seed", 6).unwrap();
        assert_eq!(small.as_slice(), &large.as_slice()[..3]);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = DecoySet::generate(b"seed-a", 4).unwrap();
        let b = DecoySet::generate(b"seed-b", 4).unwrap();
        assert!(a.iter().all(|key| !b.contains(key)));
    }

    #[test]
    fn test_members_are_distinct_and_valid() {
        let set = DecoySet::generate(b"distinct", 32).unwrap();
        let unique: HashSet<_> = set.iter().copied().collect();
        assert_eq!(unique.len(), 32);
        assert!(set.iter().all(|key| key.as_affine().validate().is_ok()));
    }

    #[test]
    fn test_zero_count() {
        let set = DecoySet::generate(b"seed", 0).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_from_keys_rejects_duplicates() {
        let key = SigningKey::generate(1).verifying_key();
        assert_eq!(
            DecoySet::from_keys(vec![key, key]),
            Err(Error::InvalidRing("duplicate decoy"))
        );
    }

    #[test]
    fn test_generate_rejects_oversized_request() {
        assert_eq!(
            DecoySet::generate(b"seed", usize::MAX),
            Err(Error::InvalidRing("too many decoys requested"))
        );
        assert_eq!(
            DecoySet::generate(b"seed", MAX_DECOY_COUNT + 1),
            Err(Error::InvalidRing("too many decoys requested"))
        );
        assert_eq!(
            generate_decoy_members(b"seed", usize::MAX, 2),
            Err(Error::InvalidRing("too many decoys requested"))
        );
    }

    #[test]
    fn test_decoy_members_shape() {
        let members = generate_decoy_members(b"layers", 4, 3).unwrap();
        assert_eq!(members.len(), 4);
        assert!(members.iter().all(|member| member.len() == 3));
        let unique: HashSet<_> = members.iter().flatten().copied().collect();
        assert_eq!(unique.len(), 12);
        assert_eq!(
            generate_decoy_members(b"layers", 4, 0),
            Err(Error::InvalidRing("ring member has no keys"))
        );
    }

    #[test]
    fn test_ring_with_appends_signer() {
        let set = DecoySet::generate(b"seed", 2).unwrap();
        let signer = SigningKey::generate(2).verifying_key();
        let ring = set.ring_with(&signer);
        assert_eq!(ring.len(), 3);
        assert_eq!(ring[2], signer);
        assert_eq!(&ring[..2], set.as_slice());
    }
}
