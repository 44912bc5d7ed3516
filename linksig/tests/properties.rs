//! Property tests over seeds and messages.

use linksig::{
    HexEncoding, Signature, VerifyingKey, derive_key_pair, generate_decoys, public_key_from,
    ring_sign, ring_verify, sign, verify,
};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn derived_public_key_matches(seed in prop::collection::vec(any::<u8>(), 0..64)) {
        let keys = derive_key_pair(&seed).unwrap();
        let public = public_key_from(&keys.signing_key().to_scalar()).unwrap();
        prop_assert_eq!(&public, keys.verifying_key());
    }

    #[test]
    fn encodings_roundtrip(seed in prop::collection::vec(any::<u8>(), 1..32), msg in prop::collection::vec(any::<u8>(), 0..64)) {
        let keys = derive_key_pair(&seed).unwrap();
        let sig = sign(keys.signing_key(), &msg).unwrap();

        prop_assert_eq!(Signature::from_bytes(&sig.to_bytes()).unwrap(), sig);
        prop_assert_eq!(Signature::from_hex(&sig.to_hex()).unwrap(), sig);
        let pk = keys.verifying_key();
        prop_assert_eq!(&VerifyingKey::from_hex(&pk.to_hex()).unwrap(), pk);
        prop_assert_eq!(&VerifyingKey::from_sec1_bytes(&pk.to_sec1_bytes(false)).unwrap(), pk);
    }

    #[test]
    fn signatures_verify_and_bind_message(
        seed in prop::collection::vec(any::<u8>(), 1..32),
        msg in prop::collection::vec(any::<u8>(), 1..64),
        flip in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let keys = derive_key_pair(&seed).unwrap();
        let sig = sign(keys.signing_key(), &msg).unwrap();
        prop_assert!(verify(keys.verifying_key(), &msg, &sig));

        let mut tampered = msg.clone();
        tampered[flip.index(msg.len())] ^= 1 << bit;
        prop_assert!(!verify(keys.verifying_key(), &tampered, &sig));

        let other = derive_key_pair(&[seed.as_slice(), b"-other".as_slice()].concat()).unwrap();
        prop_assert!(!verify(other.verifying_key(), &msg, &sig));
    }

    #[test]
    fn ring_signatures_verify_and_link(
        seed in prop::collection::vec(any::<u8>(), 1..32),
        msg in prop::collection::vec(any::<u8>(), 0..64),
        decoys in 1usize..6,
    ) {
        let keys = derive_key_pair(&seed).unwrap();
        let set_a = generate_decoys(&[b"a".as_slice(), seed.as_slice()].concat(), decoys).unwrap();
        let set_b = generate_decoys(&[b"b".as_slice(), seed.as_slice()].concat(), decoys).unwrap();

        let sig_a = ring_sign(b"nonce-a", keys.signing_key(), &set_a, &msg).unwrap();
        let sig_b = ring_sign(b"nonce-b", keys.signing_key(), &set_b, b"another").unwrap();

        prop_assert!(ring_verify(&msg, &set_a.ring_with(keys.verifying_key()), &sig_a));
        prop_assert!(!ring_verify(&msg, &set_b.ring_with(keys.verifying_key()), &sig_a));
        prop_assert_eq!(sig_a.tag(), sig_b.tag());
        prop_assert_eq!(sig_a.ring_size(), decoys + 1);

        let other = derive_key_pair(&[seed.as_slice(), b"-other".as_slice()].concat()).unwrap();
        prop_assume!(!set_a.contains(other.verifying_key()));
        let other_sig = ring_sign(b"nonce-a", other.signing_key(), &set_a, &msg).unwrap();
        prop_assert!(ring_verify(&msg, &set_a.ring_with(other.verifying_key()), &other_sig));
        prop_assert_ne!(other.verifying_key(), keys.verifying_key());
        prop_assert_ne!(sig_a.tag(), other_sig.tag());
    }
}
