//! Scalar field of the SM2 curve (the prime group order).
//! n = 0xfffffffeffffffffffffffffffffffff7203df6b21c6052b53bbf40939d54123
//!
//! This implementation uses Montgomery form for efficient modular arithmetic.
//! The field element is represented as [u64; 4] in little-endian order.

use rand::distr::{Distribution, StandardUniform};
use rand::Rng;

use crate::montgomery::{impl_montgomery_field, lt_mask};

/// Scalar field element for the curve
/// Represented in Montgomery form with [u64; 4]
#[derive(Copy, Clone, Default)]
pub struct ScalarField {
    /// Montgomery form: value * R mod n, where R = 2^256
    pub(crate) limbs: [u64; 4],
}

// Group order n
const MODULUS: [u64; 4] = [
    0x53bbf40939d54123,
    0x7203df6b21c6052b,
    0xffffffffffffffff,
    0xfffffffeffffffff,
];

// R = 2^256 mod n (Montgomery parameter)
const R: [u64; 4] = [
    0xac440bf6c62abedd,
    0x8dfc2094de39fad4,
    0x0000000000000000,
    0x0000000100000000,
];

// R^2 = 2^512 mod n (for Montgomery conversion)
const R2: [u64; 4] = [
    0x901192af7c114f20,
    0x3464504ade6fa2fa,
    0x620fc84c3affe0d4,
    0x1eb5e412a22b3d3b,
];

// -n^{-1} mod 2^64 (Montgomery parameter mu)
const MU: u64 = 0x327f9e8872350975;

impl_montgomery_field!(ScalarField);

impl ScalarField {
    /// Decodes a scalar that must lie in [1, n-1].
    pub fn from_bytes_nonzero(bytes: &[u8; 32]) -> Option<Self> {
        Self::from_bytes_be(bytes).filter(|s| !bool::from(s.is_zero()))
    }

    /// Converts a base-field element (an x-coordinate) into a scalar, reducing mod n.
    pub fn from_base_field(x: &crate::BaseField) -> Self {
        Self::from_bytes_reduced(&x.to_bytes_be())
    }
}

impl Distribution<ScalarField> for StandardUniform {
    /// Rejection-samples a uniform non-zero scalar.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ScalarField {
        loop {
            let bytes: [u8; 32] = rng.random();
            let limbs = crate::montgomery::limbs_from_be_bytes(&bytes);
            if lt_mask(&limbs, &MODULUS) == 0 || limbs == [0, 0, 0, 0] {
                continue;
            }
            return ScalarField::from_canonical_limbs(limbs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zero_one() {
        assert_eq!(ScalarField::ZERO + ScalarField::ZERO, ScalarField::ZERO);
        assert_eq!(ScalarField::ONE * ScalarField::ONE, ScalarField::ONE);
        assert_eq!(ScalarField::ZERO * ScalarField::ONE, ScalarField::ZERO);
        assert_eq!(ScalarField::ONE + ScalarField::ZERO, ScalarField::ONE);
    }

    #[test]
    fn test_addition() {
        let a = ScalarField::from_canonical_u64(5);
        let b = ScalarField::from_canonical_u64(7);
        assert_eq!(a + b, ScalarField::from_canonical_u64(12));
    }

    #[test]
    fn test_subtraction() {
        let a = ScalarField::from_canonical_u64(10);
        let b = ScalarField::from_canonical_u64(3);
        assert_eq!(a - b, ScalarField::from_canonical_u64(7));
    }

    #[test]
    fn test_multiplication() {
        let a = ScalarField::from_canonical_u64(6);
        let b = ScalarField::from_canonical_u64(7);
        assert_eq!(a * b, ScalarField::from_canonical_u64(42));
    }

    #[test]
    fn test_negation() {
        let a = ScalarField::from_canonical_u64(5);
        assert_eq!(a + (-a), ScalarField::ZERO);
    }

    #[test]
    fn test_inverse() {
        let a = ScalarField::from_canonical_u64(5);
        assert_eq!(a * a.inverse(), ScalarField::ONE);
    }

    #[test]
    fn test_order_matches_modulus() {
        let n = BigUint::parse_bytes(
            b"fffffffeffffffffffffffffffffffff7203df6b21c6052b53bbf40939d54123",
            16,
        )
        .unwrap();
        assert_eq!(ScalarField::order(), n);
        assert_eq!(
            (-ScalarField::ONE).as_canonical_biguint(),
            n - BigUint::from(1u8)
        );
    }

    #[test]
    fn test_wide_reduction() {
        // 2^256 mod n equals R.
        let mut bytes = [0u8; 64];
        bytes[31] = 1;
        let r = ScalarField::from_bytes_wide(&bytes);
        assert_eq!(r.to_canonical_limbs(), R);

        let mut small = [0u8; 64];
        small[63] = 9;
        assert_eq!(
            ScalarField::from_bytes_wide(&small),
            ScalarField::from_canonical_u64(9)
        );
    }

    #[test]
    fn test_nonzero_decoding() {
        assert!(ScalarField::from_bytes_nonzero(&[0u8; 32]).is_none());
        let n_bytes = crate::montgomery::limbs_to_be_bytes(&MODULUS);
        assert!(ScalarField::from_bytes_nonzero(&n_bytes).is_none());
        let mut one = [0u8; 32];
        one[31] = 1;
        assert_eq!(ScalarField::from_bytes_nonzero(&one), Some(ScalarField::ONE));
    }

    #[test]
    fn test_random_is_canonical_and_nonzero() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            let s: ScalarField = StandardUniform.sample(&mut rng);
            assert!(!bool::from(s.is_zero()));
            assert_eq!(ScalarField::from_bytes_be(&s.to_bytes_be()), Some(s));
        }
    }
}
