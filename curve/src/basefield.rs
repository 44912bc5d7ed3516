//! Base field of the SM2 curve.
//! p = 0xfffffffeffffffffffffffffffffffffffffffff00000000ffffffffffffffff
//!
//! Elements are kept in Montgomery form as [u64; 4], little-endian.

use rand::distr::{Distribution, StandardUniform};
use rand::Rng;

use crate::montgomery::{impl_montgomery_field, limbs_from_be_bytes, lt_mask};

/// Element of the SM2 base field F_p.
#[derive(Copy, Clone, Default)]
pub struct BaseField {
    /// Montgomery form: value * R mod p, where R = 2^256
    pub(crate) limbs: [u64; 4],
}

// Field modulus p
const MODULUS: [u64; 4] = [
    0xffffffffffffffff,
    0xffffffff00000000,
    0xffffffffffffffff,
    0xfffffffeffffffff,
];

// R = 2^256 mod p
const R: [u64; 4] = [
    0x0000000000000001,
    0x00000000ffffffff,
    0x0000000000000000,
    0x0000000100000000,
];

// R^2 = 2^512 mod p
const R2: [u64; 4] = [
    0x0000000200000003,
    0x00000002ffffffff,
    0x0000000100000001,
    0x0000000400000002,
];

// -p^{-1} mod 2^64
const MU: u64 = 0x0000000000000001;

// (p + 1) / 4, the square-root exponent (p = 3 mod 4)
const SQRT_EXP: [u64; 4] = [
    0x4000000000000000,
    0xffffffffc0000000,
    0xffffffffffffffff,
    0x3fffffffbfffffff,
];

impl_montgomery_field!(BaseField);

impl BaseField {
    /// Builds an element directly from Montgomery-form limbs.
    pub(crate) const fn from_montgomery(limbs: [u64; 4]) -> Self {
        BaseField { limbs }
    }

    /// Square root, if one exists. For p = 3 mod 4 the candidate is
    /// a^((p+1)/4); it is checked by squaring.
    pub fn sqrt(&self) -> Option<Self> {
        let candidate = self.pow_vartime(&SQRT_EXP);
        if candidate.square() == *self {
            Some(candidate)
        } else {
            None
        }
    }
}

impl Distribution<BaseField> for StandardUniform {
    /// Rejection-samples a uniform element of [0, p).
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BaseField {
        loop {
            let limbs = limbs_from_be_bytes(&rng.random::<[u8; 32]>());
            if lt_mask(&limbs, &MODULUS) != 0 {
                return BaseField::from_canonical_limbs(limbs);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;

    #[test]
    fn test_montgomery_constants() {
        let p = BaseField::order();
        let r = (BigUint::from(1u8) << 256) % &p;
        assert_eq!(BaseField::ONE.as_canonical_biguint(), BigUint::from(1u8));
        assert_eq!(BaseField { limbs: R2 }.as_canonical_biguint(), r);
    }

    #[test]
    fn test_arithmetic() {
        let a = BaseField::from_canonical_u64(6);
        let b = BaseField::from_canonical_u64(7);
        assert_eq!(a * b, BaseField::from_canonical_u64(42));
        assert_eq!(b - a, BaseField::ONE);
        assert_eq!(a - b, -BaseField::ONE);
        assert_eq!(a + (-a), BaseField::ZERO);
    }

    #[test]
    fn test_inverse() {
        let a = BaseField::from_canonical_u64(0xdead_beef);
        assert_eq!(a * a.inverse(), BaseField::ONE);
        assert!(BaseField::ZERO.try_inverse().is_none());
    }

    #[test]
    fn test_sqrt() {
        let a = BaseField::from_canonical_u64(1234567);
        let sq = a.square();
        let root = sq.sqrt().expect("square has a root");
        assert!(root == a || root == -a);

        // -1 is a non-residue when p = 3 mod 4.
        assert!((-BaseField::ONE).sqrt().is_none());
    }

    #[test]
    fn test_bytes_roundtrip_and_range() {
        let a = BaseField::from_canonical_u64(0x0102_0304_0506_0708);
        let bytes = a.to_bytes_be();
        assert_eq!(BaseField::from_bytes_be(&bytes), Some(a));

        let p_bytes = crate::montgomery::limbs_to_be_bytes(&MODULUS);
        assert!(BaseField::from_bytes_be(&p_bytes).is_none());
        assert_eq!(BaseField::from_bytes_reduced(&p_bytes), BaseField::ZERO);
    }
}
