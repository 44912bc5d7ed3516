//! 256-bit limb arithmetic shared by the base field and the scalar field.
//!
//! Both fields keep elements in Montgomery form as `[u64; 4]` in
//! little-endian limb order. Every helper here is branch-free in its data
//! arguments: reductions select the corrected value with masks instead of
//! comparing and branching.

/// Add with carry. `carry` is 0 or 1.
#[inline(always)]
pub(crate) const fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let ret = (a as u128) + (b as u128) + (carry as u128);
    (ret as u64, (ret >> 64) as u64)
}

/// Subtract with borrow. `borrow` is 0 or `u64::MAX`, and so is the returned borrow.
#[inline(always)]
pub(crate) const fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let ret = (a as u128).wrapping_sub((b as u128) + ((borrow >> 63) as u128));
    (ret as u64, (ret >> 64) as u64)
}

/// Computes `a + (b * c) + carry`, returning the low limb and the carry limb.
#[inline(always)]
pub(crate) const fn mac(a: u64, b: u64, c: u64, carry: u64) -> (u64, u64) {
    let ret = (a as u128) + ((b as u128) * (c as u128)) + (carry as u128);
    (ret as u64, (ret >> 64) as u64)
}

/// Computes `l - r` over five limbs, adding `modulus` back when the
/// subtraction underflows.
#[inline]
pub(crate) const fn sub_inner(l: [u64; 5], r: [u64; 5], modulus: &[u64; 4]) -> [u64; 4] {
    let (w0, borrow) = sbb(l[0], r[0], 0);
    let (w1, borrow) = sbb(l[1], r[1], borrow);
    let (w2, borrow) = sbb(l[2], r[2], borrow);
    let (w3, borrow) = sbb(l[3], r[3], borrow);
    let (_, borrow) = sbb(l[4], r[4], borrow);

    let (w0, carry) = adc(w0, modulus[0] & borrow, 0);
    let (w1, carry) = adc(w1, modulus[1] & borrow, carry);
    let (w2, carry) = adc(w2, modulus[2] & borrow, carry);
    let (w3, _) = adc(w3, modulus[3] & borrow, carry);

    [w0, w1, w2, w3]
}

/// `(a + b) mod m` for `a, b < m`.
#[inline]
pub(crate) const fn add_mod(a: &[u64; 4], b: &[u64; 4], modulus: &[u64; 4]) -> [u64; 4] {
    let (w0, carry) = adc(a[0], b[0], 0);
    let (w1, carry) = adc(a[1], b[1], carry);
    let (w2, carry) = adc(a[2], b[2], carry);
    let (w3, w4) = adc(a[3], b[3], carry);

    sub_inner(
        [w0, w1, w2, w3, w4],
        [modulus[0], modulus[1], modulus[2], modulus[3], 0],
        modulus,
    )
}

/// `(a - b) mod m` for `a, b < m`.
#[inline]
pub(crate) const fn sub_mod(a: &[u64; 4], b: &[u64; 4], modulus: &[u64; 4]) -> [u64; 4] {
    sub_inner(
        [a[0], a[1], a[2], a[3], 0],
        [b[0], b[1], b[2], b[3], 0],
        modulus,
    )
}

/// `-a mod m`.
#[inline]
pub(crate) const fn neg_mod(a: &[u64; 4], modulus: &[u64; 4]) -> [u64; 4] {
    sub_mod(&[0, 0, 0, 0], a, modulus)
}

/// Reduces a value `< 2m` into `[0, m)`.
#[inline]
pub(crate) const fn reduce_once(a: &[u64; 4], modulus: &[u64; 4]) -> [u64; 4] {
    sub_inner(
        [a[0], a[1], a[2], a[3], 0],
        [modulus[0], modulus[1], modulus[2], modulus[3], 0],
        modulus,
    )
}

/// Returns `u64::MAX` when `a < m` and 0 otherwise.
#[inline]
pub(crate) const fn lt_mask(a: &[u64; 4], modulus: &[u64; 4]) -> u64 {
    let (_, borrow) = sbb(a[0], modulus[0], 0);
    let (_, borrow) = sbb(a[1], modulus[1], borrow);
    let (_, borrow) = sbb(a[2], modulus[2], borrow);
    let (_, borrow) = sbb(a[3], modulus[3], borrow);
    borrow
}

/// Montgomery multiplication: `a * b * 2^-256 mod m`, where `mu = -m^-1 mod 2^64`.
#[inline]
pub(crate) fn montgomery_mul(a: &[u64; 4], b: &[u64; 4], modulus: &[u64; 4], mu: u64) -> [u64; 4] {
    let mut t = [0u64; 8];

    for i in 0..4 {
        let mut carry = 0;
        for j in 0..4 {
            (t[i + j], carry) = mac(t[i + j], a[i], b[j], carry);
        }
        t[i + 4] = carry;
    }

    // Montgomery reduction, one limb per round. `top` is the bit that
    // overflows past t[i + 4].
    let mut top = 0;
    for i in 0..4 {
        let k = t[i].wrapping_mul(mu);
        let (_, mut carry) = mac(t[i], k, modulus[0], 0);
        for j in 1..4 {
            (t[i + j], carry) = mac(t[i + j], k, modulus[j], carry);
        }
        (t[i + 4], top) = adc(t[i + 4], top, carry);
    }

    sub_inner(
        [t[4], t[5], t[6], t[7], top],
        [modulus[0], modulus[1], modulus[2], modulus[3], 0],
        modulus,
    )
}

/// Big-endian bytes to little-endian limbs.
#[inline]
pub(crate) fn limbs_from_be_bytes(bytes: &[u8; 32]) -> [u64; 4] {
    let mut limbs = [0u64; 4];
    for (i, limb) in limbs.iter_mut().enumerate() {
        let start = 24 - 8 * i;
        let mut chunk = [0u8; 8];
        chunk.copy_from_slice(&bytes[start..start + 8]);
        *limb = u64::from_be_bytes(chunk);
    }
    limbs
}

/// Little-endian limbs to big-endian bytes.
#[inline]
pub(crate) fn limbs_to_be_bytes(limbs: &[u64; 4]) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    for (i, limb) in limbs.iter().enumerate() {
        let start = 24 - 8 * i;
        bytes[start..start + 8].copy_from_slice(&limb.to_be_bytes());
    }
    bytes
}

/// Implements the arithmetic surface shared by the two Montgomery-form
/// fields. The target type must be a tuple-less struct with a single
/// `limbs: [u64; 4]` field, and the invoking module must define `MODULUS`,
/// `R`, `R2` and `MU`.
macro_rules! impl_montgomery_field {
    ($field:ident) => {
        impl $field {
            /// Zero element.
            pub const ZERO: Self = Self { limbs: [0, 0, 0, 0] };

            /// One element (`R mod m` in Montgomery form).
            pub const ONE: Self = Self { limbs: R };

            /// Size of the canonical big-endian encoding.
            pub const BYTES: usize = 32;

            /// Create an element from a small integer.
            #[inline]
            pub fn from_canonical_u64(val: u64) -> Self {
                Self::from_canonical_limbs([val, 0, 0, 0])
            }

            /// Converts canonical little-endian limbs (`< m`) into Montgomery form.
            #[inline]
            pub(crate) fn from_canonical_limbs(limbs: [u64; 4]) -> Self {
                Self {
                    limbs: $crate::montgomery::montgomery_mul(&limbs, &R2, &MODULUS, MU),
                }
            }

            /// Canonical little-endian limbs of the value.
            #[inline]
            pub fn to_canonical_limbs(&self) -> [u64; 4] {
                $crate::montgomery::montgomery_mul(&self.limbs, &[1, 0, 0, 0], &MODULUS, MU)
            }

            /// Decodes a canonical big-endian encoding. Returns `None` when the
            /// value is not below the modulus.
            pub fn from_bytes_be(bytes: &[u8; 32]) -> Option<Self> {
                let limbs = $crate::montgomery::limbs_from_be_bytes(bytes);
                let canonical = $crate::montgomery::lt_mask(&limbs, &MODULUS);
                if canonical == 0 {
                    return None;
                }
                Some(Self::from_canonical_limbs(limbs))
            }

            /// Interprets any 256-bit big-endian integer and reduces it mod m.
            pub fn from_bytes_reduced(bytes: &[u8; 32]) -> Self {
                let limbs = $crate::montgomery::limbs_from_be_bytes(bytes);
                Self::from_canonical_limbs($crate::montgomery::reduce_once(&limbs, &MODULUS))
            }

            /// Interprets a 512-bit big-endian integer and reduces it mod m.
            pub fn from_bytes_wide(bytes: &[u8; 64]) -> Self {
                let mut hi = [0u8; 32];
                let mut lo = [0u8; 32];
                hi.copy_from_slice(&bytes[..32]);
                lo.copy_from_slice(&bytes[32..]);
                // Montgomery limbs R2 hold the value 2^256 mod m.
                let shift = Self { limbs: R2 };
                Self::from_bytes_reduced(&hi) * shift + Self::from_bytes_reduced(&lo)
            }

            /// Canonical big-endian encoding.
            pub fn to_bytes_be(&self) -> [u8; 32] {
                $crate::montgomery::limbs_to_be_bytes(&self.to_canonical_limbs())
            }

            /// The modulus as an arbitrary-precision integer.
            pub fn order() -> num_bigint::BigUint {
                num_bigint::BigUint::from_bytes_be(&$crate::montgomery::limbs_to_be_bytes(&MODULUS))
            }

            /// The value as an arbitrary-precision integer.
            pub fn as_canonical_biguint(&self) -> num_bigint::BigUint {
                num_bigint::BigUint::from_bytes_be(&self.to_bytes_be())
            }

            /// Converts an integer below the modulus; `None` otherwise.
            pub fn from_biguint(value: &num_bigint::BigUint) -> Option<Self> {
                let raw = value.to_bytes_be();
                if raw.len() > 32 {
                    return None;
                }
                let mut bytes = [0u8; 32];
                bytes[32 - raw.len()..].copy_from_slice(&raw);
                Self::from_bytes_be(&bytes)
            }

            #[inline]
            pub fn square(&self) -> Self {
                *self * *self
            }

            #[inline]
            pub fn double(&self) -> Self {
                *self + *self
            }

            /// Exponentiation by a public exponent. Runtime depends on the
            /// exponent only, never on `self`.
            pub fn pow_vartime(&self, exp: &[u64; 4]) -> Self {
                let mut result = Self::ONE;
                for limb in exp.iter().rev() {
                    for bit in (0..64).rev() {
                        result = result.square();
                        if (limb >> bit) & 1 == 1 {
                            result *= *self;
                        }
                    }
                }
                result
            }

            /// Multiplicative inverse via Fermat's little theorem. Zero maps to zero.
            pub fn inverse(&self) -> Self {
                let exp = $crate::montgomery::sub_mod(&MODULUS, &[2, 0, 0, 0], &MODULUS);
                self.pow_vartime(&exp)
            }

            /// Multiplicative inverse, `None` for zero.
            pub fn try_inverse(&self) -> Option<Self> {
                if bool::from(self.is_zero()) {
                    None
                } else {
                    Some(self.inverse())
                }
            }

            #[inline]
            pub fn is_zero(&self) -> subtle::Choice {
                subtle::ConstantTimeEq::ct_eq(self, &Self::ZERO)
            }

            /// Whether the canonical value is odd.
            #[inline]
            pub fn is_odd(&self) -> subtle::Choice {
                subtle::Choice::from((self.to_canonical_limbs()[0] & 1) as u8)
            }
        }

        impl subtle::ConstantTimeEq for $field {
            fn ct_eq(&self, other: &Self) -> subtle::Choice {
                subtle::ConstantTimeEq::ct_eq(&self.limbs[..], &other.limbs[..])
            }
        }

        impl subtle::ConditionallySelectable for $field {
            fn conditional_select(a: &Self, b: &Self, choice: subtle::Choice) -> Self {
                Self {
                    limbs: [
                        <u64 as subtle::ConditionallySelectable>::conditional_select(&a.limbs[0], &b.limbs[0], choice),
                        <u64 as subtle::ConditionallySelectable>::conditional_select(&a.limbs[1], &b.limbs[1], choice),
                        <u64 as subtle::ConditionallySelectable>::conditional_select(&a.limbs[2], &b.limbs[2], choice),
                        <u64 as subtle::ConditionallySelectable>::conditional_select(&a.limbs[3], &b.limbs[3], choice),
                    ],
                }
            }
        }

        impl PartialEq for $field {
            fn eq(&self, other: &Self) -> bool {
                subtle::ConstantTimeEq::ct_eq(self, other).into()
            }
        }

        impl Eq for $field {}

        impl core::hash::Hash for $field {
            fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
                core::hash::Hash::hash(&self.limbs, state);
            }
        }

        impl zeroize::Zeroize for $field {
            fn zeroize(&mut self) {
                zeroize::Zeroize::zeroize(&mut self.limbs);
            }
        }

        impl core::ops::Add for $field {
            type Output = Self;

            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self {
                    limbs: $crate::montgomery::add_mod(&self.limbs, &rhs.limbs, &MODULUS),
                }
            }
        }

        impl core::ops::AddAssign for $field {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl core::ops::Sub for $field {
            type Output = Self;

            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self {
                    limbs: $crate::montgomery::sub_mod(&self.limbs, &rhs.limbs, &MODULUS),
                }
            }
        }

        impl core::ops::SubAssign for $field {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                *self = *self - rhs;
            }
        }

        impl core::ops::Neg for $field {
            type Output = Self;

            #[inline]
            fn neg(self) -> Self {
                Self {
                    limbs: $crate::montgomery::neg_mod(&self.limbs, &MODULUS),
                }
            }
        }

        impl core::ops::Mul for $field {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: Self) -> Self {
                Self {
                    limbs: $crate::montgomery::montgomery_mul(&self.limbs, &rhs.limbs, &MODULUS, MU),
                }
            }
        }

        impl core::ops::MulAssign for $field {
            #[inline]
            fn mul_assign(&mut self, rhs: Self) {
                *self = *self * rhs;
            }
        }

        impl core::iter::Sum for $field {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::ZERO, |acc, x| acc + x)
            }
        }

        impl core::iter::Product for $field {
            fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::ONE, |acc, x| acc * x)
            }
        }

        impl core::fmt::Display for $field {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                let canonical = self.to_canonical_limbs();
                write!(
                    f,
                    "0x{:016x}{:016x}{:016x}{:016x}",
                    canonical[3], canonical[2], canonical[1], canonical[0]
                )
            }
        }

        impl core::fmt::Debug for $field {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}({})", stringify!($field), self)
            }
        }

        impl serde::Serialize for $field {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serde::Serialize::serialize(&self.to_bytes_be(), serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $field {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let bytes = <[u8; 32] as serde::Deserialize>::deserialize(deserializer)?;
                Self::from_bytes_be(&bytes).ok_or_else(|| {
                    <D::Error as serde::de::Error>::custom(concat!(
                        "non-canonical ",
                        stringify!($field),
                        " encoding"
                    ))
                })
            }
        }
    };
}

pub(crate) use impl_montgomery_field;
