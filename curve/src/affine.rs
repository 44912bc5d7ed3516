// SM2 recommended curve (GB/T 32918.5):
// E(F_p) : y^2 = x^3 + a*x + b, a = p - 3
// p  = 0xfffffffeffffffffffffffffffffffffffffffff00000000ffffffffffffffff
// b  = 0x28e9fa9e9d9f5e344d5a9e4bcf6509a7f39789f515ab8f92ddbcbd414d940e93
// n  = 0xfffffffeffffffffffffffffffffffff7203df6b21c6052b53bbf40939d54123
// Gx = 0x32c4ae2c1f1981195f9904466a39c9948fe30bbff2660be1715a4589334c74c7
// Gy = 0xbc3736a2f4f6779c59bdcee36b692153d0a9877cc62a474002df32e52139f0a0
// Curve cofactor: 1

use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::{BaseField, CurveError, Group, Projective, ScalarField};

/// Curve coefficient a = -3, Montgomery form.
pub const CURVE_A: BaseField = BaseField::from_montgomery([
    0xfffffffffffffffc,
    0xfffffffc00000003,
    0xffffffffffffffff,
    0xfffffffbffffffff,
]);

/// Curve coefficient b, Montgomery form.
pub const CURVE_B: BaseField = BaseField::from_montgomery([
    0x90d230632bc0dd42,
    0x71cf379ae9b537ab,
    0x527981505ea51c3c,
    0x240fe188ba20e2c8,
]);

const GENERATOR_X: BaseField = BaseField::from_montgomery([
    0x61328990f418029e,
    0x3e7981eddca6c050,
    0xd6a1ed99ac24c3c3,
    0x91167a5ee1c13b05,
]);

const GENERATOR_Y: BaseField = BaseField::from_montgomery([
    0xc1354e593c2d0ddd,
    0xc1f5e5788d3295fa,
    0x8d4cfb066e2a48f8,
    0x63cd65d481d735bd,
]);

/// SEC1 tag bytes.
const TAG_IDENTITY: u8 = 0x00;
const TAG_COMPRESSED_EVEN: u8 = 0x02;
const TAG_COMPRESSED_ODD: u8 = 0x03;
const TAG_UNCOMPRESSED: u8 = 0x04;

/// Length of a compressed SEC1 encoding.
pub const COMPRESSED_LEN: usize = 33;
/// Length of an uncompressed SEC1 encoding.
pub const UNCOMPRESSED_LEN: usize = 65;

/// Affine point on the SM2 curve.
/// Represents a point in affine coordinates (x, y) or the point at infinity.
#[derive(Copy, Clone, Debug)]
pub struct Affine {
    pub(crate) x: BaseField,
    pub(crate) y: BaseField,
    pub(crate) is_infinity: bool,
}

impl Affine {
    /// The point at infinity (identity element)
    pub const INFINITY: Self = Affine {
        x: BaseField::ZERO,
        y: BaseField::ZERO,
        is_infinity: true,
    };

    /// Builds a point without checking the curve equation.
    pub(crate) const fn new_unchecked(x: BaseField, y: BaseField) -> Self {
        Affine {
            x,
            y,
            is_infinity: false,
        }
    }

    /// Builds a point from coordinates, rejecting anything off the curve.
    pub fn from_coordinates(x: BaseField, y: BaseField) -> Result<Self, CurveError> {
        let point = Self::new_unchecked(x, y);
        if point.is_on_curve() {
            Ok(point)
        } else {
            Err(CurveError::InvalidPoint)
        }
    }

    /// The standard SM2 base point.
    pub const fn generator() -> Self {
        Self::new_unchecked(GENERATOR_X, GENERATOR_Y)
    }

    #[inline]
    pub fn x(&self) -> BaseField {
        self.x
    }

    #[inline]
    pub fn y(&self) -> BaseField {
        self.y
    }

    /// Check if this point is the point at infinity.
    #[inline]
    pub fn is_infinity(&self) -> bool {
        self.is_infinity
    }

    /// Right-hand side of the curve equation, x^3 + a*x + b.
    pub(crate) fn curve_rhs(x: &BaseField) -> BaseField {
        x.square() * *x + CURVE_A * *x + CURVE_B
    }

    /// Check if a point is on the curve: y^2 = x^3 + a*x + b.
    pub fn is_on_curve(&self) -> bool {
        if self.is_infinity {
            return true;
        }
        self.y.square() == Self::curve_rhs(&self.x)
    }

    /// Accepts only proper points: on the curve and not the identity.
    /// Every public point entering the crate passes through here.
    pub fn validate(&self) -> Result<(), CurveError> {
        if self.is_infinity || !self.is_on_curve() {
            return Err(CurveError::InvalidPoint);
        }
        Ok(())
    }

    /// Recovers the point with the given x-coordinate and y parity.
    pub fn decompress(x: &BaseField, y_is_odd: Choice) -> Result<Self, CurveError> {
        let y = Self::curve_rhs(x).sqrt().ok_or(CurveError::InvalidPoint)?;
        let flip = y.is_odd() ^ y_is_odd;
        let y = BaseField::conditional_select(&y, &-y, flip);
        Ok(Self::new_unchecked(*x, y))
    }

    /// SEC1 encoding. The identity encodes as the single byte `0x00`.
    pub fn to_sec1_bytes(&self, compress: bool) -> Vec<u8> {
        if self.is_infinity {
            return vec![TAG_IDENTITY];
        }
        let x = self.x.to_bytes_be();
        if compress {
            let mut out = Vec::with_capacity(COMPRESSED_LEN);
            out.push(if bool::from(self.y.is_odd()) {
                TAG_COMPRESSED_ODD
            } else {
                TAG_COMPRESSED_EVEN
            });
            out.extend_from_slice(&x);
            out
        } else {
            let mut out = Vec::with_capacity(UNCOMPRESSED_LEN);
            out.push(TAG_UNCOMPRESSED);
            out.extend_from_slice(&x);
            out.extend_from_slice(&self.y.to_bytes_be());
            out
        }
    }

    /// Decodes a SEC1 encoding (identity, compressed or uncompressed) and
    /// checks the result lies on the curve.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, CurveError> {
        match (bytes.first().copied(), bytes.len()) {
            (Some(TAG_IDENTITY), 1) => Ok(Self::INFINITY),
            (Some(tag @ (TAG_COMPRESSED_EVEN | TAG_COMPRESSED_ODD)), COMPRESSED_LEN) => {
                let x = decode_coordinate(&bytes[1..])?;
                Self::decompress(&x, Choice::from((tag == TAG_COMPRESSED_ODD) as u8))
            }
            (Some(TAG_UNCOMPRESSED), UNCOMPRESSED_LEN) => {
                let x = decode_coordinate(&bytes[1..33])?;
                let y = decode_coordinate(&bytes[33..])?;
                Self::from_coordinates(x, y)
            }
            _ => Err(CurveError::InvalidPoint),
        }
    }

    /// Point doubling: 2*P.
    pub fn double(&self) -> Self {
        Projective::from_affine(self).double().to_affine()
    }

    /// Negate a point.
    pub fn negate(&self) -> Self {
        if self.is_infinity {
            return *self;
        }
        Affine::new_unchecked(self.x, -self.y)
    }

    /// Multiply the fixed generator using the precomputed table.
    pub fn mul_generator(scalar: &ScalarField) -> Self {
        crate::mul_generator_affine(scalar)
    }

    /// Compute a * G + b * P, where G is the fixed generator. Variable time.
    pub fn double_scalar_mul_basepoint(a: &ScalarField, b: &ScalarField, point: &Self) -> Self {
        crate::double_scalar_mul_basepoint_affine(a, b, point)
    }
}

fn decode_coordinate(bytes: &[u8]) -> Result<BaseField, CurveError> {
    let mut buf = [0u8; 32];
    buf.copy_from_slice(bytes);
    BaseField::from_bytes_be(&buf).ok_or(CurveError::InvalidPoint)
}

impl Default for Affine {
    fn default() -> Self {
        Self::INFINITY
    }
}

impl ConstantTimeEq for Affine {
    fn ct_eq(&self, other: &Self) -> Choice {
        let both_infinity = Choice::from((self.is_infinity & other.is_infinity) as u8);
        let both_finite = Choice::from((!self.is_infinity & !other.is_infinity) as u8);
        both_infinity | (both_finite & self.x.ct_eq(&other.x) & self.y.ct_eq(&other.y))
    }
}

impl PartialEq for Affine {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Affine {}

impl core::hash::Hash for Affine {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        core::hash::Hash::hash(&self.to_sec1_bytes(true), state);
    }
}

impl Serialize for Affine {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_sec1_bytes(true).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Affine {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        Affine::from_sec1_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

// Arithmetic goes through projective coordinates, whose formulas are complete.
impl Add for Affine {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        (Projective::from_affine(&self) + Projective::from_affine(&other)).to_affine()
    }
}

impl AddAssign for Affine {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

#[allow(clippy::suspicious_arithmetic_impl)]
impl Sub for Affine {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self + other.negate()
    }
}

impl SubAssign for Affine {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Affine {
    type Output = Self;

    fn neg(self) -> Self {
        self.negate()
    }
}

// Scalar multiplication (constant time in the scalar)
impl Mul<ScalarField> for Affine {
    type Output = Self;

    fn mul(self, scalar: ScalarField) -> Self {
        Projective::from_affine(&self).scalar_mul(&scalar).to_affine()
    }
}

impl Mul<&ScalarField> for Affine {
    type Output = Self;

    fn mul(self, scalar: &ScalarField) -> Self {
        Projective::from_affine(&self).scalar_mul(scalar).to_affine()
    }
}

impl Mul<Affine> for ScalarField {
    type Output = Affine;

    fn mul(self, point: Affine) -> Affine {
        point * self
    }
}

impl Mul<&Affine> for ScalarField {
    type Output = Affine;

    fn mul(self, point: &Affine) -> Affine {
        *point * self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex32(s: &str) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
            out[i] = u8::from_str_radix(core::str::from_utf8(chunk).unwrap(), 16).unwrap();
        }
        out
    }

    #[test]
    fn test_infinity() {
        let inf = Affine::INFINITY;
        assert!(inf.is_infinity());
        assert!(inf.is_on_curve());
        assert_eq!(inf.validate(), Err(CurveError::InvalidPoint));
    }

    #[test]
    fn test_generator_matches_standard() {
        let g = Affine::generator();
        assert!(g.is_on_curve(), "Generator point is not on the curve");
        assert!(g.validate().is_ok());
        assert_eq!(
            g.x().to_bytes_be(),
            hex32("32c4ae2c1f1981195f9904466a39c9948fe30bbff2660be1715a4589334c74c7")
        );
        assert_eq!(
            g.y().to_bytes_be(),
            hex32("bc3736a2f4f6779c59bdcee36b692153d0a9877cc62a474002df32e52139f0a0")
        );
    }

    #[test]
    fn test_off_curve_rejected() {
        let g = Affine::generator();
        let bad = Affine::from_coordinates(g.x(), g.y() + BaseField::ONE);
        assert_eq!(bad, Err(CurveError::InvalidPoint));
    }

    #[test]
    fn test_point_addition_with_infinity() {
        let g = Affine::generator();
        let inf = Affine::INFINITY;

        assert_eq!(g + inf, g);
        assert_eq!(inf + g, g);
        assert_eq!(inf + inf, inf);
    }

    #[test]
    fn test_point_doubling() {
        let g = Affine::generator();
        let g2 = g.double();

        assert!(g2.is_on_curve(), "Doubled point is not on the curve");
        assert_eq!(g + g, g2);
    }

    #[test]
    fn test_point_negation() {
        let g = Affine::generator();
        let neg_g = g.negate();

        assert!(neg_g.is_on_curve());
        assert_eq!(g + neg_g, Affine::INFINITY);
    }

    #[test]
    fn test_sec1_roundtrip() {
        let p = Affine::generator() * ScalarField::from_canonical_u64(0x5eed);
        for compress in [true, false] {
            let bytes = p.to_sec1_bytes(compress);
            assert_eq!(
                bytes.len(),
                if compress { COMPRESSED_LEN } else { UNCOMPRESSED_LEN }
            );
            assert_eq!(Affine::from_sec1_bytes(&bytes), Ok(p));
        }
        assert_eq!(Affine::from_sec1_bytes(&[0x00]), Ok(Affine::INFINITY));
    }

    #[test]
    fn test_sec1_rejects_garbage() {
        assert!(Affine::from_sec1_bytes(&[]).is_err());
        assert!(Affine::from_sec1_bytes(&[0x05; 33]).is_err());

        let mut bytes = Affine::generator().to_sec1_bytes(false);
        bytes[64] ^= 1;
        assert_eq!(Affine::from_sec1_bytes(&bytes), Err(CurveError::InvalidPoint));

        // x = p is not a canonical coordinate.
        let mut p_x = vec![0x02];
        p_x.extend_from_slice(&hex32(
            "fffffffeffffffffffffffffffffffffffffffff00000000ffffffffffffffff",
        ));
        assert!(Affine::from_sec1_bytes(&p_x).is_err());
    }

    #[test]
    fn test_compressed_parity() {
        let g = Affine::generator();
        let neg = g.negate();
        let a = g.to_sec1_bytes(true);
        let b = neg.to_sec1_bytes(true);
        assert_ne!(a[0], b[0]);
        assert_eq!(a[1..], b[1..]);
        assert_eq!(Affine::from_sec1_bytes(&b), Ok(neg));
    }

    #[test]
    fn test_scalar_multiplication() {
        let g = Affine::generator();
        let scalar = ScalarField::from_canonical_u64(5);
        let result = g * scalar;

        // 5*G = G + G + G + G + G
        let expected = g + g + g + g + g;
        assert_eq!(result, expected);
        assert!(result.is_on_curve());
    }

    #[test]
    fn test_order_annihilates_generator() {
        // (n - 1) * G = -G
        let n_minus_one = -ScalarField::ONE;
        assert_eq!(Affine::generator() * n_minus_one, Affine::generator().negate());
    }

    #[test]
    fn test_mul_generator() {
        let scalar = ScalarField::from_canonical_u64(123456);
        let result = Affine::mul_generator(&scalar);
        let expected = Affine::generator() * scalar;

        assert_eq!(result, expected);
        assert!(result.is_on_curve());
    }
}
