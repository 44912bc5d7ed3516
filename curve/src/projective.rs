use crate::affine::{Affine, CURVE_A, CURVE_B};
use crate::basefield::BaseField;
use crate::{double_scalar_mul_basepoint_affine, Group, ScalarField};
use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// Projective point on the SM2 curve.
/// Represents a point in projective coordinates (X:Y:Z) where (x,y) = (X/Z, Y/Z).
/// The point at infinity is represented as (0:1:0).
///
/// Addition and doubling use the complete formulas of Renes, Costello and
/// Batina for a = -3, so no input needs special casing.
#[derive(Copy, Clone, Debug)]
pub struct Projective {
    pub x: BaseField,
    pub y: BaseField,
    pub z: BaseField,
}

impl Projective {
    /// The point at infinity (identity element): (0:1:0)
    pub const INFINITY: Self = Projective {
        x: BaseField::ZERO,
        y: BaseField::ONE,
        z: BaseField::ZERO,
    };

    /// Create a new projective point.
    pub fn new(x: BaseField, y: BaseField, z: BaseField) -> Self {
        Projective { x, y, z }
    }

    /// Check if this point is the point at infinity.
    #[inline]
    pub fn is_infinity(&self) -> bool {
        self.z.is_zero().into()
    }

    /// Convert to affine coordinates.
    pub fn to_affine(&self) -> Affine {
        match self.z.try_inverse() {
            Some(z_inv) => Affine::new_unchecked(self.x * z_inv, self.y * z_inv),
            None => Affine::INFINITY,
        }
    }

    /// Convert from affine coordinates.
    pub fn from_affine(point: &Affine) -> Self {
        if point.is_infinity() {
            return Self::INFINITY;
        }

        Projective::new(point.x, point.y, BaseField::ONE)
    }

    /// Check if a point is on the curve: Y^2*Z = X^3 + a*X*Z^2 + b*Z^3.
    pub fn is_on_curve(&self) -> bool {
        if self.is_infinity() {
            return self.x.is_zero().into() && !bool::from(self.y.is_zero());
        }

        let z2 = self.z.square();
        let lhs = self.y.square() * self.z;
        let rhs = self.x.square() * self.x + CURVE_A * self.x * z2 + CURVE_B * z2 * self.z;

        lhs == rhs
    }

    /// The standard SM2 base point.
    pub fn generator() -> Self {
        Self::from_affine(&Affine::generator())
    }

    /// Point doubling: 2*P.
    pub fn double(&self) -> Self {
        let (x, y, z) = (self.x, self.y, self.z);

        let mut t0 = x.square();
        let t1 = y.square();
        let mut t2 = z.square();
        let mut t3 = x * y;
        t3 = t3.double();
        let mut z3 = x * z;
        z3 = z3.double();
        let mut y3 = CURVE_B * t2;
        y3 -= z3;
        let mut x3 = y3.double();
        y3 += x3;
        x3 = t1 - y3;
        y3 += t1;
        y3 *= x3;
        x3 *= t3;
        t3 = t2.double();
        t2 += t3;
        z3 *= CURVE_B;
        z3 -= t2;
        z3 -= t0;
        t3 = z3.double();
        z3 += t3;
        t3 = t0.double();
        t0 += t3;
        t0 -= t2;
        t0 *= z3;
        y3 += t0;
        t0 = (y * z).double();
        z3 = t0 * z3;
        x3 -= z3;
        z3 = (t0 * t1).double().double();

        Projective::new(x3, y3, z3)
    }

    /// Negate a point.
    pub fn negate(&self) -> Self {
        Projective::new(self.x, -self.y, self.z)
    }

    /// Multiply the fixed generator using a precomputed table.
    pub fn mul_generator(scalar: &ScalarField) -> Self {
        crate::generator_table::mul_generator(scalar)
    }

    /// Compute a * G + b * P, where G is the fixed generator. Variable time.
    pub fn double_scalar_mul_basepoint(a: &ScalarField, b: &ScalarField, point: &Self) -> Self {
        Projective::from_affine(&double_scalar_mul_basepoint_affine(a, b, &point.to_affine()))
    }

    /// Batch normalization: convert multiple projective points to affine
    /// with a single field inversion.
    pub fn batch_normalize(points: &[Self]) -> Vec<Affine> {
        let mut prefix = Vec::with_capacity(points.len());
        let mut acc = BaseField::ONE;
        for p in points {
            prefix.push(acc);
            if !p.is_infinity() {
                acc *= p.z;
            }
        }

        let mut inv = acc.inverse();
        let mut out = vec![Affine::INFINITY; points.len()];
        for (i, p) in points.iter().enumerate().rev() {
            if p.is_infinity() {
                continue;
            }
            let z_inv = inv * prefix[i];
            inv *= p.z;
            out[i] = Affine::new_unchecked(p.x * z_inv, p.y * z_inv);
        }
        out
    }
}

impl Default for Projective {
    fn default() -> Self {
        Self::INFINITY
    }
}

impl ConstantTimeEq for Projective {
    fn ct_eq(&self, other: &Self) -> Choice {
        // (X1/Z1, Y1/Z1) == (X2/Z2, Y2/Z2) by cross multiplication.
        (self.x * other.z).ct_eq(&(other.x * self.z))
            & (self.y * other.z).ct_eq(&(other.y * self.z))
    }
}

impl ConditionallySelectable for Projective {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Projective {
            x: BaseField::conditional_select(&a.x, &b.x, choice),
            y: BaseField::conditional_select(&a.y, &b.y, choice),
            z: BaseField::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl PartialEq for Projective {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Projective {}

impl Group for Projective {
    type Scalar = ScalarField;

    #[inline]
    fn identity() -> Self {
        Self::INFINITY
    }

    #[inline]
    fn is_identity(&self) -> bool {
        self.is_infinity()
    }

    #[inline]
    fn generator() -> Self {
        Projective::generator()
    }

    #[inline]
    fn mul_generator(scalar: &ScalarField) -> Self {
        Projective::mul_generator(scalar)
    }

    #[inline]
    fn double(&self) -> Self {
        Self::double(self)
    }

    #[inline]
    fn negate(&self) -> Self {
        Self::negate(self)
    }
}

impl Add for Projective {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        let (x1, y1, z1) = (self.x, self.y, self.z);
        let (x2, y2, z2) = (other.x, other.y, other.z);

        let mut t0 = x1 * x2;
        let mut t1 = y1 * y2;
        let mut t2 = z1 * z2;
        let mut t3 = (x1 + y1) * (x2 + y2);
        let mut t4 = t0 + t1;
        t3 -= t4;
        t4 = (y1 + z1) * (y2 + z2);
        let mut x3 = t1 + t2;
        t4 -= x3;
        x3 = (x1 + z1) * (x2 + z2);
        let mut y3 = t0 + t2;
        y3 = x3 - y3;
        let mut z3 = CURVE_B * t2;
        x3 = y3 - z3;
        z3 = x3.double();
        x3 += z3;
        z3 = t1 - x3;
        x3 += t1;
        y3 *= CURVE_B;
        t1 = t2.double();
        t2 += t1;
        y3 -= t2;
        y3 -= t0;
        t1 = y3.double();
        y3 += t1;
        t1 = t0.double();
        t0 += t1;
        t0 -= t2;
        t1 = t4 * y3;
        t2 = t0 * y3;
        y3 = x3 * z3;
        y3 += t2;
        x3 *= t3;
        x3 -= t1;
        z3 *= t4;
        t1 = t3 * t0;
        z3 += t1;

        Projective::new(x3, y3, z3)
    }
}

impl AddAssign for Projective {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

#[allow(clippy::suspicious_arithmetic_impl)]
impl Sub for Projective {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self + other.negate()
    }
}

impl SubAssign for Projective {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Projective {
    type Output = Self;

    fn neg(self) -> Self {
        self.negate()
    }
}

// Scalar multiplication
impl Mul<ScalarField> for Projective {
    type Output = Self;

    fn mul(self, scalar: ScalarField) -> Self {
        <Self as Group>::scalar_mul(&self, &scalar)
    }
}

impl Mul<&ScalarField> for Projective {
    type Output = Self;

    fn mul(self, scalar: &ScalarField) -> Self {
        <Self as Group>::scalar_mul(&self, scalar)
    }
}

impl Mul<Projective> for ScalarField {
    type Output = Projective;

    fn mul(self, point: Projective) -> Projective {
        <Projective as Group>::scalar_mul(&point, &self)
    }
}

impl Mul<&Projective> for ScalarField {
    type Output = Projective;

    fn mul(self, point: &Projective) -> Projective {
        <Projective as Group>::scalar_mul(point, &self)
    }
}

// Conversions
impl From<Affine> for Projective {
    fn from(point: Affine) -> Self {
        Projective::from_affine(&point)
    }
}

impl From<&Affine> for Projective {
    fn from(point: &Affine) -> Self {
        Projective::from_affine(point)
    }
}

impl From<Projective> for Affine {
    fn from(point: Projective) -> Self {
        point.to_affine()
    }
}

impl From<&Projective> for Affine {
    fn from(point: &Projective) -> Self {
        point.to_affine()
    }
}
