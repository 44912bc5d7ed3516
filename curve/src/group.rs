use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use subtle::{ConditionallySelectable, ConstantTimeEq};

use crate::ScalarField;

/// Number of bits consumed per window in scalar multiplication.
pub(crate) const WINDOW_BITS: usize = 4;
/// Entries in a window table, including the identity at index 0.
pub(crate) const WINDOW_SIZE: usize = 1 << WINDOW_BITS;
/// Windows needed to cover a 256-bit scalar.
pub(crate) const WINDOW_COUNT: usize = 256 / WINDOW_BITS;

pub trait ScalarBits {
    /// Canonical little-endian limbs of the scalar.
    fn to_u64_limbs(&self) -> [u64; 4];

    /// The `index`-th 4-bit window, counting from the least significant end.
    #[inline]
    fn nibble(&self, index: usize) -> usize {
        let limbs = self.to_u64_limbs();
        let limb = limbs[index / 16];
        ((limb >> ((index % 16) * WINDOW_BITS)) & 0xF) as usize
    }
}

impl ScalarBits for ScalarField {
    #[inline]
    fn to_u64_limbs(&self) -> [u64; 4] {
        self.to_canonical_limbs()
    }
}

/// Selects `table[index]` touching every entry, so the memory access pattern
/// does not depend on `index`.
#[inline]
pub(crate) fn ct_lookup<G: ConditionallySelectable>(table: &[G], index: usize) -> G {
    let mut out = table[0];
    for (i, entry) in table.iter().enumerate().skip(1) {
        out.conditional_assign(entry, (i as u64).ct_eq(&(index as u64)));
    }
    out
}

pub trait Group:
    Sized
    + Copy
    + ConditionallySelectable
    + Add<Output = Self>
    + AddAssign
    + Sub<Output = Self>
    + SubAssign
    + Neg<Output = Self>
{
    type Scalar: ScalarBits;

    fn identity() -> Self;
    fn is_identity(&self) -> bool;
    fn generator() -> Self;
    fn mul_generator(scalar: &Self::Scalar) -> Self;
    fn double(&self) -> Self;
    fn negate(&self) -> Self;

    /// Fixed-window scalar multiplication. The sequence of group operations
    /// and table accesses is independent of the scalar value.
    fn scalar_mul(&self, scalar: &Self::Scalar) -> Self {
        let table = Self::window_table(self);
        let mut result = Self::identity();

        for window in (0..WINDOW_COUNT).rev() {
            for _ in 0..WINDOW_BITS {
                result = result.double();
            }
            result += ct_lookup(&table, scalar.nibble(window));
        }

        result
    }

    /// Variable-time scalar multiplication, for public scalars only.
    fn scalar_mul_vartime(&self, scalar: &Self::Scalar) -> Self {
        if self.is_identity() {
            return Self::identity();
        }

        let table = Self::window_table(self);
        let mut result = Self::identity();
        let mut started = false;

        for window in (0..WINDOW_COUNT).rev() {
            if started {
                for _ in 0..WINDOW_BITS {
                    result = result.double();
                }
            }
            let digit = scalar.nibble(window);
            if digit != 0 {
                result += table[digit];
                started = true;
            }
        }

        result
    }

    /// `[0*P, 1*P, ..., 15*P]`.
    fn window_table(point: &Self) -> [Self; WINDOW_SIZE] {
        let mut table = [Self::identity(); WINDOW_SIZE];
        table[1] = *point;
        for i in 2..WINDOW_SIZE {
            table[i] = if i % 2 == 0 {
                table[i / 2].double()
            } else {
                table[i - 1] + table[1]
            };
        }
        table
    }

    fn mul_u64(&self, n: u64) -> Self {
        if n == 0 {
            return Self::identity();
        }
        if n == 1 {
            return *self;
        }

        let mut result = Self::identity();
        let mut temp = *self;
        let mut bits = n;

        while bits > 0 {
            if bits & 1 == 1 {
                result += temp;
            }
            temp = temp.double();
            bits >>= 1;
        }

        result
    }

    /// Variable-time sum of `scalars[i] * points[i]`.
    fn multi_scalar_mul(points: &[Self], scalars: &[Self::Scalar]) -> Self {
        assert_eq!(
            points.len(),
            scalars.len(),
            "Points and scalars must have same length"
        );

        let tables: Vec<_> = points.iter().map(Self::window_table).collect();
        let mut result = Self::identity();

        for window in (0..WINDOW_COUNT).rev() {
            for _ in 0..WINDOW_BITS {
                result = result.double();
            }
            for (table, scalar) in tables.iter().zip(scalars) {
                let digit = scalar.nibble(window);
                if digit != 0 {
                    result += table[digit];
                }
            }
        }

        result
    }
}
