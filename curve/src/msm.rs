use crate::generator_table::mul_generator_vartime;
use crate::group::{ScalarBits, WINDOW_BITS, WINDOW_COUNT};
use crate::{Affine, Group, Projective, ScalarField};

/// Compute a * G + b * P using the precomputed generator table and a window
/// table for P. Variable time: only for public inputs such as verification.
pub fn double_scalar_mul_basepoint(a: &ScalarField, b: &ScalarField, point: &Projective) -> Projective {
    let point_table = Projective::window_table(point);
    let mut result = Projective::INFINITY;

    for window in (0..WINDOW_COUNT).rev() {
        for _ in 0..WINDOW_BITS {
            result = result.double();
        }
        let digit = b.nibble(window);
        if digit != 0 {
            result += point_table[digit];
        }
    }

    result + mul_generator_vartime(a)
}

/// Affine wrapper around [`double_scalar_mul_basepoint`].
pub fn double_scalar_mul_basepoint_affine(
    a: &ScalarField,
    b: &ScalarField,
    point: &Affine,
) -> Affine {
    double_scalar_mul_basepoint(a, b, &Projective::from_affine(point)).to_affine()
}
